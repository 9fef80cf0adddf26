use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
pub enum Force {
    #[serde(rename = "white_piece")]
    White,
    #[serde(rename = "black_piece")]
    Black,
}

impl Force {
    pub fn opponent(self) -> Force {
        match self {
            Force::White => Force::Black,
            Force::Black => Force::White,
        }
    }

    // Color names used by the lobby and by front-end configuration.
    pub fn from_name(name: &str) -> Option<Force> {
        match name {
            "white" => Some(Force::White),
            "black" => Some(Force::Black),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Force::White => "white",
            Force::Black => "black",
        }
    }
}
