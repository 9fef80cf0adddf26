use serde::{Deserialize, Serialize};

use crate::force::Force;


// Game state as reported by the server after each move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub turn: Force,
    #[serde(default)]
    pub is_check: bool,
    #[serde(default)]
    pub is_checkmate: bool,
    #[serde(default)]
    pub is_draw: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Active,
    Victory(Force),
    Draw,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubjectiveGameResult {
    Victory,
    Defeat,
    Draw,
}

impl GameState {
    pub fn new_game() -> Self {
        GameState {
            turn: Force::White,
            is_check: false,
            is_checkmate: false,
            is_draw: false,
        }
    }

    pub fn status(&self) -> GameStatus {
        if self.is_checkmate {
            // The side to move has been mated.
            GameStatus::Victory(self.turn.opponent())
        } else if self.is_draw {
            GameStatus::Draw
        } else {
            GameStatus::Active
        }
    }

    pub fn is_active(&self) -> bool { self.status() == GameStatus::Active }
}

impl GameStatus {
    // Observers get `None`: a game result only makes sense for one of the sides.
    pub fn subjective_result(self, me: Option<Force>) -> Option<SubjectiveGameResult> {
        match (self, me) {
            (GameStatus::Active, _) => None,
            (GameStatus::Draw, _) => Some(SubjectiveGameResult::Draw),
            (GameStatus::Victory(_), None) => None,
            (GameStatus::Victory(winner), Some(me)) => Some(if winner == me {
                SubjectiveGameResult::Victory
            } else {
                SubjectiveGameResult::Defeat
            }),
        }
    }

    pub fn to_human_readable(self) -> String {
        match self {
            GameStatus::Active => "Game in progress".to_owned(),
            GameStatus::Victory(winner) => format!("Checkmate: {} wins", winner.name()),
            GameStatus::Draw => "Draw".to_owned(),
        }
    }
}
