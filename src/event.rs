// Messages exchanged over the game and lobby sockets. All messages are JSON objects.
//
// Server messages are deltas: every field is optional and the client applies whatever is
// present. This lets the server push a full snapshot on (re)connect and only the move plus
// the new graph afterwards.

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::force::Force;
use crate::game_state::GameState;
use crate::grid::BoardSnapshot;
use crate::move_graph::MoveGraph;
use crate::piece::PieceKind;


pub fn game_socket_path(game_id: &str) -> String { format!("/ws/game/chessboard/{}/", game_id) }

pub fn lobby_socket_path(game_id: &str) -> String { format!("/ws/game/lobby/{}/", game_id) }


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub start_pos: Coord,
    pub end_pos: Coord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promote_to: Option<PieceKind>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRecord {
    pub start_pos: Coord,
    pub end_pos: Coord,
}

// Board changes that go beyond relocating one piece from `start_pos` to `end_pos`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialMove {
    Castling { rook_start: Coord, rook_end: Coord },
    EnPassant { captured: Coord },
    Promotion { kind: PieceKind },
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameClientEvent {
    #[serde(rename = "move")]
    pub make_move: MoveRequest,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct GameServerEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chessboard: Option<BoardSnapshot>,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub last_move: Option<MoveRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_move: Option<SpecialMove>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_graph: Option<MoveGraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LobbyClientEvent {
    #[serde(with = "force_name")]
    pub play_as: Option<Force>,
    pub start_game: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LobbySetup {
    pub white_player_nick: String,
    pub black_player_nick: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct LobbyServerEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<LobbySetup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_game_url: Option<String>,
}

// The lobby names colors "white"/"black", unlike the game socket.
mod force_name {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::force::Force;

    pub fn serialize<S: Serializer>(force: &Option<Force>, serializer: S) -> Result<S::Ok, S::Error> {
        match force {
            Some(force) => serializer.serialize_str(force.name()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Force>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(name) => Force::from_name(&name)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown color \"{}\"", name))),
        }
    }
}
