#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod client;
pub mod coord;
pub mod dirty;
pub mod display;
pub mod drag;
pub mod error;
pub mod event;
pub mod force;
pub mod game_state;
pub mod grid;
pub mod lobby;
pub mod move_graph;
pub mod notation;
pub mod piece;
pub mod test_util;
pub mod util;
