// Note. There is also `online_chess_console/src/chess_prelude.rs`.
//
// Rationale: each front end works with most of the core, and listing modules one by one at the
// top of every file adds noise without telling the reader anything.

pub use online_chess::client::*;
pub use online_chess::coord::*;
pub use online_chess::display::*;
pub use online_chess::drag::*;
pub use online_chess::event::*;
pub use online_chess::force::*;
pub use online_chess::game_state::*;
pub use online_chess::lobby::*;
pub use online_chess::piece::*;
