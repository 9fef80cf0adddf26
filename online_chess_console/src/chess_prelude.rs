// Note. There is also `online_chess_wasm/src/chess_prelude.rs`.

pub use online_chess::client::*;
pub use online_chess::coord::*;
pub use online_chess::display::*;
pub use online_chess::drag::*;
pub use online_chess::event::*;
pub use online_chess::force::*;
pub use online_chess::game_state::*;
pub use online_chess::grid::*;
pub use online_chess::lobby::*;
pub use online_chess::notation::*;
pub use online_chess::piece::*;
