//! Game rules for five-in-a-row.
//!
//! Pure functions over a [`Board`](super::Board). There are no placement
//! restrictions beyond bounds and occupancy, so the rules reduce to
//! finding a winning run and noticing a full board.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{detect_winner, winning_run};
