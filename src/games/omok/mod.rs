mod board;
mod game;
pub mod rules;
mod types;
mod view;

pub use board::Board;
pub use game::{Accepted, Game, Phase, Placement, Rejection, ReplyOutcome};
pub use types::{BOARD_SIZE, Cell, GameMode, GameStatus, Move, Player, Rules, WIN_LENGTH};
pub use view::GameView;
