pub mod core;
pub mod game;
pub mod logic;
pub mod player;
pub mod selfplay;


pub use crate::core::{BoardState, EngineError, PlayerId, COLS, ROWS};
pub use crate::logic::{apply_move, get_valid_moves, to_display_string, undo_move};
pub use crate::player::ai::{get_outcomes, search, SearchResult, Strategy};
