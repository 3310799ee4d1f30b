pub mod board;
pub mod error;
pub mod types;

pub use board::{BoardState, Grid};
pub use error::{EngineError, Result};
pub use types::{MoveRecord, PlayerId, CELLS, COLS, ROWS};
