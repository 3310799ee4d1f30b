use super::types::PlayerId;
use thiserror::Error;

/// Errors surfaced by board mutation and search entry points.
///
/// Every variant is detected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("column {column} is outside the board")]
    InvalidColumn { column: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("search depth must be non-negative, got {depth}")]
    InvalidDepth { depth: i32 },

    #[error("undo of {side:?} in column {column} does not match the last applied move")]
    UndoMismatch { side: PlayerId, column: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
