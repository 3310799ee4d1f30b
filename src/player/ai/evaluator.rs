//! Evaluator trait for board evaluation
//!
//! Defines a common interface for leaf scoring so the search engine does not
//! depend on one particular heuristic.

use super::config::{AIConfig, HeuristicWeights};
use super::eval;
use crate::core::{BoardState, PlayerId};

/// Trait for evaluating board positions
pub trait Evaluator: Send + Sync {
    /// Evaluate the board from `side`'s perspective
    ///
    /// Returns:
    ///   - Positive score: `side` advantage
    ///   - Negative score: opponent advantage
    ///   - `+INF` / `-INF`: decided position
    fn evaluate(&self, board: &BoardState, side: PlayerId) -> f64;

    /// Get evaluator name for debugging
    fn name(&self) -> &str;
}

/// Window-pattern heuristic with a column-positional bonus.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
}

impl HeuristicEvaluator {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    /// Uses the weights from the process-wide `AIConfig`.
    pub fn from_config() -> Self {
        Self::new(AIConfig::get().evaluation.clone())
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, board: &BoardState, side: PlayerId) -> f64 {
        eval::evaluate(board, side, &self.weights)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
