use super::alpha_beta::Bounds;
use super::evaluator::Evaluator;
use super::search::SearchEngine;
use crate::core::{BoardState, Result};

/// How a node folds its children's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Max,
    Min,
}

impl Combinator {
    pub fn for_node(maximizing: bool) -> Self {
        if maximizing {
            Combinator::Max
        } else {
            Combinator::Min
        }
    }

    /// True if `value` should replace `best`. Ties keep the earlier column.
    pub fn improves(self, best: Option<f64>, value: f64) -> bool {
        match (self, best) {
            (_, None) => true,
            (Combinator::Max, Some(b)) => value > b,
            (Combinator::Min, Some(b)) => value < b,
        }
    }
}

impl<'e, E: Evaluator + ?Sized> SearchEngine<'e, E> {
    /// Plays `column` for the node's mover, searches the reply and takes it back.
    pub(crate) fn child(
        &mut self,
        board: &mut BoardState,
        column: usize,
        depth: u32,
        maximizing: bool,
        ply: usize,
        bounds: Bounds,
    ) -> Result<f64> {
        let mover = self.mover(maximizing);
        board.apply_move(mover, column)?;
        let recorded = self.trace_enter(ply, || {
            format!(
                "({}) Move: {}, board: {}",
                if maximizing { "Max" } else { "Min" },
                column,
                board.to_display_string()
            )
        });

        let result = self.node(board, depth - 1, !maximizing, ply + 1, bounds);

        if recorded {
            self.trace_leave();
        }
        board.undo_move(mover, column)?;
        Ok(result?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_always_taken() {
        assert!(Combinator::Max.improves(None, f64::NEG_INFINITY));
        assert!(Combinator::Min.improves(None, f64::INFINITY));
    }

    #[test]
    fn test_ties_keep_first() {
        assert!(!Combinator::Max.improves(Some(3.0), 3.0));
        assert!(!Combinator::Min.improves(Some(3.0), 3.0));
        assert!(Combinator::Max.improves(Some(3.0), 4.0));
        assert!(Combinator::Min.improves(Some(3.0), 2.0));
    }
}
