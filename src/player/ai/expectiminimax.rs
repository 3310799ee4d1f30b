use super::alpha_beta::Bounds;
use super::evaluator::Evaluator;
use super::outcome::get_outcomes;
use super::search::SearchEngine;
use crate::core::{BoardState, Result};

impl<'e, E: Evaluator + ?Sized> SearchEngine<'e, E> {
    /// Expected value of aiming at `intended`.
    ///
    /// Each possible landing column is played for the same mover and searched one
    /// ply deeper; outcomes landing in a full column contribute nothing. A chance
    /// node that mixes a forced win with a forced loss has no defined expectation
    /// and is scored as 0.
    pub(crate) fn expectation(
        &mut self,
        board: &mut BoardState,
        intended: usize,
        depth: u32,
        maximizing: bool,
        ply: usize,
    ) -> Result<f64> {
        let mover = self.mover(maximizing);
        let mut expected = 0.0;

        for (column, probability) in get_outcomes(intended)?.iter() {
            if probability <= 0.0 || !board.can_play(column) {
                continue;
            }
            board.apply_move(mover, column)?;
            let recorded = self.trace_enter(ply, || {
                format!(
                    "({}) Move: {} -> {} (p={:.1}), board: {}",
                    if maximizing { "Max" } else { "Min" },
                    intended,
                    column,
                    probability,
                    board.to_display_string()
                )
            });

            let result = self.node(board, depth - 1, !maximizing, ply + 1, Bounds::FULL);

            if recorded {
                self.trace_leave();
            }
            board.undo_move(mover, column)?;
            expected += probability * result?.value;
        }

        if expected.is_nan() {
            return Ok(0.0);
        }
        Ok(expected)
    }
}
