use crate::core::BoardState;

/// A participant in a game: picks a column from the currently playable ones.
///
/// Returning `None` resigns.
pub trait PlayerController {
    fn choose_move(&self, board: &BoardState, legal_moves: &[usize]) -> Option<usize>;
    fn name(&self) -> &str;
}
