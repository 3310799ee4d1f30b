//! Free-function surface over `BoardState`, plus game-over queries.

use crate::core::{BoardState, PlayerId, Result};

/// Columns that can still take a piece, ascending.
pub fn get_valid_moves(board: &BoardState) -> Vec<usize> {
    board.get_valid_moves()
}

/// Drops a piece for `side` into `column` and returns the row it landed on.
pub fn apply_move(board: &mut BoardState, side: PlayerId, column: usize) -> Result<usize> {
    board.apply_move(side, column)
}

pub fn undo_move(board: &mut BoardState, side: PlayerId, column: usize) -> Result<()> {
    board.undo_move(side, column)
}

pub fn to_display_string(board: &BoardState) -> String {
    board.to_display_string()
}

pub fn count_sequences(board: &BoardState, side: PlayerId, length: usize) -> usize {
    board.count_sequences(side, length)
}

/// The side holding a four-in-a-row, if any.
pub fn winner(board: &BoardState) -> Option<PlayerId> {
    [PlayerId::Player1, PlayerId::Player2]
        .into_iter()
        .find(|&side| board.check_win(side))
}

pub fn is_game_over(board: &BoardState) -> bool {
    board.is_full() || winner(board).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_and_game_over() {
        let mut board = BoardState::new();
        assert_eq!(winner(&board), None);
        assert!(!is_game_over(&board));

        for column in [2, 2, 3, 3, 4, 4] {
            let side = if board.move_count() % 2 == 0 {
                PlayerId::Player1
            } else {
                PlayerId::Player2
            };
            apply_move(&mut board, side, column).unwrap();
        }
        assert_eq!(winner(&board), None);
        apply_move(&mut board, PlayerId::Player1, 5).unwrap();
        assert_eq!(winner(&board), Some(PlayerId::Player1));
        assert!(is_game_over(&board));

        undo_move(&mut board, PlayerId::Player1, 5).unwrap();
        assert!(!is_game_over(&board));
        assert_eq!(count_sequences(&board, PlayerId::Player1, 3), 1);
    }

    #[test]
    fn test_display_string_via_free_function() {
        let board = BoardState::from_moves(&[0, 1]).unwrap();
        let s = to_display_string(&board);
        assert_eq!(&s[..7], "X.....O");
        assert_eq!(get_valid_moves(&board), (0..7).collect::<Vec<_>>());
    }
}
