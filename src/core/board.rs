use super::error::{EngineError, Result};
use super::types::{MoveRecord, PlayerId, CELLS, COLS, ROWS};
use std::fmt;

/// Row-major materialization of the board, row 0 is the bottom row.
pub type Grid = [[Option<PlayerId>; COLS]; ROWS];

/// Bit shift between consecutive cells of a run, with the column/row steps it encodes.
const DIRECTIONS: [(usize, isize, isize); 4] = [
    (1, 0, 1),         // vertical
    (ROWS, 1, 0),      // horizontal
    (ROWS + 1, 1, 1),  // diagonal, rising to the right
    (ROWS - 1, 1, -1), // diagonal, falling to the right
];

/// Bits from which a run of four in direction `(dc, dr)` stays on the board.
///
/// The packed layout has no sentinel row between columns, so shifted masks wrap
/// from the top of one column into the bottom of the next. Restricting the result
/// of the shift reduction to these starts discards the wrapped runs.
const fn run_starts(dc: isize, dr: isize) -> u64 {
    let mut bits = 0u64;
    let mut col = 0;
    while col < COLS {
        let mut row = 0;
        while row < ROWS {
            let end_col = col as isize + 3 * dc;
            let end_row = row as isize + 3 * dr;
            if end_col >= 0 && end_col < COLS as isize && end_row >= 0 && end_row < ROWS as isize
            {
                bits |= 1u64 << (col * ROWS + row);
            }
            row += 1;
        }
        col += 1;
    }
    bits
}

const RUN_STARTS: [u64; 4] = [
    run_starts(DIRECTIONS[0].1, DIRECTIONS[0].2),
    run_starts(DIRECTIONS[1].1, DIRECTIONS[1].2),
    run_starts(DIRECTIONS[2].1, DIRECTIONS[2].2),
    run_starts(DIRECTIONS[3].1, DIRECTIONS[3].2),
];

#[inline]
const fn bit(column: usize, row: usize) -> u64 {
    1u64 << (column * ROWS + row)
}

/// Packed connect-four position: one bit-mask per side plus column heights.
///
/// Moves are kept on a stack so that `undo_move` can verify it is undoing the
/// most recent move instead of trusting the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardState {
    mask: [u64; 2],
    height: [usize; COLS],
    moves: Vec<MoveRecord>,
}

impl BoardState {
    pub fn new() -> Self {
        BoardState {
            mask: [0; 2],
            height: [0; COLS],
            moves: Vec::with_capacity(CELLS),
        }
    }

    /// Builds a position by alternating sides, `Player1` first.
    pub fn from_moves(columns: &[usize]) -> Result<Self> {
        let mut board = Self::new();
        let mut side = PlayerId::Player1;
        for &column in columns {
            board.apply_move(side, column)?;
            side = side.opponent();
        }
        Ok(board)
    }

    #[inline]
    pub fn mask(&self, side: PlayerId) -> u64 {
        self.mask[side.index()]
    }

    /// Pieces stacked in `column`.
    ///
    /// # Panics
    /// If `column >= COLS`; use `can_play` for unchecked input.
    #[inline]
    pub fn height(&self, column: usize) -> usize {
        self.height[column]
    }

    pub fn heights(&self) -> &[usize; COLS] {
        &self.height
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn is_full(&self) -> bool {
        self.height.iter().all(|&h| h == ROWS)
    }

    pub fn can_play(&self, column: usize) -> bool {
        column < COLS && self.height[column] < ROWS
    }

    /// Columns that still accept a piece, in ascending order.
    pub fn get_valid_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&c| self.height[c] < ROWS).collect()
    }

    /// Drops a piece for `side` into `column` and returns the row it landed on.
    pub fn apply_move(&mut self, side: PlayerId, column: usize) -> Result<usize> {
        if column >= COLS {
            return Err(EngineError::InvalidColumn { column });
        }
        let row = self.height[column];
        if row == ROWS {
            return Err(EngineError::ColumnFull { column });
        }
        self.mask[side.index()] |= bit(column, row);
        self.height[column] += 1;
        self.moves.push(MoveRecord { side, column, row });
        Ok(row)
    }

    /// Reverts the most recent move, which must be `side` playing `column`.
    pub fn undo_move(&mut self, side: PlayerId, column: usize) -> Result<()> {
        if column >= COLS {
            return Err(EngineError::InvalidColumn { column });
        }
        match self.moves.last() {
            Some(last) if last.side == side && last.column == column => {
                self.pop_move();
                Ok(())
            }
            _ => Err(EngineError::UndoMismatch { side, column }),
        }
    }

    /// Reverts the most recent move, whatever it was.
    pub fn pop_move(&mut self) -> Option<MoveRecord> {
        let record = self.moves.pop()?;
        self.height[record.column] -= 1;
        self.mask[record.side.index()] &= !bit(record.column, record.row);
        Some(record)
    }

    /// True if `side` owns four contiguous cells in any direction.
    pub fn check_win(&self, side: PlayerId) -> bool {
        let m = self.mask[side.index()];
        DIRECTIONS
            .iter()
            .zip(RUN_STARTS.iter())
            .any(|(&(shift, _, _), &starts)| {
                let pairs = m & (m >> shift);
                pairs & (pairs >> (2 * shift)) & starts != 0
            })
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<PlayerId> {
        let b = bit(column, row);
        if self.mask[0] & b != 0 {
            Some(PlayerId::Player1)
        } else if self.mask[1] & b != 0 {
            Some(PlayerId::Player2)
        } else {
            None
        }
    }

    pub fn to_grid(&self) -> Grid {
        let mut grid = [[None; COLS]; ROWS];
        for (col, &h) in self.height.iter().enumerate() {
            for row in 0..h {
                grid[row][col] = self.cell(col, row);
            }
        }
        grid
    }

    /// One character per cell in bit-index order (`column * ROWS + row`).
    pub fn to_display_string(&self) -> String {
        (0..CELLS)
            .map(|i| match self.cell(i / ROWS, i % ROWS) {
                Some(side) => side.symbol(),
                None => '.',
            })
            .collect()
    }

    /// Counts runs of exactly `length` cells owned by `side` in all four directions.
    /// Overlapping runs are counted separately.
    pub fn count_sequences(&self, side: PlayerId, length: usize) -> usize {
        if length == 0 {
            return 0;
        }
        let grid = self.to_grid();
        let reach = length as isize - 1;
        let mut count = 0;
        for &(_, dc, dr) in DIRECTIONS.iter() {
            for row in 0..ROWS as isize {
                for col in 0..COLS as isize {
                    let end_row = row + reach * dr;
                    let end_col = col + reach * dc;
                    if end_row < 0 || end_row >= ROWS as isize || end_col >= COLS as isize {
                        continue;
                    }
                    let owned = (0..length as isize).all(|i| {
                        grid[(row + i * dr) as usize][(col + i * dc) as usize] == Some(side)
                    });
                    if owned {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let grid = self.to_grid();
        for row in grid.iter().rev() {
            write!(f, "|")?;
            for cell in row {
                let c = cell.map(PlayerId::symbol).unwrap_or(' ');
                write!(f, "{}|", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut BoardState, side: PlayerId, cells: &[(usize, usize)]) {
        // Fills each target column from the bottom, padding with the opponent.
        for &(col, row) in cells {
            while board.height(col) < row {
                board.apply_move(side.opponent(), col).unwrap();
            }
            assert_eq!(board.apply_move(side, col).unwrap(), row);
        }
    }

    #[test]
    fn test_empty_board() {
        let board = BoardState::new();
        assert_eq!(board.get_valid_moves(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(!board.check_win(PlayerId::Player1));
        assert!(!board.check_win(PlayerId::Player2));
        assert_eq!(board.to_display_string(), ".".repeat(CELLS));
    }

    #[test]
    fn test_apply_sets_bit_and_height() {
        let mut board = BoardState::new();
        assert_eq!(board.apply_move(PlayerId::Player1, 2).unwrap(), 0);
        assert_eq!(board.apply_move(PlayerId::Player2, 2).unwrap(), 1);
        assert_eq!(board.height(2), 2);
        assert_eq!(board.mask(PlayerId::Player1), 1 << (2 * ROWS));
        assert_eq!(board.mask(PlayerId::Player2), 1 << (2 * ROWS + 1));
        assert_eq!(board.cell(2, 1), Some(PlayerId::Player2));
    }

    #[test]
    fn test_column_full_leaves_state_unchanged() {
        let mut board = BoardState::from_moves(&[0, 0, 0, 0, 0, 0]).unwrap();
        let before = board.clone();
        assert_eq!(
            board.apply_move(PlayerId::Player1, 0),
            Err(EngineError::ColumnFull { column: 0 })
        );
        assert_eq!(board, before);
        assert!(!board.get_valid_moves().contains(&0));
    }

    #[test]
    fn test_invalid_column_rejected() {
        let mut board = BoardState::new();
        assert_eq!(
            board.apply_move(PlayerId::Player1, COLS),
            Err(EngineError::InvalidColumn { column: COLS })
        );
        assert_eq!(board, BoardState::new());
    }

    #[test]
    fn test_undo_mismatch_detected() {
        let mut board = BoardState::new();
        board.apply_move(PlayerId::Player1, 3).unwrap();
        board.apply_move(PlayerId::Player2, 4).unwrap();
        let before = board.clone();

        assert_eq!(
            board.undo_move(PlayerId::Player1, 3),
            Err(EngineError::UndoMismatch {
                side: PlayerId::Player1,
                column: 3
            })
        );
        assert_eq!(
            board.undo_move(PlayerId::Player1, 4),
            Err(EngineError::UndoMismatch {
                side: PlayerId::Player1,
                column: 4
            })
        );
        assert_eq!(board, before);

        board.undo_move(PlayerId::Player2, 4).unwrap();
        board.undo_move(PlayerId::Player1, 3).unwrap();
        assert_eq!(board, BoardState::new());
    }

    #[test]
    fn test_win_horizontal() {
        let mut board = BoardState::new();
        place(&mut board, PlayerId::Player1, &[(1, 0), (2, 0), (3, 0), (4, 0)]);
        assert!(board.check_win(PlayerId::Player1));
        assert!(!board.check_win(PlayerId::Player2));
    }

    #[test]
    fn test_win_vertical() {
        let mut board = BoardState::new();
        place(&mut board, PlayerId::Player2, &[(6, 2), (6, 3), (6, 4), (6, 5)]);
        assert!(board.check_win(PlayerId::Player2));
        assert!(!board.check_win(PlayerId::Player1));
    }

    #[test]
    fn test_win_rising_diagonal() {
        let mut board = BoardState::new();
        place(&mut board, PlayerId::Player1, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert!(board.check_win(PlayerId::Player1));
        assert!(!board.check_win(PlayerId::Player2));
    }

    /// Builds a position column by column, bottom piece first.
    fn stacks(columns: &[(usize, &[PlayerId])]) -> BoardState {
        let mut board = BoardState::new();
        for &(col, pieces) in columns {
            for &side in pieces {
                board.apply_move(side, col).unwrap();
            }
        }
        board
    }

    #[test]
    fn test_win_falling_diagonal() {
        use PlayerId::{Player1 as A, Player2 as B};
        let board = stacks(&[
            (3, &[B, B, A, B, B, A]),
            (4, &[B, A, B, B, A]),
            (5, &[B, B, A, A]),
            (6, &[A, B, A]),
        ]);
        assert!(board.check_win(A));
        assert!(!board.check_win(B));
    }

    #[test]
    fn test_no_win_across_column_boundary() {
        // Rows 4-5 of column 0 and rows 0-1 of column 1 are adjacent bits.
        let mut board = BoardState::new();
        place(&mut board, PlayerId::Player1, &[(0, 4), (0, 5), (1, 0), (1, 1)]);
        assert!(!board.check_win(PlayerId::Player1));

        // Bits 0, 5, 10, 15 are evenly spaced by ROWS - 1 but not a diagonal.
        let mut board = BoardState::new();
        place(&mut board, PlayerId::Player1, &[(0, 0), (0, 5), (1, 4), (2, 3)]);
        assert!(!board.check_win(PlayerId::Player1));
    }

    #[test]
    #[should_panic]
    fn test_height_out_of_range_panics() {
        let board = BoardState::new();
        assert!(!board.can_play(COLS));
        board.height(COLS);
    }

    #[test]
    fn test_three_is_not_a_win() {
        let board = BoardState::from_moves(&[0, 6, 1, 6, 2]).unwrap();
        assert!(!board.check_win(PlayerId::Player1));
        assert!(!board.check_win(PlayerId::Player2));
    }

    #[test]
    fn test_display_string_bit_order() {
        let board = BoardState::from_moves(&[0, 0, 1]).unwrap();
        let s = board.to_display_string();
        assert_eq!(s.len(), CELLS);
        assert_eq!(&s[0..2], "XO");
        assert_eq!(s.as_bytes()[ROWS] as char, 'X');
        assert_eq!(s.chars().filter(|&c| c == '.').count(), CELLS - 3);
    }

    #[test]
    fn test_grid_and_display() {
        let board = BoardState::from_moves(&[3, 3]).unwrap();
        let grid = board.to_grid();
        assert_eq!(grid[0][3], Some(PlayerId::Player1));
        assert_eq!(grid[1][3], Some(PlayerId::Player2));
        assert_eq!(grid[2][3], None);

        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS);
        assert_eq!(lines[ROWS - 1], "| | | |X| | | |");
        assert_eq!(lines[ROWS - 2], "| | | |O| | | |");
    }

    #[test]
    fn test_count_sequences() {
        let mut board = BoardState::new();
        place(
            &mut board,
            PlayerId::Player1,
            &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
        );
        assert_eq!(board.count_sequences(PlayerId::Player1, 4), 2);
        assert_eq!(board.count_sequences(PlayerId::Player1, 5), 1);
        assert_eq!(board.count_sequences(PlayerId::Player2, 4), 0);
        assert_eq!(board.count_sequences(PlayerId::Player1, 0), 0);
    }
}
