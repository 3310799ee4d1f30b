//! # Evaluation Module
//!
//! Static evaluation of a `BoardState`, always scored from the perspective of the
//! queried side (positive = good for that side).
//!
//! ## Scoring Strategy
//! 1. **Decided positions**: a four-in-a-row for the side is `+INF`, for the
//!    opponent `-INF`.
//! 2. **Windows**: every horizontal, vertical and diagonal run of 4 cells is
//!    classified by how many of its cells belong to the side, the opponent, or are
//!    empty. Threes are rated by how many ends of the window are still open, twos
//!    by how much empty room surrounds them, and opponent threes are penalised.
//! 3. **Position**: each own piece earns a column bonus favouring the center.
//!
//! Windows holding pieces of both sides contribute nothing.

use super::config::HeuristicWeights;
use crate::core::{BoardState, Grid, PlayerId, COLS, ROWS};

/// Window directions as (row step, column step).
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

const WINDOW: isize = 4;

/// How many ends of a window can still be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenEnds {
    Both,
    One,
    None,
}

/// A run of four cells starting at (`row`, `col`) and stepping by (`dr`, `dc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub row: isize,
    pub col: isize,
    pub dr: isize,
    pub dc: isize,
}

impl Window {
    pub fn horizontal(row: usize, col: usize) -> Self {
        Window::new(row, col, DIRECTIONS[0])
    }

    pub fn vertical(row: usize, col: usize) -> Self {
        Window::new(row, col, DIRECTIONS[1])
    }

    pub fn rising(row: usize, col: usize) -> Self {
        Window::new(row, col, DIRECTIONS[2])
    }

    pub fn falling(row: usize, col: usize) -> Self {
        Window::new(row, col, DIRECTIONS[3])
    }

    fn new(row: usize, col: usize, (dr, dc): (isize, isize)) -> Self {
        Window {
            row: row as isize,
            col: col as isize,
            dr,
            dc,
        }
    }

    /// Cell `i` steps from the window start; negative and >= 4 reach outside it.
    fn at(&self, i: isize) -> (isize, isize) {
        (self.row + i * self.dr, self.col + i * self.dc)
    }

    fn fits(&self) -> bool {
        let (r, c) = self.at(WINDOW - 1);
        on_board(self.row, self.col) && on_board(r, c)
    }
}

#[inline]
fn on_board(row: isize, col: isize) -> bool {
    row >= 0 && row < ROWS as isize && col >= 0 && col < COLS as isize
}

#[inline]
fn is_empty(grid: &Grid, (row, col): (isize, isize)) -> bool {
    on_board(row, col) && grid[row as usize][col as usize].is_none()
}

/// Evaluates `board` for `side`.
pub fn evaluate(board: &BoardState, side: PlayerId, weights: &HeuristicWeights) -> f64 {
    if board.check_win(side) {
        return f64::INFINITY;
    }
    if board.check_win(side.opponent()) {
        return f64::NEG_INFINITY;
    }

    let grid = board.to_grid();
    let mut score = 0.0;

    for &direction in DIRECTIONS.iter() {
        for row in 0..ROWS {
            for col in 0..COLS {
                let window = Window::new(row, col, direction);
                if !window.fits() {
                    continue;
                }
                score += score_window(&grid, window, side, weights);
                if score == f64::INFINITY {
                    return score;
                }
            }
        }
    }

    score + positional(&grid, side, weights)
}

/// Scores a single window for `side`.
pub fn score_window(grid: &Grid, window: Window, side: PlayerId, weights: &HeuristicWeights) -> f64 {
    let opponent = side.opponent();
    let (mut own, mut theirs, mut empty) = (0, 0, 0);
    for i in 0..WINDOW {
        let (r, c) = window.at(i);
        match grid[r as usize][c as usize] {
            Some(p) if p == side => own += 1,
            Some(p) if p == opponent => theirs += 1,
            _ => empty += 1,
        }
    }

    match (own, theirs, empty) {
        (4, _, _) => f64::INFINITY,
        (3, 0, 1) => match open_ends(grid, window) {
            OpenEnds::Both => f64::INFINITY,
            OpenEnds::One => weights.three_one_open,
            OpenEnds::None => 0.0,
        },
        (2, 0, 2) => match reachable_squares(grid, window) {
            0 | 1 => 0.0,
            2 => weights.two_tiers[0],
            3 => weights.two_tiers[1],
            4 => weights.two_tiers[2],
            _ => weights.two_tiers[3],
        },
        (0, 3, 1) => -weights.opponent_three,
        _ => 0.0,
    }
}

/// Checks the cell just before the window start and just past its end.
pub fn open_ends(grid: &Grid, window: Window) -> OpenEnds {
    let before = is_empty(grid, window.at(-1));
    let after = is_empty(grid, window.at(WINDOW));
    match (before, after) {
        (true, true) => OpenEnds::Both,
        (false, false) => OpenEnds::None,
        _ => OpenEnds::One,
    }
}

/// Contiguous empty cells extending outward from both ends of the window.
pub fn reachable_squares(grid: &Grid, window: Window) -> usize {
    let behind = (1..)
        .take_while(|&k| is_empty(grid, window.at(-k)))
        .count();
    let ahead = (WINDOW..)
        .take_while(|&i| is_empty(grid, window.at(i)))
        .count();
    behind + ahead
}

fn positional(grid: &Grid, side: PlayerId, weights: &HeuristicWeights) -> f64 {
    grid.iter()
        .flat_map(|row| row.iter().enumerate())
        .filter(|(_, cell)| **cell == Some(side))
        .map(|(col, _)| weights.column[col])
        .sum()
}
