//! Misplacement model for stochastic move execution.
//!
//! A piece aimed at a column lands there with probability 0.6 and slips one column
//! to either side otherwise. Edge columns cannot slip outward, so their whole slip
//! mass goes to the single inner neighbour.

use crate::core::{BoardState, EngineError, Result, COLS};
use rand::Rng;

pub const HIT_PROBABILITY: f64 = 0.6;
pub const SLIP_PROBABILITY: f64 = 0.2;
pub const EDGE_SLIP_PROBABILITY: f64 = 0.4;

/// Executed columns with their probabilities, in ascending column order.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDistribution {
    outcomes: Vec<(usize, f64)>,
}

impl OutcomeDistribution {
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.outcomes.iter().copied()
    }

    pub fn probability(&self, column: usize) -> f64 {
        self.outcomes
            .iter()
            .find(|&&(c, _)| c == column)
            .map_or(0.0, |&(_, p)| p)
    }

    pub fn total(&self) -> f64 {
        self.outcomes.iter().map(|&(_, p)| p).sum()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Distribution over the columns a piece aimed at `intended` can land in.
pub fn get_outcomes(intended: usize) -> Result<OutcomeDistribution> {
    let last = COLS - 1;
    let outcomes = match intended {
        c if c > last => return Err(EngineError::InvalidColumn { column: c }),
        0 => vec![(0, HIT_PROBABILITY), (1, EDGE_SLIP_PROBABILITY)],
        c if c == last => vec![(last - 1, EDGE_SLIP_PROBABILITY), (last, HIT_PROBABILITY)],
        c => vec![
            (c - 1, SLIP_PROBABILITY),
            (c, HIT_PROBABILITY),
            (c + 1, SLIP_PROBABILITY),
        ],
    };
    Ok(OutcomeDistribution { outcomes })
}

/// Draws the column a piece aimed at `intended` actually lands in.
///
/// Outcomes whose column is full are excluded and the remaining mass is
/// renormalised. Fails with `ColumnFull` when no outcome column can take a piece.
pub fn sample_outcome<R: Rng + ?Sized>(
    board: &BoardState,
    intended: usize,
    rng: &mut R,
) -> Result<usize> {
    let playable: Vec<(usize, f64)> = get_outcomes(intended)?
        .iter()
        .filter(|&(c, p)| p > 0.0 && board.can_play(c))
        .collect();
    let Some(&(fallback, _)) = playable.last() else {
        return Err(EngineError::ColumnFull { column: intended });
    };

    let total: f64 = playable.iter().map(|&(_, p)| p).sum();
    let mut r = rng.gen::<f64>() * total;
    for &(column, p) in &playable {
        if r < p {
            return Ok(column);
        }
        r -= p;
    }
    Ok(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ROWS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_distributions_sum_to_one() {
        for column in 0..COLS {
            let dist = get_outcomes(column).unwrap();
            let sum: f64 = dist.iter().map(|(_, p)| p).sum();
            assert_eq!(sum, 1.0, "column {}", column);
            assert!(dist.iter().all(|(c, p)| c < COLS && p > 0.0));
            assert_eq!(dist.probability(column), HIT_PROBABILITY);
        }
    }

    #[test]
    fn test_edge_columns() {
        let left = get_outcomes(0).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left.probability(1), 0.4);

        let right = get_outcomes(COLS - 1).unwrap();
        assert_eq!(right.len(), 2);
        assert_eq!(right.probability(COLS - 2), 0.4);
        assert_eq!(right.probability(COLS), 0.0);
    }

    #[test]
    fn test_interior_column() {
        let dist = get_outcomes(3).unwrap();
        let pairs: Vec<(usize, f64)> = dist.iter().collect();
        assert_eq!(pairs, vec![(2, 0.2), (3, 0.6), (4, 0.2)]);
    }

    #[test]
    fn test_invalid_column() {
        assert_eq!(
            get_outcomes(COLS),
            Err(EngineError::InvalidColumn { column: COLS })
        );
    }

    #[test]
    fn test_sampling_frequencies() {
        let board = BoardState::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; COLS];
        let n = 20_000;
        for _ in 0..n {
            counts[sample_outcome(&board, 3, &mut rng).unwrap()] += 1;
        }
        assert_eq!(counts[0] + counts[1] + counts[5] + counts[6], 0);
        let hit = counts[3] as f64 / n as f64;
        assert!((hit - 0.6).abs() < 0.02, "hit rate {}", hit);
        let left = counts[2] as f64 / n as f64;
        assert!((left - 0.2).abs() < 0.02, "left slip rate {}", left);
    }

    #[test]
    fn test_sampling_skips_full_columns() {
        let board = BoardState::from_moves(&[2; ROWS]).unwrap();
        assert!(!board.can_play(2));
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let column = sample_outcome(&board, 3, &mut rng).unwrap();
            assert!(column == 3 || column == 4);
        }
    }

    #[test]
    fn test_sampling_all_outcomes_full() {
        let moves: Vec<usize> = (0..ROWS).flat_map(|_| [0, 1]).collect();
        let board = BoardState::from_moves(&moves).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            sample_outcome(&board, 0, &mut rng),
            Err(EngineError::ColumnFull { column: 0 })
        );
    }
}
