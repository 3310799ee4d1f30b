use super::config::SearchConfig;
use super::evaluator::HeuristicEvaluator;
use super::search::SearchEngine;
use crate::core::{BoardState, PlayerId};
use crate::player::PlayerController;

use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Plays the column chosen by a `SearchEngine` run from its own side.
pub struct SearchAI {
    player_id: PlayerId,
    name: String,
    evaluator: HeuristicEvaluator,
    config: SearchConfig,
    nodes_evaluated: Cell<u64>,
}

impl SearchAI {
    pub fn new(
        player_id: PlayerId,
        name: &str,
        config: SearchConfig,
        evaluator: HeuristicEvaluator,
    ) -> Self {
        Self {
            player_id,
            name: name.to_string(),
            evaluator,
            config,
            nodes_evaluated: Cell::new(0),
        }
    }

    /// Nodes visited by the most recent move choice.
    pub fn nodes_evaluated(&self) -> u64 {
        self.nodes_evaluated.get()
    }

    fn search_root(&self, board: &BoardState) -> Option<usize> {
        let start_time = Instant::now();
        let mut engine = SearchEngine::new(&self.evaluator, self.config.strategy)
            .with_time_limit(self.config.time_limit_ms.map(Duration::from_millis))
            .with_trace_depth(self.config.trace_depth);

        let depth = self.config.depth as i32;
        let result = if self.config.parallel_root {
            engine.search_parallel(board, depth, true, self.player_id)
        } else {
            let mut board = board.clone();
            engine.search(&mut board, depth, true, self.player_id)
        };
        self.nodes_evaluated.set(engine.nodes());

        if let Some(trace) = engine.take_trace() {
            debug!(player = %self.player_id, "search tree:\n{}", trace.render());
        }

        match result {
            Ok(result) => {
                debug!(
                    player = %self.player_id,
                    column = ?result.column,
                    value = result.value,
                    nodes = engine.nodes(),
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "move chosen"
                );
                result.column
            }
            Err(e) => {
                warn!(player = %self.player_id, error = %e, "search failed");
                None
            }
        }
    }
}

impl PlayerController for SearchAI {
    fn choose_move(&self, board: &BoardState, legal_moves: &[usize]) -> Option<usize> {
        match self.search_root(board) {
            Some(column) if legal_moves.contains(&column) => Some(column),
            _ => legal_moves.first().copied(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ai::search::Strategy;

    fn config(strategy: Strategy, depth: u32) -> SearchConfig {
        SearchConfig {
            strategy,
            depth,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_takes_the_win() {
        let board = BoardState::from_moves(&[0, 6, 0, 6, 0, 5]).unwrap();
        for strategy in Strategy::ALL {
            let ai = SearchAI::new(
                PlayerId::Player1,
                "AI-P1",
                config(strategy, 3),
                HeuristicEvaluator::default(),
            );
            assert_eq!(ai.choose_move(&board, &board.get_valid_moves()), Some(0));
            assert!(ai.nodes_evaluated() > 0);
        }
    }

    #[test]
    fn test_blocks_as_second_player() {
        let board = BoardState::from_moves(&[0, 6, 0, 6, 0]).unwrap();
        let ai = SearchAI::new(
            PlayerId::Player2,
            "AI-P2",
            config(Strategy::AlphaBeta, 2),
            HeuristicEvaluator::default(),
        );
        assert_eq!(ai.choose_move(&board, &board.get_valid_moves()), Some(0));
    }

    #[test]
    fn test_parallel_root_agrees() {
        let board = BoardState::from_moves(&[3, 3, 2]).unwrap();
        let mut cfg = config(Strategy::AlphaBeta, 3);
        let sequential = SearchAI::new(
            PlayerId::Player2,
            "seq",
            cfg.clone(),
            HeuristicEvaluator::default(),
        );
        cfg.parallel_root = true;
        let parallel =
            SearchAI::new(PlayerId::Player2, "par", cfg, HeuristicEvaluator::default());
        let moves = board.get_valid_moves();
        assert_eq!(
            sequential.choose_move(&board, &moves),
            parallel.choose_move(&board, &moves)
        );
    }

    #[test]
    fn test_no_legal_moves_resigns() {
        let board = BoardState::new();
        let ai = SearchAI::new(
            PlayerId::Player1,
            "AI",
            config(Strategy::Minimax, 1),
            HeuristicEvaluator::default(),
        );
        assert_eq!(ai.choose_move(&board, &[]), None);
    }
}
