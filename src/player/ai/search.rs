//! # Search Module
//!
//! Depth-limited tree search over a single shared `BoardState`. Every move is
//! applied immediately before recursing and undone immediately after, so the board
//! is left exactly as it was found once a search returns.
//!
//! ## Strategies
//! All strategies share one skeleton (`SearchEngine::node`): terminal check, an
//! ascending walk over the valid columns, and a max/min fold that keeps the
//! first-seen column on ties. The strategy only decides how a column is valued:
//! - **Minimax**: play the column and search the reply.
//! - **AlphaBeta**: the same, threading `alpha`/`beta` and skipping the remaining
//!   siblings once `alpha >= beta`. Returns exactly what minimax returns.
//! - **Expectiminimax**: play every column the piece may land in and weight the
//!   replies by the misplacement model. Not pruned.
//!
//! Scores are always from the perspective of the side passed to `search`.

use super::alpha_beta::Bounds;
use super::evaluator::{Evaluator, HeuristicEvaluator};
use super::minimax::Combinator;
use super::trace::SearchTrace;
use crate::core::{BoardState, EngineError, PlayerId, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Minimax,
    AlphaBeta,
    Expectiminimax,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Minimax,
        Strategy::AlphaBeta,
        Strategy::Expectiminimax,
    ];
}

/// Backed-up value of a node and the column that achieves it.
/// `column` is `None` only for terminal and depth-zero nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub value: f64,
    pub column: Option<usize>,
}

struct Branch {
    column: usize,
    value: f64,
    nodes: u64,
    trace: Option<SearchTrace>,
}

pub struct SearchEngine<'e, E: Evaluator + ?Sized> {
    evaluator: &'e E,
    strategy: Strategy,
    side: PlayerId,
    time_limit: Option<Duration>,
    deadline: Option<Instant>,
    trace_depth: usize,
    trace: Option<SearchTrace>,
    nodes: u64,
}

impl<'e, E: Evaluator + ?Sized> SearchEngine<'e, E> {
    pub fn new(evaluator: &'e E, strategy: Strategy) -> Self {
        SearchEngine {
            evaluator,
            strategy,
            side: PlayerId::default(),
            time_limit: None,
            deadline: None,
            trace_depth: 0,
            trace: None,
            nodes: 0,
        }
    }

    /// Wall-clock budget, checked only between root columns.
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Records this many levels of the tree on each search; 0 disables it.
    pub fn with_trace_depth(mut self, depth: usize) -> Self {
        self.trace_depth = depth;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn trace(&self) -> Option<&SearchTrace> {
        self.trace.as_ref()
    }

    pub fn take_trace(&mut self) -> Option<SearchTrace> {
        self.trace.take()
    }

    /// Searches `depth` plies from `board`. The side to move is `side` when
    /// `maximizing`, its opponent otherwise.
    pub fn search(
        &mut self,
        board: &mut BoardState,
        depth: i32,
        maximizing: bool,
        side: PlayerId,
    ) -> Result<SearchResult> {
        let depth = self.begin(depth, side)?;
        let result = self.node(board, depth, maximizing, 0, Bounds::FULL)?;
        debug!(
            strategy = ?self.strategy,
            depth,
            column = ?result.column,
            value = result.value,
            nodes = self.nodes,
            "search complete"
        );
        Ok(result)
    }

    fn begin(&mut self, depth: i32, side: PlayerId) -> Result<u32> {
        if depth < 0 {
            return Err(EngineError::InvalidDepth { depth });
        }
        self.side = side;
        self.nodes = 0;
        self.deadline = self.time_limit.map(|limit| Instant::now() + limit);
        self.trace = (self.trace_depth > 0).then(|| SearchTrace::new(self.trace_depth));
        Ok(depth as u32)
    }

    #[inline]
    pub(crate) fn mover(&self, maximizing: bool) -> PlayerId {
        if maximizing {
            self.side
        } else {
            self.side.opponent()
        }
    }

    fn out_of_time(&self) -> bool {
        self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }

    pub(crate) fn trace_enter<F: FnOnce() -> String>(&mut self, ply: usize, label: F) -> bool {
        match self.trace.as_mut() {
            Some(trace) => trace.enter(ply, label),
            None => false,
        }
    }

    pub(crate) fn trace_leave(&mut self) {
        if let Some(trace) = self.trace.as_mut() {
            trace.leave();
        }
    }

    pub(crate) fn node(
        &mut self,
        board: &mut BoardState,
        depth: u32,
        maximizing: bool,
        ply: usize,
        mut bounds: Bounds,
    ) -> Result<SearchResult> {
        self.nodes += 1;

        let moves = board.get_valid_moves();
        if depth == 0 || moves.is_empty() {
            return Ok(self.leaf(board, ply));
        }

        let combinator = Combinator::for_node(maximizing);
        let mut best: Option<(usize, f64)> = None;

        for column in moves {
            if ply == 0 && best.is_some() && self.out_of_time() {
                trace!(column, "time budget exhausted, stopping root search");
                break;
            }

            let value = self.column_value(board, column, depth, maximizing, ply, bounds)?;
            if ply == 0 {
                trace!(column, value, "root branch");
            }

            if combinator.improves(best.map(|(_, v)| v), value) {
                best = Some((column, value));
            }
            if self.strategy == Strategy::AlphaBeta && bounds.update(value, maximizing) {
                break;
            }
        }

        Ok(match best {
            Some((column, value)) => SearchResult {
                value,
                column: Some(column),
            },
            None => self.leaf(board, ply),
        })
    }

    fn leaf(&mut self, board: &BoardState, ply: usize) -> SearchResult {
        let value = self.evaluator.evaluate(board, self.side);
        if let Some(trace) = self.trace.as_mut() {
            trace.leaf(ply, value);
        }
        SearchResult {
            value,
            column: None,
        }
    }

    /// Value of choosing `column` at a node, according to the strategy.
    fn column_value(
        &mut self,
        board: &mut BoardState,
        column: usize,
        depth: u32,
        maximizing: bool,
        ply: usize,
        bounds: Bounds,
    ) -> Result<f64> {
        match self.strategy {
            Strategy::Minimax => self.child(board, column, depth, maximizing, ply, Bounds::FULL),
            Strategy::AlphaBeta => self.child(board, column, depth, maximizing, ply, bounds),
            Strategy::Expectiminimax => self.expectation(board, column, depth, maximizing, ply),
        }
    }

    fn fork(&self) -> Self {
        SearchEngine {
            evaluator: self.evaluator,
            strategy: self.strategy,
            side: self.side,
            time_limit: self.time_limit,
            deadline: self.deadline,
            trace_depth: self.trace_depth,
            trace: (self.trace_depth > 0).then(|| SearchTrace::new(self.trace_depth)),
            nodes: 0,
        }
    }

    /// Like `search`, but each root column is searched on its own copy of the
    /// board on the rayon pool. Root columns are searched with a full window, so
    /// the result matches the sequential search; only the node count differs.
    pub fn search_parallel(
        &mut self,
        board: &BoardState,
        depth: i32,
        maximizing: bool,
        side: PlayerId,
    ) -> Result<SearchResult> {
        let depth = self.begin(depth, side)?;
        let moves = board.get_valid_moves();
        if depth == 0 || moves.is_empty() {
            let mut board = board.clone();
            return self.node(&mut board, depth, maximizing, 0, Bounds::FULL);
        }

        let first = moves[0];
        let this = &*self;
        let branches: Vec<Result<Option<Branch>>> = moves
            .par_iter()
            .map(|&column| -> Result<Option<Branch>> {
                let mut engine = this.fork();
                if column != first && engine.out_of_time() {
                    return Ok(None);
                }
                let mut board = board.clone();
                let value =
                    engine.column_value(&mut board, column, depth, maximizing, 0, Bounds::FULL)?;
                Ok(Some(Branch {
                    column,
                    value,
                    nodes: engine.nodes,
                    trace: engine.trace.take(),
                }))
            })
            .collect();

        self.nodes = 1;
        let combinator = Combinator::for_node(maximizing);
        let mut best: Option<(usize, f64)> = None;
        for branch in branches {
            let Some(branch) = branch? else {
                continue;
            };
            self.nodes += branch.nodes;
            if let (Some(trace), Some(sub)) = (self.trace.as_mut(), branch.trace) {
                trace.absorb(sub);
            }
            trace!(column = branch.column, value = branch.value, "root branch");
            if combinator.improves(best.map(|(_, v)| v), branch.value) {
                best = Some((branch.column, branch.value));
            }
        }

        let result = match best {
            Some((column, value)) => SearchResult {
                value,
                column: Some(column),
            },
            None => {
                let mut board = board.clone();
                self.node(&mut board, 0, maximizing, 0, Bounds::FULL)?
            }
        };
        debug!(
            strategy = ?self.strategy,
            depth,
            column = ?result.column,
            value = result.value,
            nodes = self.nodes,
            "parallel search complete"
        );
        Ok(result)
    }
}

/// Picks a column for `side` to play, using the heuristic weights from `AIConfig`.
pub fn search(
    board: &mut BoardState,
    depth: i32,
    strategy: Strategy,
    side: PlayerId,
) -> Result<SearchResult> {
    let evaluator = HeuristicEvaluator::from_config();
    SearchEngine::new(&evaluator, strategy).search(board, depth, true, side)
}
