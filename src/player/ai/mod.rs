pub mod alpha_beta;
pub mod config;
pub mod eval;
pub mod evaluator;
pub mod expectiminimax;
pub mod minimax;
pub mod outcome;
pub mod random;
pub mod search;
pub mod search_ai;
pub mod trace;

pub use alpha_beta::Bounds;
pub use config::{AIConfig, GameConfig, HeuristicWeights, SearchConfig};
pub use evaluator::{Evaluator, HeuristicEvaluator};
pub use outcome::{get_outcomes, sample_outcome, OutcomeDistribution};
pub use random::RandomAI;
pub use search::{search, SearchEngine, SearchResult, Strategy};
pub use search_ai::SearchAI;
pub use trace::{SearchTrace, TraceNode};
