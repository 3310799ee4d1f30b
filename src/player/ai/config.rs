use super::search::Strategy;
use crate::core::COLS;
use crate::game::GameMode;
use crate::selfplay::Opponent;
use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "ai_config.json";

static CONFIG: Lazy<AIConfig> = Lazy::new(AIConfig::load_or_default);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    pub version: String,
    pub evaluation: HeuristicWeights,
    pub search: SearchConfig,
    pub game: GameConfig,
}

/// Scoring table used by the window evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Three of ours plus an empty cell with exactly one open end.
    pub three_one_open: f64,
    /// Two of ours in a window, indexed by reachable empty squares: 2, 3, 4, 5+.
    pub two_tiers: [f64; 4],
    /// Subtracted for each window holding three opponent pieces and an empty cell.
    pub opponent_three: f64,
    /// Bonus per own piece, by column.
    pub column: [f64; COLS],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub depth: u32,
    /// Wall-clock budget checked between root columns.
    pub time_limit_ms: Option<u64>,
    /// Number of search-tree levels recorded in the trace, 0 disables tracing.
    pub trace_depth: usize,
    pub parallel_root: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    /// Execute moves through the misplacement outcome model.
    pub stochastic: bool,
    pub seed: u64,
    pub num_games: usize,
    /// Controller playing `Player2` in self-play.
    pub opponent: Opponent,
}

impl AIConfig {
    /// Process-wide configuration, read once from `ai_config.json`.
    pub fn get() -> &'static AIConfig {
        &CONFIG
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: AIConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            debug!(path = DEFAULT_CONFIG_PATH, "no config file, using defaults");
            return Self::default();
        }
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load config, using defaults");
            Self::default()
        })
    }
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            version: "1.0".to_string(),
            evaluation: HeuristicWeights::default(),
            search: SearchConfig::default(),
            game: GameConfig::default(),
        }
    }
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        HeuristicWeights {
            three_one_open: 900_000.0,
            two_tiers: [10_000.0, 20_000.0, 30_000.0, 40_000.0],
            opponent_three: 900_000.0,
            column: [40.0, 70.0, 120.0, 200.0, 120.0, 70.0, 40.0],
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: Strategy::AlphaBeta,
            depth: 5,
            time_limit_ms: None,
            trace_depth: 0,
            parallel_root: false,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: GameMode::FirstToConnect,
            stochastic: false,
            seed: 0,
            num_games: 1,
            opponent: Opponent::Search,
        }
    }
}
