use crate::core::{BoardState, PlayerId};
use crate::game::{Game, GameEnd, GameMode};
use crate::player::ai::config::{AIConfig, HeuristicWeights, SearchConfig};
use crate::player::ai::{HeuristicEvaluator, SearchAI};
use crate::player::{PlayerController, RandomAI};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Who plays `Player2` against the search AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    #[default]
    Search,
    Random,
}

pub struct SelfPlayConfig {
    pub num_games: usize,
    pub weights: HeuristicWeights,
    pub search: SearchConfig,
    pub opponent: Opponent,
    pub mode: GameMode,
    pub stochastic: bool,
    pub seed: u64,
}

impl SelfPlayConfig {
    pub fn from_ai_config(config: &AIConfig) -> Self {
        SelfPlayConfig {
            num_games: config.game.num_games,
            weights: config.evaluation.clone(),
            search: config.search.clone(),
            opponent: config.game.opponent,
            mode: config.game.mode,
            stochastic: config.game.stochastic,
            seed: config.game.seed,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<PlayerId>,
    pub end: GameEnd,
    pub moves: usize,
    pub fours: [usize; 2],
    pub time_ms: u128,
    /// Final position in the 42-character display form.
    pub final_board: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SelfPlayStats {
    pub total_games: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    pub avg_moves: f64,
    pub avg_time_ms: f64,
    pub strategy: String,
    pub opponent: String,
    pub mode: String,
    pub games: Vec<GameResult>,
    /// Position the most recent game ended in.
    #[serde(skip)]
    pub last_board: Option<BoardState>,
}

impl SelfPlayStats {
    pub fn new() -> Self {
        Self {
            total_games: 0,
            p1_wins: 0,
            p2_wins: 0,
            draws: 0,
            avg_moves: 0.0,
            avg_time_ms: 0.0,
            strategy: String::new(),
            opponent: String::new(),
            mode: String::new(),
            games: Vec::new(),
            last_board: None,
        }
    }

    pub fn add_result(&mut self, result: GameResult) {
        self.total_games += 1;
        match result.winner {
            Some(PlayerId::Player1) => self.p1_wins += 1,
            Some(PlayerId::Player2) => self.p2_wins += 1,
            None => self.draws += 1,
        }
        self.games.push(result);
        self.recalculate_averages();
    }

    fn recalculate_averages(&mut self) {
        if self.games.is_empty() {
            return;
        }
        let total_moves: usize = self.games.iter().map(|g| g.moves).sum();
        let total_time: u128 = self.games.iter().map(|g| g.time_ms).sum();
        self.avg_moves = total_moves as f64 / self.games.len() as f64;
        self.avg_time_ms = total_time as f64 / self.games.len() as f64;
    }
}

impl Default for SelfPlayStats {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run_selfplay(config: SelfPlayConfig) -> anyhow::Result<SelfPlayStats> {
    let mut stats = SelfPlayStats::new();
    stats.strategy = format!("{:?}", config.search.strategy);
    stats.opponent = format!("{:?}", config.opponent);
    stats.mode = format!("{:?}", config.mode);

    for game_num in 1..=config.num_games {
        let start_time = Instant::now();
        // Distinct but reproducible streams per game.
        let game_seed = config.seed.wrapping_add(game_num as u64);

        let p1: Box<dyn PlayerController> = Box::new(SearchAI::new(
            PlayerId::Player1,
            "AI-P1",
            config.search.clone(),
            HeuristicEvaluator::new(config.weights.clone()),
        ));
        let p2: Box<dyn PlayerController> = match config.opponent {
            Opponent::Search => Box::new(SearchAI::new(
                PlayerId::Player2,
                "AI-P2",
                config.search.clone(),
                HeuristicEvaluator::new(config.weights.clone()),
            )),
            Opponent::Random => Box::new(RandomAI::new("Random-P2", game_seed)),
        };

        let mut game = Game::new(config.mode);
        if config.stochastic {
            game = game.stochastic(game_seed);
        }
        let summary = game.play(p1.as_ref(), p2.as_ref())?;

        let elapsed = start_time.elapsed();
        let result = GameResult {
            winner: summary.winner,
            end: summary.end,
            moves: summary.moves,
            fours: summary.fours,
            time_ms: elapsed.as_millis(),
            final_board: game.board.to_display_string(),
        };
        stats.add_result(result);
        stats.last_board = Some(game.board.clone());

        info!(
            game = game_num,
            total = config.num_games,
            winner = ?summary.winner,
            end = ?summary.end,
            moves = summary.moves,
            secs = elapsed.as_secs_f64(),
            "game finished"
        );
        info!(
            p1_wins = stats.p1_wins,
            p2_wins = stats.p2_wins,
            draws = stats.draws,
            avg_moves = stats.avg_moves,
            "running totals"
        );
    }

    Ok(stats)
}
