use crate::core::{BoardState, PlayerId, Result};
use crate::player::ai::outcome::sample_outcome;
use crate::player::PlayerController;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// When a game is over and how the winner is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// The first four-in-a-row wins; a full board without one is a draw.
    #[default]
    FirstToConnect,
    /// Play until the board is full; the side with more fours wins.
    FullBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEnd {
    Connected,
    BoardFull,
    Resigned,
}

/// One turn: the column a player aimed at and the column the piece landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub side: PlayerId,
    pub intended: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub winner: Option<PlayerId>,
    pub end: GameEnd,
    pub moves: usize,
    /// Connected fours per side, indexed by `PlayerId::index`.
    pub fours: [usize; 2],
}

pub struct Game {
    pub board: BoardState,
    pub current_player: PlayerId,
    pub mode: GameMode,
    pub history: Vec<TurnRecord>,
    rng: Option<StdRng>,
}

impl Game {
    pub fn new(mode: GameMode) -> Self {
        Self::with_board(BoardState::new(), mode)
    }

    /// Continues from an existing position; the side that did not make the last
    /// move is to play.
    pub fn with_board(board: BoardState, mode: GameMode) -> Self {
        let current_player = board
            .move_history()
            .last()
            .map(|m| m.side.opponent())
            .unwrap_or(PlayerId::Player1);
        Game {
            board,
            current_player,
            mode,
            history: Vec::new(),
            rng: None,
        }
    }

    /// Executes every move through the misplacement model, drawing from `seed`.
    pub fn stochastic(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    fn summary(&self, winner: Option<PlayerId>, end: GameEnd) -> GameSummary {
        GameSummary {
            winner,
            end,
            moves: self.board.move_count(),
            fours: [
                self.board.count_sequences(PlayerId::Player1, 4),
                self.board.count_sequences(PlayerId::Player2, 4),
            ],
        }
    }

    /// The result of the current position, if the game is over.
    pub fn result(&self) -> Option<GameSummary> {
        match self.mode {
            GameMode::FirstToConnect => {
                for side in [PlayerId::Player1, PlayerId::Player2] {
                    if self.board.check_win(side) {
                        return Some(self.summary(Some(side), GameEnd::Connected));
                    }
                }
                self.board
                    .is_full()
                    .then(|| self.summary(None, GameEnd::BoardFull))
            }
            GameMode::FullBoard => {
                if !self.board.is_full() {
                    return None;
                }
                let summary = self.summary(None, GameEnd::BoardFull);
                let winner = match summary.fours[0].cmp(&summary.fours[1]) {
                    std::cmp::Ordering::Greater => Some(PlayerId::Player1),
                    std::cmp::Ordering::Less => Some(PlayerId::Player2),
                    std::cmp::Ordering::Equal => None,
                };
                Some(GameSummary { winner, ..summary })
            }
        }
    }

    /// Lets `controller` play one turn for the current player.
    ///
    /// Returns the summary once the game is over, `None` while it continues.
    pub fn step(&mut self, controller: &dyn PlayerController) -> Result<Option<GameSummary>> {
        if let Some(summary) = self.result() {
            return Ok(Some(summary));
        }

        let side = self.current_player;
        let legal_moves = self.board.get_valid_moves();
        let Some(intended) = controller.choose_move(&self.board, &legal_moves) else {
            debug!(player = controller.name(), side = %side, "resigned");
            return Ok(Some(self.summary(Some(side.opponent()), GameEnd::Resigned)));
        };

        let column = match self.rng.as_mut() {
            Some(rng) => sample_outcome(&self.board, intended, rng)?,
            None => intended,
        };
        self.board.apply_move(side, column)?;
        self.history.push(TurnRecord {
            side,
            intended,
            column,
        });
        debug!(
            player = controller.name(),
            side = %side,
            intended,
            column,
            "move played"
        );

        self.current_player = side.opponent();
        Ok(self.result())
    }

    /// Plays to the end with `p1` as `Player1` and `p2` as `Player2`.
    pub fn play(
        &mut self,
        p1: &dyn PlayerController,
        p2: &dyn PlayerController,
    ) -> Result<GameSummary> {
        loop {
            let controller = match self.current_player {
                PlayerId::Player1 => p1,
                PlayerId::Player2 => p2,
            };
            if let Some(summary) = self.step(controller)? {
                return Ok(summary);
            }
        }
    }
}
