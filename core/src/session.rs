use serde::{Deserialize, Serialize};

use crate::*;

/// Global counters a renderer shows next to the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub remaining_mine_count: isize,
    pub elapsed_seconds: u32,
    pub game_over: bool,
    pub did_win: bool,
}

/// One game held by the caller: the board plus its elapsed-seconds clock.
///
/// The caller drives the clock by calling [`GameSession::tick`] once per
/// second, and must keep exactly one tick source alive while
/// [`GameSession::is_ticking`] is true and none otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    difficulty: Option<Difficulty>,
    board: Board,
    timer: ElapsedTimer,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        log::debug!("New {} game, seed: {}", difficulty, seed);
        Self {
            difficulty: Some(difficulty),
            board: Board::new(difficulty.config(), seed),
            timer: ElapsedTimer::new(),
        }
    }

    /// Session over a custom config that is not one of the presets.
    pub fn with_config(config: GameConfig, seed: u64) -> Self {
        log::debug!("New custom game {:?}, seed: {}", config, seed);
        Self::with_board(Board::new(config, seed))
    }

    /// Session over an existing board, the clock runs if play is underway.
    pub fn with_board(board: Board) -> Self {
        let mut timer = ElapsedTimer::new();
        if matches!(board.state(), BoardState::Active) {
            timer.start();
        }
        Self {
            difficulty: None,
            board,
            timer,
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let was_ready = self.board.state().is_ready();
        let outcome = self.board.reveal(coords)?;

        if was_ready && outcome.has_update() && !outcome.is_final() {
            self.timer.start();
        }

        match outcome {
            RevealOutcome::HitMine => {
                self.timer.stop();
                log::info!(
                    "Hit a mine at {:?} after {}s",
                    coords,
                    self.timer.elapsed_secs()
                );
            }
            RevealOutcome::Won => {
                self.timer.stop();
                log::info!("Won in {}s", self.timer.elapsed_secs());
            }
            RevealOutcome::Revealed | RevealOutcome::NoChange => {}
        }

        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.board.toggle_flag(coords)
    }

    /// One-second tick, returns whether the elapsed time changed.
    pub fn tick(&mut self) -> bool {
        self.timer.tick()
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_running()
    }

    /// Stops the clock, the session no longer needs a tick source.
    pub fn dispose(&mut self) {
        if self.timer.is_running() {
            log::debug!("Timer stopped at {}s", self.timer.elapsed_secs());
        }
        self.timer.stop();
    }

    /// Ends this game and replaces it wholesale with a fresh one.
    pub fn new_game(&mut self, difficulty: Difficulty, seed: u64) {
        self.dispose();
        *self = Self::new(difficulty, seed);
    }

    /// Starts again with the same difficulty or config.
    pub fn restart(&mut self, seed: u64) {
        self.dispose();
        *self = match self.difficulty {
            Some(difficulty) => Self::new(difficulty, seed),
            None => Self::with_config(self.board.config(), seed),
        };
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    pub fn status(&self) -> GameStatus {
        GameStatus {
            remaining_mine_count: self.board.remaining_mine_count(),
            elapsed_seconds: self.timer.elapsed_secs(),
            game_over: self.board.game_over(),
            did_win: self.board.did_win(),
        }
    }
}
