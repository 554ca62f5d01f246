use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::EngineError;
use super::ops;
use super::spawn::{Spawn, Spawner};
use super::state::{Grid, Move};

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Active,
    Over,
}

/// Result of a directional move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Tiles slid (possibly not at all) and a new seed tile was placed.
    Moved { delta: u32, spawn: Spawn },
    /// No room was left for the new tile; the game has ended.
    GameOver { score: u32 },
}

/// One player's game: grid, accumulated score and lifecycle.
///
/// Owns its random source so a seeded game replays identically.
#[derive(Debug, Clone)]
pub struct Game<R = StdRng> {
    grid: Grid,
    score: u32,
    state: GameState,
    spawner: Spawner<R>,
}

impl Game<StdRng> {
    /// Fresh game seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Fresh game with a deterministic random source.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Game<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Game<R> {
    /// Fresh game drawing spawn positions from `rng`.
    pub fn with_rng(rng: R) -> Self {
        let mut game = Self {
            grid: Grid::EMPTY,
            score: 0,
            state: GameState::Active,
            spawner: Spawner::new(rng),
        };
        game.prepare();
        game
    }

    /// Continue from a known position, e.g. a saved or hand-built grid.
    ///
    /// ```
    /// use tg2048_engine::engine::{Game, Grid, Move, MoveOutcome};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let mut game = Game::resume(grid, 100, StdRng::seed_from_u64(0));
    /// assert!(matches!(game.apply_direction(Move::Right), Ok(MoveOutcome::Moved { delta: 4, .. })));
    /// assert_eq!(game.score(), 104);
    /// ```
    pub fn resume(grid: Grid, score: u32, rng: R) -> Self {
        Self {
            grid,
            score,
            state: GameState::Active,
            spawner: Spawner::new(rng),
        }
    }

    /// Reset to two seed tiles on an empty grid and score 0.
    fn prepare(&mut self) {
        let mut grid = Grid::EMPTY;
        for _ in 0..2 {
            // Two placements can never exhaust an empty 4x4 grid.
            if let Err(err) = self.spawner.place_random_tile(&mut grid) {
                unreachable!("seeding an empty grid failed: {err}");
            }
        }
        self.grid = grid;
        self.score = 0;
        self.state = GameState::Active;
    }

    /// Slide/merge in `direction`, add the gain to the score, then spawn.
    ///
    /// A spawn failure ends the game and is reported as
    /// `MoveOutcome::GameOver`. Moving an ended game is `NotActive`.
    pub fn apply_direction(&mut self, direction: Move) -> Result<MoveOutcome, EngineError> {
        if self.state == GameState::Over {
            return Err(EngineError::NotActive { score: self.score });
        }
        let delta = ops::apply_direction(&mut self.grid, direction);
        self.score += delta;
        match self.spawner.place_random_tile(&mut self.grid) {
            Ok(spawn) => Ok(MoveOutcome::Moved { delta, spawn }),
            Err(EngineError::BoardFull) => {
                self.state = GameState::Over;
                debug!("game over with score {}", self.score);
                Ok(MoveOutcome::GameOver { score: self.score })
            }
            Err(err) => Err(err),
        }
    }

    /// Throw the current game away and start over. Valid in any state.
    pub fn restart(&mut self) {
        debug!("restarting game (score was {})", self.score);
        self.prepare();
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.state == GameState::Over
    }

    /// Score line followed by the grid table.
    pub fn render_with_best(&self, best: u32) -> String {
        format!("Score: {} Best: {}\n{}", self.score, best, self.grid)
    }
}
