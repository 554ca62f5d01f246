//! tg2048-engine: rules engine for a 4x4 sliding-tile merging puzzle
//!
//! This crate provides:
//! - A `Grid` of plain tile values with bounds-checked access and text rendering
//! - A `Spawner` that drops seed tiles using a forward wraparound collision scan
//! - The slide/merge pass (`engine::apply_direction`) with chained merges
//! - A `Game` tying grid, score and lifecycle together
//!
//! Quick start:
//! ```
//! use tg2048_engine::engine::{Game, Move, MoveOutcome};
//!
//! let mut game = Game::from_seed(42);
//! assert_eq!(game.grid().occupied(), 2);
//! match game.apply_direction(Move::Left).unwrap() {
//!     MoveOutcome::Moved { delta, .. } => assert_eq!(game.score(), delta),
//!     MoveOutcome::GameOver { .. } => unreachable!("two tiles never fill the board"),
//! }
//! println!("{}", game.render_with_best(0));
//! ```
//!
pub mod engine;

pub use engine::{EngineError, Game, GameState, Grid, Move, MoveOutcome, Spawn};
