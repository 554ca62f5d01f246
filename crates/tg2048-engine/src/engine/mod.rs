//! Engine module: plain 4x4 grid, tile spawning, the slide/merge pass and
//! the game lifecycle.
//!
//! - `Grid` is the owned cell array with checked `get`/`set`.
//! - `apply_direction` is the single traversal shared by all four moves.
//! - `Game` is what front ends hold; it owns its grid and random source.

mod error;
mod game;
mod ops;
mod spawn;
pub mod state;

pub use error::EngineError;
pub use game::{Game, GameState, MoveOutcome};
pub use ops::apply_direction;
pub use spawn::{Spawn, Spawner, resolve_collision};
pub use state::{GRID_SIZE, Grid, Move, SEED_VALUE};
