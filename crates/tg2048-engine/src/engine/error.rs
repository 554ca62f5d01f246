/// Failures reported by the engine.
///
/// `BoardFull` is the expected end of a game rather than a fault; `Game`
/// turns it into `MoveOutcome::GameOver` so callers never see it from a move.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    IndexOutOfRange { row: usize, col: usize, size: usize },
    #[error("no empty cell left on the board")]
    BoardFull,
    #[error("game is over (final score {score}); restart to keep playing")]
    NotActive { score: u32 },
}
