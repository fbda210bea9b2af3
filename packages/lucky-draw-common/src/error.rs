use thiserror::Error;

/// Validation failures raised by the draw engine.
///
/// Every variant is raised before any state is touched, so a failed call
/// leaves the session exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("no valid candidates found")]
    NoCandidates,

    #[error("no available candidates to draw from")]
    EmptyPool,

    #[error("cannot draw {requested} winners from {available} available candidates")]
    InsufficientCandidates { requested: usize, available: usize },

    #[error("invalid draw size: requested {requested} from {available} candidates")]
    InvalidDrawSize { requested: usize, available: usize },

    #[error("no draws to undo")]
    NoDrawsToUndo,

    #[error("draw {draw_id} not found")]
    DrawNotFound { draw_id: u64 },

    #[error("draw {draw_id} has no forfeited winners awaiting a redraw")]
    NoForfeitsToRedraw { draw_id: u64 },

    #[error("draw {draw_id} has no redraws to undo")]
    NoForfeitsToUndo { draw_id: u64 },

    #[error("prize {prize_id} has already been drawn and cannot be deleted")]
    CannotDeleteDrawnPrize { prize_id: u64 },

    #[error("prize {prize_id} not found")]
    PrizeNotFound { prize_id: u64 },

    #[error("prize {prize_id} has already been drawn")]
    PrizeAlreadyDrawn { prize_id: u64 },

    #[error("prize name cannot be empty")]
    EmptyPrizeName,

    #[error("winner count must be at least 1, got {count}")]
    InvalidWinnerCount { count: u32 },
}
