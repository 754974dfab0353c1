//! Error types for the round layer.
//!
//! Game-level misuse (tapping during the countdown, pausing twice) is not
//! an error: the engine absorbs it as a no-op. The only failure a caller
//! can see is the engine task being gone.

/// Errors returned by [`EngineHandle`](crate::EngineHandle).
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    /// The engine task has stopped; its command channel is closed.
    #[error("round engine is unavailable")]
    Unavailable,
}
