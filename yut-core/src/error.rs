//! Error types for match setup and play

use thiserror::Error;

/// Errors surfaced by the engine
///
/// Configuration variants are fatal to setup and never retried internally;
/// illegal-operation variants reject the call as a no-op and leave the
/// match state untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    // Configuration
    #[error("player count {0} outside the allowed 2..=4")]
    PlayerCount(usize),

    #[error("pieces per player {0} outside the allowed 2..=5")]
    PieceCount(u8),

    #[error("no board shape with {0} vertices")]
    UnsupportedShape(u8),

    #[error("player name must not be empty")]
    EmptyPlayerName,

    // Illegal operations
    #[error("match has not been started")]
    NotStarted,

    #[error("match has already been started")]
    AlreadyStarted,

    #[error("match is already over")]
    GameOver,

    #[error("operation not allowed in the current turn phase")]
    WrongPhase,

    #[error("throw outcome does not match the next queued outcome")]
    OutcomeMismatch,

    #[error("it is not that player's turn")]
    NotYourTurn,

    #[error("piece belongs to another player")]
    NotYourPiece,

    #[error("piece has already finished")]
    PieceFinished,

    #[error("no recorded movement to step back through")]
    NoStepHistory,
}
