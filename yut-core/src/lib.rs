//! Yut Nori core - board graph, movement, and the turn state machine
//!
//! This crate provides the game engine for a polygonal yut board:
//! - Board topology (square, pentagon, or hexagon perimeter with
//!   diagonal shortcuts through the center)
//! - Pieces, carried groups, and their recorded paths
//! - Landing rules (grouping and capture) as pure predicates
//! - The movement algorithm with branch selection and lap detection
//! - The per-turn throw/selection state machine
//!
//! Rendering, dialogs, and setup input live outside this crate; callers
//! drive a match through [`Game`] and observe state through its queries.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod movement;
pub mod pieces;
pub mod rules;
pub mod throw;

// Re-exports for convenient access
pub use board::{Board, BoardShape, Cell, CellId, CellKind, CELLS_PER_EDGE};
pub use config::GameConfig;
pub use error::GameError;
pub use game::{Game, GameStatus, Player, PlayerId, TurnPhase};
pub use movement::MoveReport;
pub use pieces::{Group, GroupId, Membership, Piece, PieceId, PieceState, Pieces};
pub use throw::{ThrowResult, ThrowService};
