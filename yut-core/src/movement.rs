//! The movement algorithm
//!
//! Given a piece (standing in for its whole group) and a throw outcome:
//! step along the graph with the branch policy, detect lap completion,
//! then apply exactly one grouping-or-capture evaluation on the final
//! destination.

use crate::board::{Board, CellId};
use crate::error::GameError;
use crate::pieces::{PieceId, PieceState, Pieces};
use crate::rules;
use crate::throw::ThrowResult;

/// What one applied move did, for the turn machine and callers to act on
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Final cell; `None` when the mover finished its lap
    pub destination: Option<CellId>,
    /// Opposing pieces sent back to start
    pub captured: Vec<PieceId>,
    /// Mover-side pieces that finished on this move
    pub finished: Vec<PieceId>,
    /// Whether the mover merged with same-owner occupants on landing
    pub grouped: bool,
}

/// Advance `piece` (or its group) per `throw` and apply the landing rules
pub fn apply_move(
    board: &mut Board,
    pieces: &mut Pieces,
    piece: PieceId,
    throw: ThrowResult,
) -> Result<MoveReport, GameError> {
    if pieces.get(piece).state() == PieceState::Finished {
        return Err(GameError::PieceFinished);
    }
    if throw == ThrowResult::BackDo {
        back_move(board, pieces, piece)
    } else {
        forward_move(board, pieces, piece, throw.steps() as u8)
    }
}

fn back_move(
    board: &mut Board,
    pieces: &mut Pieces,
    piece: PieceId,
) -> Result<MoveReport, GameError> {
    // A piece that never left start has nowhere to step back to; that is
    // a do-nothing move, not an error. An on-board piece with no recorded
    // history beyond start is the illegal case.
    if pieces.get(piece).state() == PieceState::NotStarted {
        return Ok(MoveReport {
            destination: pieces.get(piece).pos(),
            ..MoveReport::default()
        });
    }
    let dest = pieces.step_unit_back(board, piece)?;
    let mut report = MoveReport {
        destination: Some(dest),
        ..MoveReport::default()
    };
    apply_landing(board, pieces, piece, dest, &mut report);
    Ok(report)
}

fn forward_move(
    board: &mut Board,
    pieces: &mut Pieces,
    piece: PieceId,
    steps: u8,
) -> Result<MoveReport, GameError> {
    let start = board.start();
    let mut at = pieces.get(piece).pos().expect("unfinished piece has a cell");

    for hop in 0..steps {
        let exits = board.cell(at).next();
        // The shortcut branch is open only to a unit beginning its move on
        // the branch cell; mid-move the unit keeps to its committed path.
        let first_hop = hop == 0;
        let next = if first_hop && exits.len() == 2 {
            exits[1]
        } else {
            exits[0]
        };

        if next == start && pieces.unit_path(piece).len() > 1 {
            // Lap complete: leftover steps are discarded, never carried
            // into a new lap.
            let finished = pieces.finish_unit(board, piece);
            return Ok(MoveReport {
                destination: None,
                finished,
                ..MoveReport::default()
            });
        }

        pieces.move_unit_to(board, piece, next);
        at = next;
    }

    let mut report = MoveReport {
        destination: Some(at),
        ..MoveReport::default()
    };
    apply_landing(board, pieces, piece, at, &mut report);
    Ok(report)
}

/// Grouping and capture are evaluated once, on the final destination only
fn apply_landing(
    board: &mut Board,
    pieces: &mut Pieces,
    piece: PieceId,
    cell: CellId,
    report: &mut MoveReport,
) {
    let owner = pieces.get(piece).owner();
    debug_assert!(
        !(rules::eligible_for_grouping(board, pieces, cell)
            && rules::eligible_for_capture(board, pieces, cell)),
        "landing cell cannot be both grouping- and capture-eligible"
    );

    if rules::eligible_for_grouping(board, pieces, cell) {
        let unit = pieces.unit_members(piece);
        let others: Vec<PieceId> = board
            .cell(cell)
            .occupants()
            .iter()
            .copied()
            .filter(|p| pieces.get(*p).state() == PieceState::OnBoard && !unit.contains(p))
            .collect();
        if !others.is_empty() {
            pieces.merge_at(piece, &others);
            report.grouped = true;
        }
    } else if rules::eligible_for_capture(board, pieces, cell) {
        for enemy in rules::opposing_occupants(board, pieces, cell, owner) {
            pieces.send_home(board, enemy);
            report.captured.push(enemy);
        }
    }
}
