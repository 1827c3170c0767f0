//! Pure landing predicates
//!
//! Both look only at a cell's ON_BOARD occupants; tokens resting at start
//! before their first move never group or get captured. At most one of
//! the two holds for any landing. No side effects; callers apply the
//! consequence.

use crate::board::{Board, CellId};
use crate::game::PlayerId;
use crate::pieces::{PieceId, PieceState, Pieces};

fn on_board_occupants<'a>(
    board: &'a Board,
    pieces: &'a Pieces,
    cell: CellId,
) -> impl Iterator<Item = (PieceId, PlayerId)> + 'a {
    board
        .cell(cell)
        .occupants()
        .iter()
        .filter(|&&p| pieces.get(p).state() == PieceState::OnBoard)
        .map(|&p| (p, pieces.get(p).owner()))
}

/// At least two on-board occupants, all one owner
pub fn eligible_for_grouping(board: &Board, pieces: &Pieces, cell: CellId) -> bool {
    let mut owners = on_board_occupants(board, pieces, cell).map(|(_, o)| o);
    let first = match owners.next() {
        Some(o) => o,
        None => return false,
    };
    let mut count = 1;
    for owner in owners {
        if owner != first {
            return false;
        }
        count += 1;
    }
    count >= 2
}

/// At least two on-board occupants with mixed owners
pub fn eligible_for_capture(board: &Board, pieces: &Pieces, cell: CellId) -> bool {
    let mut owners = on_board_occupants(board, pieces, cell).map(|(_, o)| o);
    let first = match owners.next() {
        Some(o) => o,
        None => return false,
    };
    owners.any(|owner| owner != first)
}

/// On-board occupants of `cell` not owned by `owner`
pub fn opposing_occupants(
    board: &Board,
    pieces: &Pieces,
    cell: CellId,
    owner: PlayerId,
) -> Vec<PieceId> {
    on_board_occupants(board, pieces, cell)
        .filter(|&(_, o)| o != owner)
        .map(|(p, _)| p)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardShape;

    struct Fixture {
        board: Board,
        pieces: Pieces,
        mine: [PieceId; 2],
        theirs: PieceId,
        cell: CellId,
    }

    fn fixture() -> Fixture {
        let mut board = Board::build(BoardShape::Square);
        let mut pieces = Pieces::default();
        let mine = [
            pieces.spawn(&mut board, PlayerId(0)),
            pieces.spawn(&mut board, PlayerId(0)),
        ];
        let theirs = pieces.spawn(&mut board, PlayerId(1));
        let cell = board.cell_by_name("E1_2").unwrap();
        Fixture {
            board,
            pieces,
            mine,
            theirs,
            cell,
        }
    }

    #[test]
    fn test_lone_occupant_triggers_neither() {
        let mut f = fixture();
        f.pieces.move_unit_to(&mut f.board, f.mine[0], f.cell);
        assert!(!eligible_for_grouping(&f.board, &f.pieces, f.cell));
        assert!(!eligible_for_capture(&f.board, &f.pieces, f.cell));
    }

    #[test]
    fn test_same_owner_pair_groups() {
        let mut f = fixture();
        f.pieces.move_unit_to(&mut f.board, f.mine[0], f.cell);
        f.pieces.move_unit_to(&mut f.board, f.mine[1], f.cell);
        assert!(eligible_for_grouping(&f.board, &f.pieces, f.cell));
        assert!(!eligible_for_capture(&f.board, &f.pieces, f.cell));
    }

    #[test]
    fn test_mixed_owners_capture() {
        let mut f = fixture();
        f.pieces.move_unit_to(&mut f.board, f.mine[0], f.cell);
        f.pieces.move_unit_to(&mut f.board, f.theirs, f.cell);
        assert!(!eligible_for_grouping(&f.board, &f.pieces, f.cell));
        assert!(eligible_for_capture(&f.board, &f.pieces, f.cell));
    }

    #[test]
    fn test_not_started_tokens_are_ignored() {
        let f = fixture();
        // everything still rests at start, NOT_STARTED
        let start = f.board.start();
        assert_eq!(f.board.cell(start).occupants().len(), 3);
        assert!(!eligible_for_grouping(&f.board, &f.pieces, start));
        assert!(!eligible_for_capture(&f.board, &f.pieces, start));
    }

    #[test]
    fn test_opposing_occupants_lists_only_enemies() {
        let mut f = fixture();
        f.pieces.move_unit_to(&mut f.board, f.mine[0], f.cell);
        f.pieces.move_unit_to(&mut f.board, f.theirs, f.cell);
        let opposing = opposing_occupants(&f.board, &f.pieces, f.cell, PlayerId(0));
        assert_eq!(opposing, vec![f.theirs]);
    }
}
