//! Pieces, groups, and their movement primitives
//!
//! Occupancy lives in the board's per-cell occupant lists; each piece
//! co-maintains its current cell as a handle updated only by the move
//! primitives here, so the two views never disagree.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Board, CellId};
use crate::error::GameError;
use crate::game::PlayerId;

/// Handle into the piece arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId(u16);

/// Handle into the group table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(u32);

/// Lifecycle of a piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceState {
    /// Created at setup; rests at the start cell until its first forward move
    NotStarted,
    OnBoard,
    /// Completed a lap; removed from board occupancy for good
    Finished,
}

/// Whether a piece moves alone or as part of a carried group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Membership {
    Alone,
    Grouped(GroupId),
}

/// A single movable token
#[derive(Clone, Debug)]
pub struct Piece {
    owner: PlayerId,
    state: PieceState,
    /// Current cell; `None` once finished
    pos: Option<CellId>,
    /// Every cell visited since leaving start, start included. Stale while
    /// grouped; the group's shared path is canonical then.
    path: Vec<CellId>,
    membership: Membership,
}

impl Piece {
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn state(&self) -> PieceState {
        self.state
    }

    pub fn pos(&self) -> Option<CellId> {
        self.pos
    }

    pub fn path(&self) -> &[CellId] {
        &self.path
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }
}

/// Same-owner pieces sharing one cell and moving as a unit
#[derive(Clone, Debug)]
pub struct Group {
    members: Vec<PieceId>,
    /// Path of the most recently merged piece; canonical for the whole unit
    path: Vec<CellId>,
}

impl Group {
    pub fn members(&self) -> &[PieceId] {
        &self.members
    }

    pub fn path(&self) -> &[CellId] {
        &self.path
    }
}

/// Arena of all pieces in a match plus the live group table
#[derive(Clone, Debug, Default)]
pub struct Pieces {
    slots: Vec<Piece>,
    groups: FxHashMap<GroupId, Group>,
    next_group: u32,
}

impl Pieces {
    /// Create a piece NOT_STARTED at the start cell
    pub(crate) fn spawn(&mut self, board: &mut Board, owner: PlayerId) -> PieceId {
        let start = board.start();
        let id = PieceId(self.slots.len() as u16);
        self.slots.push(Piece {
            owner,
            state: PieceState::NotStarted,
            pos: Some(start),
            path: vec![start],
            membership: Membership::Alone,
        });
        board.add_occupant(start, id);
        id
    }

    pub fn get(&self, id: PieceId) -> &Piece {
        &self.slots[id.0 as usize]
    }

    fn get_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.slots[id.0 as usize]
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// The piece itself, or every member of its group
    pub fn unit_members(&self, piece: PieceId) -> Vec<PieceId> {
        match self.get(piece).membership {
            Membership::Alone => vec![piece],
            Membership::Grouped(gid) => self.groups[&gid].members.clone(),
        }
    }

    /// Canonical path of the moving unit
    pub fn unit_path(&self, piece: PieceId) -> &[CellId] {
        match self.get(piece).membership {
            Membership::Alone => &self.get(piece).path,
            Membership::Grouped(gid) => &self.groups[&gid].path,
        }
    }

    /// Relocate the unit one cell forward, recording the hop
    pub(crate) fn move_unit_to(&mut self, board: &mut Board, piece: PieceId, dest: CellId) {
        for member in self.unit_members(piece) {
            self.relocate(board, member, dest);
            let p = self.get_mut(member);
            p.state = PieceState::OnBoard;
            if let Membership::Alone = p.membership {
                p.path.push(dest);
            }
        }
        if let Membership::Grouped(gid) = self.get(piece).membership {
            self.groups.get_mut(&gid).expect("live group").path.push(dest);
        }
    }

    /// Pop the last recorded hop and relocate the unit to the cell before
    /// it. Fails when nothing beyond the start cell is recorded.
    pub(crate) fn step_unit_back(
        &mut self,
        board: &mut Board,
        piece: PieceId,
    ) -> Result<CellId, GameError> {
        if self.unit_path(piece).len() < 2 {
            return Err(GameError::NoStepHistory);
        }
        let prev = match self.get(piece).membership {
            Membership::Alone => {
                let p = self.get_mut(piece);
                p.path.pop();
                *p.path.last().expect("path keeps its start entry")
            }
            Membership::Grouped(gid) => {
                let g = self.groups.get_mut(&gid).expect("live group");
                g.path.pop();
                *g.path.last().expect("path keeps its start entry")
            }
        };
        for member in self.unit_members(piece) {
            self.relocate(board, member, prev);
        }
        Ok(prev)
    }

    /// Merge the moved unit with the same-owner occupants it landed on.
    /// The arriving unit's path becomes the group's shared path, since
    /// path length decides capture and finish timing.
    pub(crate) fn merge_at(&mut self, moved: PieceId, others: &[PieceId]) -> GroupId {
        let shared = self.unit_path(moved).to_vec();

        let mut members = Vec::new();
        for &piece in others.iter().chain(std::iter::once(&moved)) {
            for member in self.unit_members(piece) {
                if !members.contains(&member) {
                    members.push(member);
                }
            }
        }
        // retire any groups the members arrived in
        for &member in &members {
            if let Membership::Grouped(old) = self.get(member).membership {
                self.groups.remove(&old);
            }
        }

        let gid = GroupId(self.next_group);
        self.next_group += 1;
        for &member in &members {
            self.get_mut(member).membership = Membership::Grouped(gid);
        }
        self.groups.insert(
            gid,
            Group {
                members,
                path: shared,
            },
        );
        gid
    }

    /// Capture consequence: detach from any group, reset to NOT_STARTED at
    /// the start cell with a fresh path.
    pub(crate) fn send_home(&mut self, board: &mut Board, piece: PieceId) {
        self.detach(piece);
        let start = board.start();
        self.relocate(board, piece, start);
        let p = self.get_mut(piece);
        p.state = PieceState::NotStarted;
        p.path = vec![start];
    }

    /// Finish consequence: the whole unit leaves board occupancy for good
    pub(crate) fn finish_unit(&mut self, board: &mut Board, piece: PieceId) -> Vec<PieceId> {
        let members = self.unit_members(piece);
        if let Membership::Grouped(gid) = self.get(piece).membership {
            self.groups.remove(&gid);
        }
        for &member in &members {
            let pos = self.get(member).pos;
            if let Some(cell) = pos {
                board.remove_occupant(cell, member);
            }
            let p = self.get_mut(member);
            p.state = PieceState::Finished;
            p.pos = None;
            p.membership = Membership::Alone;
        }
        members
    }

    fn detach(&mut self, piece: PieceId) {
        if let Membership::Grouped(gid) = self.get(piece).membership {
            if let Some(group) = self.groups.get_mut(&gid) {
                group.members.retain(|&m| m != piece);
                if group.members.is_empty() {
                    self.groups.remove(&gid);
                }
            }
            self.get_mut(piece).membership = Membership::Alone;
        }
    }

    fn relocate(&mut self, board: &mut Board, piece: PieceId, dest: CellId) {
        let old = self.get(piece).pos;
        if let Some(cell) = old {
            board.remove_occupant(cell, piece);
        }
        board.add_occupant(dest, piece);
        self.get_mut(piece).pos = Some(dest);
    }
}
