//! Polygonal board as a directed cell graph
//!
//! The perimeter is one vertex plus four plain cells per side, linked
//! circularly. Every interior vertex branches through two diagonal cells
//! to the center; the center continues through two diagonal cells to the
//! last vertex (outgoing index 0) and through two more back to the start
//! vertex (outgoing index 1), closing the loop through the middle as an
//! alternate path.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GameError;
use crate::pieces::PieceId;

/// Plain cells between two vertices
pub const CELLS_PER_EDGE: u8 = 4;

/// Supported board polygons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardShape {
    Square,
    Pentagon,
    Hexagon,
}

impl BoardShape {
    pub fn vertex_count(self) -> u8 {
        match self {
            BoardShape::Square => 4,
            BoardShape::Pentagon => 5,
            BoardShape::Hexagon => 6,
        }
    }

    pub fn from_vertex_count(vertices: u8) -> Result<Self, GameError> {
        match vertices {
            4 => Ok(BoardShape::Square),
            5 => Ok(BoardShape::Pentagon),
            6 => Ok(BoardShape::Hexagon),
            other => Err(GameError::UnsupportedShape(other)),
        }
    }
}

/// Handle into the board's cell arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(u16);

/// Role of a cell, encoded in its display name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Perimeter vertex `V{i}`; `V0` is the start
    Vertex(u8),
    /// Plain perimeter cell `E{side}_{slot}`
    Edge { side: u8, slot: u8 },
    /// Diagonal shortcut cell `D{vertex}_{slot}`
    Diagonal { vertex: u8, slot: u8 },
    /// Center cell `C`
    Center,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Vertex(i) => write!(f, "V{}", i),
            CellKind::Edge { side, slot } => write!(f, "E{}_{}", side, slot),
            CellKind::Diagonal { vertex, slot } => write!(f, "D{}_{}", vertex, slot),
            CellKind::Center => f.write_str("C"),
        }
    }
}

/// One node of the board graph
#[derive(Clone, Debug)]
pub struct Cell {
    kind: CellKind,
    /// Ordered outgoing edges: index 0 is the committed path, index 1
    /// (present only at branch cells) the shortcut taken on a first hop
    next: Vec<CellId>,
    occupants: Vec<PieceId>,
}

impl Cell {
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn name(&self) -> String {
        self.kind.to_string()
    }

    pub fn next(&self) -> &[CellId] {
        &self.next
    }

    pub fn occupants(&self) -> &[PieceId] {
        &self.occupants
    }
}

/// The board graph, immutable in topology after `build`
#[derive(Clone, Debug)]
pub struct Board {
    shape: BoardShape,
    cells: Vec<Cell>,
    by_name: FxHashMap<String, CellId>,
    start: CellId,
    center: CellId,
}

impl Board {
    /// Deterministically construct the graph for a shape. Pure; no
    /// randomness.
    pub fn build(shape: BoardShape) -> Self {
        let sides = shape.vertex_count();
        let mut builder = Builder::default();

        // Perimeter: vertex then four plain cells, per side
        let mut perimeter = Vec::new();
        for i in 0..sides {
            perimeter.push(builder.add(CellKind::Vertex(i)));
            for j in 0..CELLS_PER_EDGE {
                perimeter.push(builder.add(CellKind::Edge { side: i, slot: j }));
            }
        }
        let stride = 1 + CELLS_PER_EDGE as usize;

        // Circular linkage along the perimeter
        let len = perimeter.len();
        for k in 0..len {
            builder.link(perimeter[k], perimeter[(k + 1) % len]);
        }

        let center = builder.add(CellKind::Center);

        // Interior vertices branch toward the center
        for i in 1..sides - 1 {
            let d0 = builder.add(CellKind::Diagonal { vertex: i, slot: 0 });
            let d1 = builder.add(CellKind::Diagonal { vertex: i, slot: 1 });
            builder.link(perimeter[i as usize * stride], d0);
            builder.link(d0, d1);
            builder.link(d1, center);
        }

        // Center onward to the last vertex (committed path)
        let last = sides - 1;
        let d0 = builder.add(CellKind::Diagonal { vertex: last, slot: 0 });
        let d1 = builder.add(CellKind::Diagonal { vertex: last, slot: 1 });
        builder.link(center, d0);
        builder.link(d0, d1);
        builder.link(d1, perimeter[last as usize * stride]);

        // Center back to the start vertex (shortcut branch)
        let d0 = builder.add(CellKind::Diagonal { vertex: 0, slot: 0 });
        let d1 = builder.add(CellKind::Diagonal { vertex: 0, slot: 1 });
        builder.link(center, d0);
        builder.link(d0, d1);
        builder.link(d1, perimeter[0]);

        Self {
            shape,
            cells: builder.cells,
            by_name: builder.by_name,
            start: perimeter[0],
            center,
        }
    }

    pub fn shape(&self) -> BoardShape {
        self.shape
    }

    pub fn start(&self) -> CellId {
        self.start
    }

    pub fn center(&self) -> CellId {
        self.center
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0 as usize]
    }

    pub fn cell_by_name(&self, name: &str) -> Option<CellId> {
        self.by_name.get(name).copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate all cells in construction order
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId(i as u16), c))
    }

    pub(crate) fn add_occupant(&mut self, cell: CellId, piece: PieceId) {
        let occupants = &mut self.cells[cell.0 as usize].occupants;
        debug_assert!(!occupants.contains(&piece), "piece already on cell");
        occupants.push(piece);
    }

    pub(crate) fn remove_occupant(&mut self, cell: CellId, piece: PieceId) {
        let occupants = &mut self.cells[cell.0 as usize].occupants;
        debug_assert!(occupants.contains(&piece), "piece not on cell");
        occupants.retain(|&p| p != piece);
    }
}

#[derive(Default)]
struct Builder {
    cells: Vec<Cell>,
    by_name: FxHashMap<String, CellId>,
}

impl Builder {
    fn add(&mut self, kind: CellKind) -> CellId {
        let id = CellId(self.cells.len() as u16);
        self.by_name.insert(kind.to_string(), id);
        self.cells.push(Cell {
            kind,
            next: Vec::new(),
            occupants: Vec::new(),
        });
        id
    }

    fn link(&mut self, from: CellId, to: CellId) {
        let next = &mut self.cells[from.0 as usize].next;
        debug_assert!(next.len() < 2, "a cell has at most two outgoing edges");
        next.push(to);
    }
}
