//! Board generators.
//!
//! One function builds every supported board from a [`Topology`] tag. Node
//! coordinates are in board units where neighbouring grid points sit 100
//! apart; renderers scale them to the screen using [`bounds`].

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::BoardError;
use crate::game::{Board, NodeId, Placement};

/// Largest board any generator will build.
pub const MAX_NODES: usize = 4096;

/// Largest complete graph, which grows quadratically in edges.
pub const MAX_COMPLETE_NODES: usize = 128;

/// Grid spacing in board units.
const SPACING: f64 = 100.0;

/// Node radius on grid boards.
const GRID_RADIUS: f64 = 35.0;

/// Node radius on diamond boards.
const DIAMOND_RADIUS: f64 = 50.0;

/// Error building a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// A generator produced an edge the board refused.
    #[error("generated edge rejected: {0}")]
    Board(#[from] BoardError),
    /// Fewer nodes than the shape needs.
    #[error("{shape} needs at least {minimum} nodes, got {got}")]
    TooSmall {
        /// Shape name.
        shape: &'static str,
        /// Smallest accepted size.
        minimum: usize,
        /// Requested size.
        got: usize,
    },
    /// More nodes than allowed.
    #[error("{shape} would have {nodes} nodes, limit is {limit}")]
    TooLarge {
        /// Shape name.
        shape: &'static str,
        /// Nodes the shape would have.
        nodes: usize,
        /// Largest accepted node count.
        limit: usize,
    },
}

/// Board shape and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Topology {
    /// Orthogonal grid, `width` columns by `height` rows.
    Rect {
        /// Columns.
        width: usize,
        /// Rows.
        height: usize,
    },
    /// Square grid.
    Square {
        /// Side length.
        size: usize,
    },
    /// Single row.
    Path {
        /// Number of nodes.
        size: usize,
    },
    /// Ring.
    Cycle {
        /// Number of nodes.
        size: usize,
    },
    /// Ring plus a hub joined to every rim node.
    Wheel {
        /// Number of rim nodes.
        size: usize,
    },
    /// Every node joined to every other.
    Complete {
        /// Number of nodes.
        size: usize,
    },
    /// Checkerboard lattice joined along the diagonals.
    Diamond {
        /// Side length of the enclosing square.
        size: usize,
    },
}

impl Topology {
    /// Lowercase shape name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Square { .. } => "square",
            Self::Path { .. } => "path",
            Self::Cycle { .. } => "cycle",
            Self::Wheel { .. } => "wheel",
            Self::Complete { .. } => "complete",
            Self::Diamond { .. } => "diamond",
        }
    }

    /// Number of nodes the generated board will have, if it fits in `usize`.
    #[must_use]
    pub fn node_count(&self) -> Option<usize> {
        match *self {
            Self::Rect { width, height } => width.checked_mul(height),
            Self::Square { size } => size.checked_mul(size),
            Self::Path { size } | Self::Cycle { size } | Self::Complete { size } => Some(size),
            Self::Wheel { size } => size.checked_add(1),
            Self::Diamond { size } => size.checked_mul(size).map(|cells| cells.div_ceil(2)),
        }
    }

    /// Check that the shape can be built.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is too small to play on or exceeds the
    /// node limit.
    pub fn check(&self) -> Result<(), TopologyError> {
        let shape = self.name();
        let (minimum, got) = match *self {
            Self::Cycle { size } | Self::Wheel { size } => (3, size),
            Self::Diamond { size } => (2, size),
            _ => (2, self.node_count().unwrap_or(usize::MAX)),
        };
        if got < minimum {
            return Err(TopologyError::TooSmall {
                shape,
                minimum,
                got,
            });
        }

        let limit = match self {
            Self::Complete { .. } => MAX_COMPLETE_NODES,
            _ => MAX_NODES,
        };
        let nodes = self.node_count().unwrap_or(usize::MAX);
        if nodes > limit {
            return Err(TopologyError::TooLarge {
                shape,
                nodes,
                limit,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Rect { width, height } => write!(f, "rect {width}x{height}"),
            Self::Square { size }
            | Self::Path { size }
            | Self::Cycle { size }
            | Self::Wheel { size }
            | Self::Complete { size }
            | Self::Diamond { size } => write!(f, "{} {size}", self.name()),
        }
    }
}

/// Build a board.
///
/// Nodes are unclaimed and empty; adjacency is symmetric.
///
/// # Errors
///
/// Returns an error if the shape is out of range (see [`Topology::check`]).
pub fn generate(topology: Topology) -> Result<Board, TopologyError> {
    topology.check()?;
    match topology {
        Topology::Rect { width, height } => rect(width, height),
        Topology::Square { size } => rect(size, size),
        Topology::Path { size } => rect(size, 1),
        Topology::Cycle { size } => ring(size, false),
        Topology::Wheel { size } => ring(size, true),
        Topology::Complete { size } => complete(size),
        Topology::Diamond { size } => diamond(size),
    }
}

/// Bounding box of a board, padded by one node diameter on every side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Bottom edge.
    pub max_y: f64,
}

impl Bounds {
    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Padded bounding box of every node, or `None` for an empty board.
#[must_use]
pub fn bounds(board: &Board) -> Option<Bounds> {
    board
        .iter()
        .map(|(_, node)| {
            let p = node.placement();
            let pad = 2.0 * p.radius;
            Bounds {
                min_x: p.x - pad,
                min_y: p.y - pad,
                max_x: p.x + pad,
                max_y: p.y + pad,
            }
        })
        .reduce(|a, b| Bounds {
            min_x: a.min_x.min(b.min_x),
            min_y: a.min_y.min(b.min_y),
            max_x: a.max_x.max(b.max_x),
            max_y: a.max_y.max(b.max_y),
        })
}

/// Grid ids run down each column: `index = x * height + y`.
fn rect(width: usize, height: usize) -> Result<Board, TopologyError> {
    let mut board = Board::new();
    for x in 0..width {
        for y in 0..height {
            board.add_node(Placement::new(
                grid_coord(x),
                grid_coord(y),
                GRID_RADIUS,
            ));
        }
    }

    for i in 0..width * height {
        if i % height != height - 1 {
            join(&mut board, i, i + 1)?;
        }
        if i + height < width * height {
            join(&mut board, i, i + height)?;
        }
    }
    Ok(board)
}

/// Rim nodes evenly spaced on a circle of radius 100, optionally with a hub
/// at the centre as the last id.
fn ring(size: usize, hub: bool) -> Result<Board, TopologyError> {
    let (mut board, radius) = circle(size);
    for i in 0..size {
        join(&mut board, i, (i + 1) % size)?;
    }
    if hub {
        board.add_node(Placement::new(0.0, 0.0, radius));
        for i in 0..size {
            join(&mut board, size, i)?;
        }
    }
    Ok(board)
}

fn complete(size: usize) -> Result<Board, TopologyError> {
    let (mut board, _) = circle(size);
    for a in 0..size {
        for b in (a + 1)..size {
            join(&mut board, a, b)?;
        }
    }
    Ok(board)
}

/// Points `(i, j)` with `i + j` even, joined to every point within a
/// diagonal step.
fn diamond(size: usize) -> Result<Board, TopologyError> {
    let mut board = Board::new();
    for i in 0..size {
        for j in 0..size {
            if (i + j) % 2 == 0 {
                board.add_node(Placement::new(
                    grid_coord(i),
                    grid_coord(j),
                    DIAMOND_RADIUS,
                ));
            }
        }
    }
    connect_within(&mut board, SPACING * 2.0_f64.sqrt() + 10.0)?;
    Ok(board)
}

/// Place `size` nodes on a circle and return the board with the node radius.
fn circle(size: usize) -> (Board, f64) {
    #[allow(clippy::cast_precision_loss)]
    let n = size as f64;
    let step = 2.0 * PI / n;
    let chord = (SPACING * step.cos() - SPACING).hypot(SPACING * step.sin());
    let radius = 0.35 * chord;

    let mut board = Board::new();
    for i in 0..size {
        #[allow(clippy::cast_precision_loss)]
        let angle = step * i as f64;
        board.add_node(Placement::new(
            SPACING * angle.cos(),
            SPACING * angle.sin(),
            radius,
        ));
    }
    (board, radius)
}

/// Join every pair of nodes whose centres are at most `reach` apart.
fn connect_within(board: &mut Board, reach: f64) -> Result<(), TopologyError> {
    let points: Vec<(NodeId, Placement)> = board
        .iter()
        .map(|(id, node)| (id, node.placement()))
        .collect();
    for (i, &(a, here)) in points.iter().enumerate() {
        for &(b, there) in &points[i + 1..] {
            if (here.x - there.x).hypot(here.y - there.y) <= reach {
                board.connect(a, b)?;
            }
        }
    }
    Ok(())
}

/// Join two generated nodes by index.
fn join(board: &mut Board, a: usize, b: usize) -> Result<(), TopologyError> {
    // An index past u32 can never be a member, so connect reports it
    let id = |index: usize| NodeId::new(u32::try_from(index).unwrap_or(u32::MAX));
    board.connect(id(a), id(b))?;
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn grid_coord(index: usize) -> f64 {
    index as f64 * SPACING
}
