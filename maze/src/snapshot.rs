//! Maze snapshot model.
//!
//! DESIGN
//! ======
//! A deployment renders one of two maze representations, chosen once at
//! configuration time via [`MazeVariant`]. Inbound payloads are decoded
//! against that variant instead of being sniffed per message, and every
//! decoded payload is a complete replacement: there is no patching.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::point::Point;

/// Error produced while building a snapshot from a payload.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid maze payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid { row: usize, expected: usize, found: usize },
    #[error("unknown maze variant `{0}` (expected `grid` or `graph`)")]
    UnknownVariant(String),
}

// =============================================================================
// VARIANT
// =============================================================================

/// Which representation a deployment uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MazeVariant {
    #[default]
    Grid,
    Graph,
}

impl FromStr for MazeVariant {
    type Err = SnapshotError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "graph" => Ok(Self::Graph),
            other => Err(SnapshotError::UnknownVariant(other.to_owned())),
        }
    }
}

impl fmt::Display for MazeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => f.write_str("grid"),
            Self::Graph => f.write_str("graph"),
        }
    }
}

// =============================================================================
// GRID
// =============================================================================

/// One grid cell. Wire codes 0..=4; anything else decodes to `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Open,
    Start,
    End,
    Wall,
    Blocked,
    #[default]
    Unknown,
}

impl Cell {
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Open,
            1 => Self::Start,
            2 => Self::End,
            3 => Self::Wall,
            4 => Self::Blocked,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from_code)
    }
}

/// Rectangular cell array, stored row-major. All rows have `cols` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from nested rows, rejecting ragged input.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::RaggedGrid`] when any row length differs from
    /// the first row's.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, SnapshotError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(SnapshotError::RaggedGrid { row: index, expected: cols, found: row.len() });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { rows: rows.len(), cols, cells })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// Iterate `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (i / self.cols, i % self.cols, *cell))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// A `null` or absent `maze` means nothing explored yet.
#[derive(Deserialize)]
struct GridPayload {
    maze: Option<Vec<Vec<Cell>>>,
}

// =============================================================================
// GRAPH
// =============================================================================

/// Rover position plus heading in degrees (0 = east).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    #[serde(alias = "heading_degrees", alias = "angle")]
    pub heading: f64,
}

/// Continuous-coordinate maze: corridor segments, planned path, optional pose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub start: Point,
    pub end: Point,
    /// Undirected corridor segments.
    pub edges: Vec<(Point, Point)>,
    #[serde(default)]
    pub path: Vec<Point>,
    #[serde(default)]
    pub rover: Option<Pose>,
}

impl Graph {
    /// True for the placeholder: no corridors and both endpoints at the origin.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.start == Point::default() && self.end == Point::default()
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// The complete maze state at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub enum MazeSnapshot {
    Grid(Grid),
    Graph(Graph),
}

impl MazeSnapshot {
    /// The empty snapshot a session starts with.
    #[must_use]
    pub fn placeholder(variant: MazeVariant) -> Self {
        match variant {
            MazeVariant::Grid => Self::Grid(Grid::default()),
            MazeVariant::Graph => Self::Graph(Graph::default()),
        }
    }

    /// Decode a full `maze` event payload for the configured variant.
    ///
    /// The payload is the whole event object; unrelated keys such as `type`
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] when required fields are missing or
    /// mistyped and [`SnapshotError::RaggedGrid`] for non-rectangular grids.
    pub fn decode(variant: MazeVariant, payload: Value) -> Result<Self, SnapshotError> {
        match variant {
            MazeVariant::Grid => {
                let GridPayload { maze } = serde_json::from_value(payload)?;
                Ok(Self::Grid(Grid::from_rows(maze.unwrap_or_default())?))
            }
            MazeVariant::Graph => Ok(Self::Graph(serde_json::from_value(payload)?)),
        }
    }

    #[must_use]
    pub fn variant(&self) -> MazeVariant {
        match self {
            Self::Grid(_) => MazeVariant::Grid,
            Self::Graph(_) => MazeVariant::Graph,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Grid(grid) => grid.is_empty(),
            Self::Graph(graph) => graph.is_empty(),
        }
    }
}
