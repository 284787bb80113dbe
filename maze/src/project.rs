//! Projection: turns a [`MazeSnapshot`] into a [`Scene`].
//!
//! Projection is a pure function of the snapshot and the projector's cell
//! size. It never mutates the snapshot and two calls on equal input produce
//! equal scenes, so a surface may re-render as often as it likes.
//!
//! Graph scenes are emitted in a fixed paint order:
//! background, corridors, path, rover, start marker, end marker. The markers
//! go last so overlapping corridors never hide them.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use crate::consts::{
    BACKGROUND_COLOUR, BLOCKED_COLOUR, CORRIDOR_COLOUR, CORRIDOR_WIDTH, DEFAULT_CELL_SIZE, END_COLOUR,
    GRAPH_CANVAS_HEIGHT, GRAPH_CANVAS_WIDTH, HEADING_OFFSET_DEG, MARKER_RADIUS, OPEN_COLOUR, PATH_COLOUR,
    PATH_WIDTH, PLACEHOLDER_HEIGHT, PLACEHOLDER_TEXT, PLACEHOLDER_TEXT_COLOUR, PLACEHOLDER_TEXT_X,
    PLACEHOLDER_TEXT_Y, PLACEHOLDER_WIDTH, ROVER_COLOUR, ROVER_HALF_BASE, ROVER_SIZE, START_COLOUR,
    WALL_COLOUR,
};
use crate::point::Point;
use crate::scene::{DrawPrimitive, LineCap, Scene};
use crate::snapshot::{Cell, Graph, Grid, MazeSnapshot, Pose};

/// Snapshot projector. Holds the only tunable, the grid cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    cell_size: f64,
}

impl Default for Projector {
    fn default() -> Self {
        Self { cell_size: DEFAULT_CELL_SIZE }
    }
}

impl Projector {
    /// Build a projector; non-finite or non-positive sizes fall back to the default.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        if cell_size.is_finite() && cell_size > 0.0 {
            Self { cell_size }
        } else {
            Self::default()
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[must_use]
    pub fn project(&self, snapshot: &MazeSnapshot) -> Scene {
        if snapshot.is_empty() {
            return placeholder();
        }
        match snapshot {
            MazeSnapshot::Grid(grid) => self.project_grid(grid),
            MazeSnapshot::Graph(graph) => project_graph(graph),
        }
    }

    fn project_grid(&self, grid: &Grid) -> Scene {
        let size = self.cell_size;
        let primitives = grid
            .iter()
            .map(|(row, col, cell)| DrawPrimitive::Rect {
                x: col as f64 * size,
                y: row as f64 * size,
                width: size,
                height: size,
                fill: colour_of(cell),
            })
            .collect();
        Scene {
            width: grid.cols() as f64 * size,
            height: grid.rows() as f64 * size,
            primitives,
        }
    }
}

/// Fixed cell palette. Unknown cells render as open floor.
#[must_use]
pub fn colour_of(cell: Cell) -> &'static str {
    match cell {
        Cell::Open | Cell::Unknown => OPEN_COLOUR,
        Cell::Start => START_COLOUR,
        Cell::End => END_COLOUR,
        Cell::Wall => WALL_COLOUR,
        Cell::Blocked => BLOCKED_COLOUR,
    }
}

/// Rotation applied to the rover marker for a given heading.
#[must_use]
pub fn heading_rotation(heading_deg: f64) -> f64 {
    HEADING_OFFSET_DEG - heading_deg
}

fn placeholder() -> Scene {
    Scene {
        width: PLACEHOLDER_WIDTH,
        height: PLACEHOLDER_HEIGHT,
        primitives: vec![DrawPrimitive::Text {
            at: Point::new(PLACEHOLDER_TEXT_X, PLACEHOLDER_TEXT_Y),
            content: PLACEHOLDER_TEXT.to_owned(),
            fill: PLACEHOLDER_TEXT_COLOUR,
        }],
    }
}

fn project_graph(graph: &Graph) -> Scene {
    let path_segments = graph.path.len().saturating_sub(1);
    let mut primitives = Vec::with_capacity(graph.edges.len() + path_segments + 4);

    // Layer 1: background.
    primitives.push(DrawPrimitive::Rect {
        x: 0.0,
        y: 0.0,
        width: GRAPH_CANVAS_WIDTH,
        height: GRAPH_CANVAS_HEIGHT,
        fill: BACKGROUND_COLOUR,
    });

    // Layer 2: corridors as wide round-capped strokes.
    primitives.extend(graph.edges.iter().map(|(from, to)| DrawPrimitive::Line {
        from: *from,
        to: *to,
        stroke: CORRIDOR_COLOUR,
        width: CORRIDOR_WIDTH,
        cap: LineCap::Round,
    }));

    // Layer 3: planned path.
    primitives.extend(graph.path.windows(2).map(|pair| DrawPrimitive::Line {
        from: pair[0],
        to: pair[1],
        stroke: PATH_COLOUR,
        width: PATH_WIDTH,
        cap: LineCap::Round,
    }));

    // Layer 4: rover pose.
    if let Some(pose) = graph.rover {
        primitives.push(rover_marker(pose));
    }

    // Layer 5: endpoints.
    primitives.push(DrawPrimitive::Circle {
        center: graph.start,
        radius: MARKER_RADIUS,
        fill: START_COLOUR,
    });
    primitives.push(DrawPrimitive::Circle {
        center: graph.end,
        radius: MARKER_RADIUS,
        fill: END_COLOUR,
    });

    Scene {
        width: GRAPH_CANVAS_WIDTH,
        height: GRAPH_CANVAS_HEIGHT,
        primitives,
    }
}

/// Up-pointing triangle centred on its centroid, rotated to the heading.
fn rover_marker(pose: Pose) -> DrawPrimitive {
    DrawPrimitive::Polygon {
        points: vec![
            Point::new(0.0, -2.0 * ROVER_SIZE),
            Point::new(ROVER_HALF_BASE, ROVER_SIZE),
            Point::new(-ROVER_HALF_BASE, ROVER_SIZE),
        ],
        origin: pose.position,
        rotation_deg: heading_rotation(pose.heading),
        fill: ROVER_COLOUR,
    }
}
