//! Shared constants for maze projection.

// ── Grid palette ────────────────────────────────────────────────

pub const OPEN_COLOUR: &str = "#ffffff";
pub const START_COLOUR: &str = "#00ff00";
pub const END_COLOUR: &str = "#ff0000";
pub const WALL_COLOUR: &str = "#000000";
pub const BLOCKED_COLOUR: &str = "#808080";

/// Side length of one grid cell in logical units.
pub const DEFAULT_CELL_SIZE: f64 = 2.0;

// ── Placeholder ─────────────────────────────────────────────────

pub const PLACEHOLDER_WIDTH: f64 = 448.0;
pub const PLACEHOLDER_HEIGHT: f64 = 250.0;
pub const PLACEHOLDER_TEXT: &str = "Maze placeholder";
pub const PLACEHOLDER_TEXT_X: f64 = 10.0;
pub const PLACEHOLDER_TEXT_Y: f64 = 25.0;
pub const PLACEHOLDER_TEXT_COLOUR: &str = "#000000";

// ── Graph canvas ────────────────────────────────────────────────

pub const GRAPH_CANVAS_WIDTH: f64 = 300.0;
pub const GRAPH_CANVAS_HEIGHT: f64 = 200.0;

pub const BACKGROUND_COLOUR: &str = "#1f2937";
pub const CORRIDOR_COLOUR: &str = "#e5e7eb";
pub const PATH_COLOUR: &str = "#2563eb";
pub const ROVER_COLOUR: &str = "#f59e0b";

/// Corridor stroke width. Wide enough that adjacent segments read as one channel.
pub const CORRIDOR_WIDTH: f64 = 12.0;
pub const PATH_WIDTH: f64 = 3.0;

/// Radius of the start and end markers.
pub const MARKER_RADIUS: f64 = 5.0;

/// Rover triangle: tip distance and half-width of the base, in logical units.
/// The tip sits at `-2 * ROVER_SIZE` on the local y axis and the base at
/// `+ROVER_SIZE`, which puts the centroid at the local origin.
pub const ROVER_SIZE: f64 = 4.0;
pub const ROVER_HALF_BASE: f64 = 5.0;

/// Heading `h` is drawn as a clockwise rotation of `HEADING_OFFSET_DEG - h`
/// applied to an up-pointing triangle, so heading 0 points east.
pub const HEADING_OFFSET_DEG: f64 = 90.0;
