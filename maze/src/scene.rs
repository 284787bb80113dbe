//! Drawable primitives.
//!
//! A [`Scene`] is an ordered list: later primitives paint over earlier ones.
//! Nothing here depends on a specific rendering surface.

use serde::Serialize;

use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawPrimitive {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: &'static str,
    },
    Line {
        from: Point,
        to: Point,
        stroke: &'static str,
        width: f64,
        cap: LineCap,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: &'static str,
    },
    /// Polygon given in local coordinates, rotated clockwise by
    /// `rotation_deg` about the local origin and then moved to `origin`.
    Polygon {
        points: Vec<Point>,
        origin: Point,
        rotation_deg: f64,
        fill: &'static str,
    },
    Text {
        at: Point,
        content: String,
        fill: &'static str,
    },
}

impl DrawPrimitive {
    /// Vertices of a polygon after rotation and translation. Empty for other kinds.
    #[must_use]
    pub fn world_points(&self) -> Vec<Point> {
        match self {
            Self::Polygon { points, origin, rotation_deg, .. } => points
                .iter()
                .map(|p| p.rotate_deg(*rotation_deg).offset(*origin))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Canvas extent plus primitives in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<DrawPrimitive>,
}
