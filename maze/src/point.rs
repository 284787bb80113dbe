#[cfg(test)]
#[path = "point_test.rs"]
mod point_test;

use serde::{Deserialize, Deserializer, Serialize};

/// A point in maze coordinates. No unit conversion happens at this level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate about the origin by `degrees`, clockwise on a y-down surface.
    #[must_use]
    pub fn rotate_deg(self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    #[must_use]
    pub fn offset(self, by: Point) -> Self {
        Self { x: self.x + by.x, y: self.y + by.y }
    }
}

/// Accepted encodings: `[x, y]` or `{"x": .., "y": ..}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Pair([f64; 2]),
    Object { x: f64, y: f64 },
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PointRepr::deserialize(deserializer)? {
            PointRepr::Pair([x, y]) | PointRepr::Object { x, y } => Self { x, y },
        })
    }
}
