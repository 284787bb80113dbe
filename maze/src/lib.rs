//! Maze snapshot model and geometry projection for the rover dashboard.
//!
//! This crate knows nothing about transport or session state. It owns the
//! data model for "what the maze currently looks like" and turns a snapshot
//! into an ordered list of rendering-agnostic drawable primitives. Any surface
//! (terminal, SVG file, canvas) consumes the resulting [`scene::Scene`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`snapshot`] | Grid and graph maze representations, payload decoding |
//! | [`point`] | Continuous-coordinate point and rotation helper |
//! | [`scene`] | Drawable primitives and the projected scene |
//! | [`project`] | Snapshot to scene projection with fixed z-order |
//! | [`svg`] | Structured SVG serialisation of a scene |
//! | [`consts`] | Palette, canvas extents and stroke widths |

pub mod consts;
pub mod point;
pub mod project;
pub mod scene;
pub mod snapshot;
pub mod svg;

pub use point::Point;
pub use project::Projector;
pub use scene::{DrawPrimitive, LineCap, Scene};
pub use snapshot::{Cell, Graph, Grid, MazeSnapshot, MazeVariant, Pose, SnapshotError};
