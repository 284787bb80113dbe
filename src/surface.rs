//! Rendering surfaces.
//!
//! [`Surface`] is the seam between the dashboard runtime and whatever draws
//! it. The runtime pushes every state change through it and never reads
//! anything back. [`ConsoleSurface`] is the line-oriented surface the CLI
//! ships: status and log lines on a writer, maze scenes as SVG files.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::io::Write;
use std::path::PathBuf;

use maze::Scene;
use tracing::warn;
use wire::LogEntry;

use crate::state::ConnectionState;

pub trait Surface {
    fn status(&mut self, state: ConnectionState);
    /// One newly appended log entry.
    fn log(&mut self, entry: &LogEntry);
    fn log_cleared(&mut self);
    /// The current maze, already projected.
    fn maze(&mut self, scene: &Scene);
    fn history(&mut self, maze_ids: &[String]);
    /// Clock display, `HH:MM:SS`.
    fn tick(&mut self, hms: &str);
}

pub struct ConsoleSurface<W: Write> {
    out: W,
    svg_out: Option<PathBuf>,
    clock: String,
    mazes_written: usize,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W, svg_out: Option<PathBuf>) -> Self {
        Self { out, svg_out, clock: "--:--:--".to_owned(), mazes_written: 0 }
    }

    #[must_use]
    pub fn mazes_written(&self) -> usize {
        self.mazes_written
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "[{}] {text}", self.clock) {
            warn!(%error, "surface: write failed");
        }
    }
}

impl<W: Write> Surface for ConsoleSurface<W> {
    fn status(&mut self, state: ConnectionState) {
        self.line(&format!("status: {}", state.label()));
    }

    fn log(&mut self, entry: &LogEntry) {
        self.line(&format!("{} - {}", entry.time, entry.message));
    }

    fn log_cleared(&mut self) {
        self.line("log cleared");
    }

    fn maze(&mut self, scene: &Scene) {
        let summary = format!("maze: {}x{} ({} primitives)", scene.width, scene.height, scene.primitives.len());
        self.line(&summary);
        let Some(path) = &self.svg_out else {
            return;
        };
        match std::fs::write(path, maze::svg::to_svg(scene)) {
            Ok(()) => self.mazes_written += 1,
            Err(error) => warn!(path = %path.display(), %error, "surface: svg write failed"),
        }
    }

    fn history(&mut self, maze_ids: &[String]) {
        if maze_ids.is_empty() {
            self.line("maze history: (none)");
        } else {
            self.line(&format!("maze history: {}", maze_ids.join(", ")));
        }
    }

    fn tick(&mut self, hms: &str) {
        hms.clone_into(&mut self.clock);
    }
}
