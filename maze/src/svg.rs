//! SVG serialisation of a [`Scene`].
//!
//! Every element is built from typed primitive fields. Text content is
//! XML-escaped, so maze or log text coming off the wire can never inject
//! markup into the document.

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

use std::fmt::Write;

use crate::point::Point;
use crate::scene::{DrawPrimitive, LineCap, Scene};

/// Render a scene as a standalone SVG document.
#[must_use]
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail; fmt::Error only comes from the sink.
    if write_scene(&mut out, scene).is_err() {
        out.clear();
    }
    out
}

fn write_scene(out: &mut String, scene: &Scene) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height,
    )?;
    for primitive in &scene.primitives {
        write_primitive(out, primitive)?;
    }
    writeln!(out, "</svg>")
}

fn write_primitive(out: &mut String, primitive: &DrawPrimitive) -> std::fmt::Result {
    match primitive {
        DrawPrimitive::Rect { x, y, width, height, fill } => writeln!(
            out,
            r#"  <rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"/>"#,
            escape(fill)
        ),
        DrawPrimitive::Line { from, to, stroke, width, cap } => writeln!(
            out,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{width}" stroke-linecap="{}"/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            escape(stroke),
            linecap(*cap)
        ),
        DrawPrimitive::Circle { center, radius, fill } => writeln!(
            out,
            r#"  <circle cx="{}" cy="{}" r="{radius}" fill="{}"/>"#,
            center.x,
            center.y,
            escape(fill)
        ),
        DrawPrimitive::Polygon { points, origin, rotation_deg, fill } => writeln!(
            out,
            r#"  <polygon points="{}" transform="translate({} {}) rotate({rotation_deg})" fill="{}"/>"#,
            points_attr(points),
            origin.x,
            origin.y,
            escape(fill)
        ),
        DrawPrimitive::Text { at, content, fill } => writeln!(
            out,
            r#"  <text x="{}" y="{}" fill="{}">{}</text>"#,
            at.x,
            at.y,
            escape(fill),
            escape(content)
        ),
    }
}

fn linecap(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape the five XML special characters.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
