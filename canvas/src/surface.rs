//! Raster surface abstraction and the in-memory display list.
//!
//! The renderer talks to an immediate-mode 2D surface through [`Surface`].
//! Nothing painted is retained by the engine; a surface only has to execute
//! each call. Every call carries its own style so that no fill/stroke state
//! leaks from one shape to the next.
//!
//! [`DisplayList`] is the native surface: it records calls as [`DrawOp`]s,
//! which tests inspect directly and the CLI serializes to SVG.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::consts::BACKGROUND;
use crate::mapper::Point;

/// Failure reported by a surface backend.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// A browser `Canvas2D` call raised.
    #[error("canvas call failed: {0}")]
    Canvas(String),
    /// The element did not yield a 2D rendering context.
    #[error("2d rendering context unavailable")]
    NoContext,
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// CSS color string.
    pub color: &'static str,
    /// Line width in pixels.
    pub width: f64,
    /// Dash and gap length in pixels; `None` for a solid line.
    pub dash: Option<f64>,
}

impl Stroke {
    #[must_use]
    pub const fn solid(color: &'static str, width: f64) -> Self {
        Self { color, width, dash: None }
    }
}

/// Fill and outline for a closed shape. Either half may be absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<&'static str>,
    pub stroke: Option<Stroke>,
}

/// Horizontal anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Text style. Text is always vertically centered on its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: &'static str,
    pub size_px: f64,
    pub align: TextAlign,
    pub bold: bool,
}

/// Axis-aligned rectangle in pixels, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build a rectangle of the given size centered on `center`.
    #[must_use]
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self { x: center.x - width / 2.0, y: center.y - height / 2.0, width, height }
    }
}

/// An immediate-mode 2D drawing target in pixel coordinates.
pub trait Surface {
    /// Surface `(width, height)` in pixels.
    fn size(&self) -> (f64, f64);

    /// Track a new surface size in pixels. Takes effect on the next paint pass.
    fn set_size(&mut self, width: f64, height: f64);

    /// Wipe everything painted so far.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the call.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Stroke a single segment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the call.
    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), SurfaceError>;

    /// Stroke an open path through `points` in order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the call.
    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), SurfaceError>;

    /// Fill and/or stroke a rectangle.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the call.
    fn rect(&mut self, rect: Rect, style: &ShapeStyle) -> Result<(), SurfaceError>;

    /// Fill and/or stroke a circle.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the call.
    fn circle(&mut self, center: Point, radius: f64, style: &ShapeStyle) -> Result<(), SurfaceError>;

    /// Fill and/or stroke a closed polygon.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the call.
    fn polygon(&mut self, points: &[Point], style: &ShapeStyle) -> Result<(), SurfaceError>;

    /// Draw a single line of text.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the call.
    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<(), SurfaceError>;
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line { from: Point, to: Point, stroke: Stroke },
    Polyline { points: Vec<Point>, stroke: Stroke },
    Rect { rect: Rect, style: ShapeStyle },
    Circle { center: Point, radius: f64, style: ShapeStyle },
    Polygon { points: Vec<Point>, style: ShapeStyle },
    Text { text: String, at: Point, style: TextStyle },
}

/// A [`Surface`] that records draw calls in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
    clears: u64,
}

impl DisplayList {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ops: Vec::new(), clears: 0 }
    }

    /// Ops painted since the last clear.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// How many times the surface has been cleared, i.e. paint passes started.
    #[must_use]
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Serialize the current contents as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = num(self.width),
            h = num(self.height),
        );
        svg.push_str(&format!(
            "  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{BACKGROUND}\"/>\n",
            num(self.width),
            num(self.height),
        ));
        for op in &self.ops {
            svg.push_str("  ");
            svg.push_str(&op_to_svg(op));
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.ops.clear();
        self.clears += 1;
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Line { from, to, stroke: *stroke });
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Polyline { points: points.to_vec(), stroke: *stroke });
        Ok(())
    }

    fn rect(&mut self, rect: Rect, style: &ShapeStyle) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Rect { rect, style: *style });
        Ok(())
    }

    fn circle(&mut self, center: Point, radius: f64, style: &ShapeStyle) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Circle { center, radius, style: *style });
        Ok(())
    }

    fn polygon(&mut self, points: &[Point], style: &ShapeStyle) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Polygon { points: points.to_vec(), style: *style });
        Ok(())
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Text { text: text.to_owned(), at, style: *style });
        Ok(())
    }
}

// =============================================================
// SVG serialization
// =============================================================

fn op_to_svg(op: &DrawOp) -> String {
    match op {
        DrawOp::Line { from, to, stroke } => format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" fill=\"none\"{}/>",
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            stroke_attrs(stroke),
        ),
        DrawOp::Polyline { points, stroke } => format!(
            "<polyline points=\"{}\" fill=\"none\" stroke-linejoin=\"round\"{}/>",
            points_attr(points),
            stroke_attrs(stroke),
        ),
        DrawOp::Rect { rect, style } => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{}/>",
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height),
            shape_attrs(style),
        ),
        DrawOp::Circle { center, radius, style } => format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{}/>",
            num(center.x),
            num(center.y),
            num(*radius),
            shape_attrs(style),
        ),
        DrawOp::Polygon { points, style } => {
            format!("<polygon points=\"{}\"{}/>", points_attr(points), shape_attrs(style))
        }
        DrawOp::Text { text, at, style } => {
            let anchor = match style.align {
                TextAlign::Left => "start",
                TextAlign::Center => "middle",
                TextAlign::Right => "end",
            };
            let weight = if style.bold { " font-weight=\"bold\"" } else { "" };
            format!(
                "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-family=\"sans-serif\" font-size=\"{}\" text-anchor=\"{anchor}\" dominant-baseline=\"middle\"{weight}>{}</text>",
                num(at.x),
                num(at.y),
                style.color,
                num(style.size_px),
                escape(text),
            )
        }
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut out = format!(" stroke=\"{}\" stroke-width=\"{}\"", stroke.color, num(stroke.width));
    if let Some(dash) = stroke.dash {
        out.push_str(&format!(" stroke-dasharray=\"{d} {d}\"", d = num(dash)));
    }
    out
}

fn shape_attrs(style: &ShapeStyle) -> String {
    let fill = format!(" fill=\"{}\"", style.fill.unwrap_or("none"));
    match style.stroke {
        Some(stroke) => fill + &stroke_attrs(&stroke),
        None => fill,
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a pixel value with at most two decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
