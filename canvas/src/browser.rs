//! [`Surface`] backed by a browser `CanvasRenderingContext2d`.
//!
//! This module is the only place that touches `web_sys`. Each draw call
//! brackets itself with `save` / `restore` and sets its own style, so the
//! context's ambient fill and stroke state never carries between shapes.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::mapper::Point;
use crate::surface::{Rect, ShapeStyle, Stroke, Surface, SurfaceError, TextAlign, TextStyle};

/// A browser canvas as a raster surface.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    /// Bind to the 2D context of `canvas`, sized to the element's pixel size.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn from_element(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or(SurfaceError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::NoContext)?;
        Ok(Self { ctx, width: f64::from(canvas.width()), height: f64::from(canvas.height()) })
    }

    fn apply_stroke(&self, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width);
        let dashes = js_sys::Array::new();
        if let Some(dash) = stroke.dash {
            dashes.push(&dash.into());
            dashes.push(&dash.into());
        }
        self.ctx.set_line_dash(&dashes).map_err(js_error)
    }

    /// Fill then stroke the current path according to `style`.
    fn finish_path(&self, style: &ShapeStyle) -> Result<(), SurfaceError> {
        if let Some(fill) = style.fill {
            self.ctx.set_fill_style_str(fill);
            self.ctx.fill();
        }
        if let Some(stroke) = &style.stroke {
            self.apply_stroke(stroke)?;
            self.ctx.stroke();
        }
        Ok(())
    }

    fn trace(&self, points: &[Point]) {
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.ctx.move_to(first.x, first.y);
        }
        for p in iter {
            self.ctx.line_to(p.x, p.y);
        }
    }

    /// Run `paint` between `save` and `restore`, restoring even on failure.
    fn scoped<F>(&self, paint: F) -> Result<(), SurfaceError>
    where
        F: FnOnce(&Self) -> Result<(), SurfaceError>,
    {
        self.ctx.save();
        let result = paint(self);
        self.ctx.restore();
        result
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).map_err(js_error)?;
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.scoped(|s| {
            s.apply_stroke(stroke)?;
            s.ctx.begin_path();
            s.ctx.move_to(from.x, from.y);
            s.ctx.line_to(to.x, to.y);
            s.ctx.stroke();
            Ok(())
        })
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), SurfaceError> {
        if points.len() < 2 {
            return Ok(());
        }
        self.scoped(|s| {
            s.apply_stroke(stroke)?;
            s.ctx.set_line_join("round");
            s.ctx.begin_path();
            s.trace(points);
            s.ctx.stroke();
            Ok(())
        })
    }

    fn rect(&mut self, rect: Rect, style: &ShapeStyle) -> Result<(), SurfaceError> {
        self.scoped(|s| {
            s.ctx.begin_path();
            s.ctx.rect(rect.x, rect.y, rect.width, rect.height);
            s.finish_path(style)
        })
    }

    fn circle(&mut self, center: Point, radius: f64, style: &ShapeStyle) -> Result<(), SurfaceError> {
        if radius <= 0.0 {
            return Ok(());
        }
        self.scoped(|s| {
            s.ctx.begin_path();
            s.ctx.arc(center.x, center.y, radius, 0.0, TAU).map_err(js_error)?;
            s.finish_path(style)
        })
    }

    fn polygon(&mut self, points: &[Point], style: &ShapeStyle) -> Result<(), SurfaceError> {
        if points.len() < 3 {
            return Ok(());
        }
        self.scoped(|s| {
            s.ctx.begin_path();
            s.trace(points);
            s.ctx.close_path();
            s.finish_path(style)
        })
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<(), SurfaceError> {
        self.scoped(|s| {
            let weight = if style.bold { "bold " } else { "" };
            s.ctx.set_font(&format!("{weight}{}px sans-serif", style.size_px));
            s.ctx.set_text_align(match style.align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
                TextAlign::Right => "right",
            });
            s.ctx.set_text_baseline("middle");
            s.ctx.set_fill_style_str(style.color);
            s.ctx.fill_text(text, at.x, at.y).map_err(js_error)
        })
    }
}

fn js_error(err: JsValue) -> SurfaceError {
    SurfaceError::Canvas(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
