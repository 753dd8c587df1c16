use crate::candles::PlotCandle;
use crate::captcha::Glyph;

/// `(x1, y1, x2, y2)`
pub type Segment = (f64, f64, f64, f64);

pub trait RendererBackend {
    fn surface_size(&self) -> (f64, f64);
    /// Fill the whole surface with `clear_color`, or clear it to transparent.
    fn begin_frame(&mut self, clear_color: Option<&str>);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn draw_candles(&mut self, candles: &[PlotCandle], color_up: &str, color_down: &str);
    fn draw_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f32);
    fn draw_segments(&mut self, segments: &[Segment], color: &str, width: f32);
    /// Closed, filled path through `points`.
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str);
    fn draw_glyphs(&mut self, glyphs: &[Glyph], font: &str);
}

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasBackend;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use super::{RendererBackend, Segment};
    use crate::candles::PlotCandle;
    use crate::captcha::Glyph;

    pub struct CanvasBackend {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl CanvasBackend {
        pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
            let ctx = canvas
                .get_context("2d")?
                .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
                .dyn_into::<CanvasRenderingContext2d>()?;
            Ok(Self { canvas, ctx })
        }

        /// Match the bitmap size to the element's layout box.
        pub fn fit_to_layout(&self) {
            let width = self.canvas.offset_width().max(1) as u32;
            let height = self.canvas.offset_height().max(1) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }

    impl RendererBackend for CanvasBackend {
        fn surface_size(&self) -> (f64, f64) {
            (self.canvas.width() as f64, self.canvas.height() as f64)
        }

        fn begin_frame(&mut self, clear_color: Option<&str>) {
            let (width, height) = self.surface_size();
            self.ctx.clear_rect(0.0, 0.0, width, height);
            if let Some(color) = clear_color {
                self.ctx.set_fill_style_str(color);
                self.ctx.fill_rect(0.0, 0.0, width, height);
            }
        }

        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_rect(x, y, w, h);
        }

        fn draw_candles(&mut self, candles: &[PlotCandle], color_up: &str, color_down: &str) {
            let ctx = &self.ctx;
            ctx.set_line_width(1.0);
            for c in candles {
                let color = if c.is_up() { color_up } else { color_down };
                ctx.set_stroke_style_str(color);
                ctx.set_fill_style_str(color);
                ctx.begin_path();
                ctx.move_to(c.x, c.y_high);
                ctx.line_to(c.x, c.y_low);
                ctx.stroke();

                let body_top = c.y_open.min(c.y_close);
                let body_h = (c.y_open - c.y_close).abs().max(1.0);
                ctx.fill_rect(c.x - c.half_w, body_top, c.half_w * 2.0, body_h);
            }
        }

        fn draw_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f32) {
            if points.len() < 2 {
                return;
            }
            let ctx = &self.ctx;
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(width as f64);
            ctx.begin_path();
            ctx.move_to(points[0].0, points[0].1);
            for p in points.iter().skip(1) {
                ctx.line_to(p.0, p.1);
            }
            ctx.stroke();
        }

        fn draw_segments(&mut self, segments: &[Segment], color: &str, width: f32) {
            if segments.is_empty() {
                return;
            }
            let ctx = &self.ctx;
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(width as f64);
            for (x1, y1, x2, y2) in segments {
                ctx.begin_path();
                ctx.move_to(*x1, *y1);
                ctx.line_to(*x2, *y2);
                ctx.stroke();
            }
        }

        fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str) {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            let ctx = &self.ctx;
            ctx.set_fill_style_str(color);
            ctx.begin_path();
            ctx.move_to(first.0, first.1);
            for p in rest {
                ctx.line_to(p.0, p.1);
            }
            ctx.close_path();
            ctx.fill();
        }

        fn draw_glyphs(&mut self, glyphs: &[Glyph], font: &str) {
            let ctx = &self.ctx;
            ctx.set_font(font);
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            for g in glyphs {
                ctx.save();
                ctx.set_fill_style_str(&g.color);
                let placed = ctx
                    .translate(g.x, g.y)
                    .and_then(|_| ctx.rotate(g.angle))
                    .and_then(|_| ctx.fill_text(&g.ch.to_string(), 0.0, 0.0));
                if let Err(err) = placed {
                    web_sys::console::error_1(&err);
                }
                ctx.restore();
            }
        }
    }
}
