//! Immediate-mode draw surface. Renderers describe shapes; the canvas
//! implementation paints them and the recording one keeps them for tests.

use crate::state::camera::ZoomTransform;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { x: f64, y: f64, r: f64, fill: &'static str, opacity: f64 },
    Rect { x: f64, y: f64, w: f64, h: f64, fill: Option<&'static str>, stroke: Option<&'static str>, opacity: f64 },
    /// Rings are filled with the even-odd rule so holes stay empty.
    Polygon { rings: Vec<Vec<(f64, f64)>>, fill: &'static str, stroke: &'static str, line_width: f64 },
    Line { from: (f64, f64), to: (f64, f64), stroke: &'static str, width: f64 },
    Text { x: f64, y: f64, text: String, color: &'static str, align: Align, opacity: f64, rotation: f64 },
}

pub trait DrawSurface {
    fn clear(&mut self, width: f64, height: f64, background: &'static str);
    fn set_transform(&mut self, t: ZoomTransform);
    fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn pop_clip(&mut self);
    fn draw(&mut self, shape: &Shape);
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64, background: &'static str) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str(background);
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn set_transform(&mut self, t: ZoomTransform) {
        self.ctx.set_transform(t.k, 0.0, 0.0, t.k, t.x, t.y).ok();
    }

    fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(x, y, w, h);
        self.ctx.clip();
    }

    fn pop_clip(&mut self) {
        self.ctx.restore();
    }

    fn draw(&mut self, shape: &Shape) {
        let ctx = &self.ctx;
        match shape {
            Shape::Circle { x, y, r, fill, opacity } => {
                ctx.set_global_alpha(*opacity);
                ctx.set_fill_style_str(fill);
                ctx.begin_path();
                ctx.arc(*x, *y, *r, 0.0, std::f64::consts::PI * 2.0).ok();
                ctx.fill();
            }
            Shape::Rect { x, y, w, h, fill, stroke, opacity } => {
                ctx.set_global_alpha(*opacity);
                if let Some(f) = fill {
                    ctx.set_fill_style_str(f);
                    ctx.fill_rect(*x, *y, *w, *h);
                }
                if let Some(s) = stroke {
                    ctx.set_stroke_style_str(s);
                    ctx.set_line_width(1.0);
                    ctx.stroke_rect(*x, *y, *w, *h);
                }
            }
            Shape::Polygon { rings, fill, stroke, line_width } => {
                ctx.set_global_alpha(1.0);
                ctx.begin_path();
                for ring in rings {
                    let mut pts = ring.iter();
                    if let Some((x0, y0)) = pts.next() {
                        ctx.move_to(*x0, *y0);
                        for (x, y) in pts {
                            ctx.line_to(*x, *y);
                        }
                        ctx.close_path();
                    }
                }
                ctx.set_fill_style_str(fill);
                ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
                ctx.set_stroke_style_str(stroke);
                ctx.set_line_width(*line_width);
                ctx.stroke();
            }
            Shape::Line { from, to, stroke, width } => {
                ctx.set_global_alpha(1.0);
                ctx.set_stroke_style_str(stroke);
                ctx.set_line_width(*width);
                ctx.begin_path();
                ctx.move_to(from.0, from.1);
                ctx.line_to(to.0, to.1);
                ctx.stroke();
            }
            Shape::Text { x, y, text, color, align, opacity, rotation } => {
                ctx.set_global_alpha(*opacity);
                ctx.set_fill_style_str(color);
                ctx.set_font("12px sans-serif");
                ctx.set_text_baseline("middle");
                ctx.set_text_align(match align {
                    Align::Center => "center",
                    Align::Right => "right",
                });
                if *rotation != 0.0 {
                    ctx.save();
                    ctx.translate(*x, *y).ok();
                    ctx.rotate(*rotation).ok();
                    ctx.fill_text(text, 0.0, 0.0).ok();
                    ctx.restore();
                } else {
                    ctx.fill_text(text, *x, *y).ok();
                }
            }
        }
    }
}

/// One recorded call on a [`RecordingSurface`].
#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear,
    Transform(ZoomTransform),
    Clip,
    Unclip,
    Draw(Shape),
}

#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.ops.iter().filter_map(|op| match op {
            Op::Draw(s) => Some(s),
            _ => None,
        })
    }

    pub fn circles(&self) -> Vec<&Shape> {
        self.shapes().filter(|s| matches!(s, Shape::Circle { .. })).collect()
    }

    pub fn texts(&self) -> Vec<&Shape> {
        self.shapes().filter(|s| matches!(s, Shape::Text { .. })).collect()
    }

    pub fn polygons(&self) -> Vec<&Shape> {
        self.shapes().filter(|s| matches!(s, Shape::Polygon { .. })).collect()
    }
}

#[cfg(test)]
impl DrawSurface for RecordingSurface {
    fn clear(&mut self, _width: f64, _height: f64, _background: &'static str) {
        self.ops.clear();
        self.ops.push(Op::Clear);
    }

    fn set_transform(&mut self, t: ZoomTransform) {
        self.ops.push(Op::Transform(t));
    }

    fn push_clip(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {
        self.ops.push(Op::Clip);
    }

    fn pop_clip(&mut self) {
        self.ops.push(Op::Unclip);
    }

    fn draw(&mut self, shape: &Shape) {
        self.ops.push(Op::Draw(shape.clone()));
    }
}
