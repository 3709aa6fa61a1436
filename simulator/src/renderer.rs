use box_collision::app::{Color, Renderer, TextAnchor};
use box_collision::math::{Rect, Vec2};
use box_collision::world::Outline;
use ggez::glam::Vec2 as GVec2;
use ggez::graphics::{self, Canvas, DrawMode, DrawParam, Mesh, Text};
use ggez::{Context, GameError};

/// Draws one frame onto a ggez canvas.
pub struct CanvasRenderer<'a> {
    ctx: &'a Context,
    canvas: Canvas,
    screen: graphics::Rect,
}

impl<'a> CanvasRenderer<'a> {
    pub fn new(ctx: &'a Context, width: f32, height: f32) -> Self {
        Self {
            ctx,
            canvas: Canvas::from_frame(ctx, graphics::Color::BLACK),
            screen: graphics::Rect::new(0.0, 0.0, width, height),
        }
    }

    /// Hands the canvas back so it can be finished against a mutable context.
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

fn color(c: Color) -> graphics::Color {
    graphics::Color::from_rgb(c.r, c.g, c.b)
}

fn rect(r: Rect) -> graphics::Rect {
    graphics::Rect::new(r.x as f32, r.y as f32, r.w as f32, r.h as f32)
}

fn point(v: Vec2) -> GVec2 {
    GVec2::new(v.x as f32, v.y as f32)
}

impl Renderer for CanvasRenderer<'_> {
    type Error = GameError;

    fn clear(&mut self, c: Color) -> Result<(), GameError> {
        let mesh = Mesh::new_rectangle(self.ctx, DrawMode::fill(), self.screen, color(c))?;
        self.canvas.draw(&mesh, DrawParam::default());
        Ok(())
    }

    fn fill_rect(&mut self, r: Rect, c: Color) -> Result<(), GameError> {
        let mesh = Mesh::new_rectangle(self.ctx, DrawMode::fill(), rect(r), color(c))?;
        self.canvas.draw(&mesh, DrawParam::default());
        Ok(())
    }

    fn stroke_rect(&mut self, r: Rect, line_width: f64, c: Color) -> Result<(), GameError> {
        let mesh = Mesh::new_rectangle(self.ctx, DrawMode::stroke(line_width as f32), rect(r), color(c))?;
        self.canvas.draw(&mesh, DrawParam::default());
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        position: Vec2,
        anchor: TextAnchor,
        size: f32,
        c: Color,
    ) -> Result<(), GameError> {
        if text.is_empty() {
            return Ok(());
        }
        let mut label = Text::new(text);
        label.set_scale(size);
        let dest = match anchor {
            TextAnchor::TopLeft => point(position),
            TextAnchor::MidRight => {
                let extent = label.measure(self.ctx)?;
                GVec2::new(position.x as f32 - extent.x, position.y as f32 - extent.y / 2.0)
            }
        };
        self.canvas.draw(&label, DrawParam::new().dest(dest).color(color(c)));
        Ok(())
    }

    fn draw_shape(&mut self, outline: &Outline, c: Color) -> Result<(), GameError> {
        let mesh = match outline {
            Outline::Segment { a, b, radius } => {
                Mesh::new_line(self.ctx, &[point(*a), point(*b)], (*radius as f32 * 2.0).max(1.0), color(c))?
            }
            Outline::Polygon(vertices) => {
                let points: Vec<GVec2> = vertices.iter().map(|v| point(*v)).collect();
                Mesh::new_polygon(self.ctx, DrawMode::fill(), &points, color(c))?
            }
        };
        self.canvas.draw(&mesh, DrawParam::default());
        Ok(())
    }
}
