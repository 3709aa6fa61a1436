use crate::math::{Rect, Vec2};
use crate::world::Outline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// Which point of the text's bounding box lands on the given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    MidRight,
}

/// Drawing surface for one frame, in screen coordinates with +Y down.
pub trait Renderer {
    type Error;

    fn clear(&mut self, color: Color) -> Result<(), Self::Error>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error>;

    fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Color) -> Result<(), Self::Error>;

    fn draw_text(
        &mut self,
        text: &str,
        position: Vec2,
        anchor: TextAnchor,
        size: f32,
        color: Color,
    ) -> Result<(), Self::Error>;

    /// Outline of a physics body.
    fn draw_shape(&mut self, outline: &Outline, color: Color) -> Result<(), Self::Error>;
}
