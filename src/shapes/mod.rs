pub mod line_segment;
pub mod polygon;

pub use line_segment::LineSegment;
pub use polygon::Polygon;

/// Geometry attached to a rigid body, in the body's local frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Segment(LineSegment),
    Polygon(Polygon),
}
