//! Fixed parameters of the simulator: window, walls, boxes and form layout.

use crate::math::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallDesc {
    pub start: Vec2,
    pub end: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub title: &'static str,
    pub width: f64,
    pub height: f64,
    pub target_fps: u32,
    /// Physics advances by exactly this much per tick.
    pub tick_dt: f64,

    pub gravity: Vec2,
    /// Left, right and top boundaries, then the floor.
    pub walls: [WallDesc; 4],
    pub wall_thickness: f64,
    pub wall_elasticity: f64,

    pub box_half_extent: f64,
    pub box_elasticity: f64,
    pub box_collision_type: u32,
    pub box1_start: Vec2,
    pub box2_start: Vec2,

    /// mass1, velocity1, mass2, velocity2
    pub field_rects: [Rect; 4],
    pub start_button: Rect,
    pub font_size: f32,
    pub counter_position: Vec2,
}

impl Default for SimConfig {
    fn default() -> Self {
        let width = 800.0;
        let height = 600.0;
        let margin = 50.0;
        Self {
            title: "Box Collision Simulator",
            width,
            height,
            target_fps: 60,
            tick_dt: 1.0 / 60.0,

            gravity: Vec2::new(0.0, 900.0),
            walls: [
                WallDesc {
                    start: Vec2::new(margin, margin),
                    end: Vec2::new(margin, height - margin),
                },
                WallDesc {
                    start: Vec2::new(width - margin, margin),
                    end: Vec2::new(width - margin, height - margin),
                },
                WallDesc {
                    start: Vec2::new(margin, margin),
                    end: Vec2::new(width - margin, margin),
                },
                WallDesc {
                    start: Vec2::new(margin, height - 10.0),
                    end: Vec2::new(width - margin, height - 10.0),
                },
            ],
            wall_thickness: 1.0,
            wall_elasticity: 1.0,

            box_half_extent: 25.0,
            box_elasticity: 0.5,
            box_collision_type: 1,
            box1_start: Vec2::new(300.0, height - 60.0),
            box2_start: Vec2::new(500.0, height - 60.0),

            field_rects: [
                Rect::new(120.0, 10.0, 140.0, 32.0),
                Rect::new(400.0, 10.0, 140.0, 32.0),
                Rect::new(120.0, 60.0, 140.0, 32.0),
                Rect::new(400.0, 60.0, 140.0, 32.0),
            ],
            start_button: Rect::new(600.0, 20.0, 100.0, 40.0),
            font_size: 36.0,
            counter_position: Vec2::new(10.0, height - 40.0),
        }
    }
}
