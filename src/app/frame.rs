//! One iteration of the simulator loop, independent of any window library.

use log::{debug, info};

use super::controller::{RunState, SimulationController};
use super::form::{EditKey, InputForm};
use super::render::{Color, Renderer, TextAnchor};
use crate::math::Vec2;
use crate::world::{PhysicsWorld, Space};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    Key(Key),
    /// A printable character typed by the user.
    Text(char),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

pub struct App<S: Space = PhysicsWorld> {
    controller: SimulationController<S>,
    form: InputForm,
}

impl App<PhysicsWorld> {
    pub fn with_defaults() -> Self {
        Self::new(SimulationController::with_defaults())
    }
}

impl<S: Space> App<S> {
    pub fn new(controller: SimulationController<S>) -> Self {
        let form = InputForm::new(controller.config().field_rects);
        Self { controller, form }
    }

    pub fn controller(&self) -> &SimulationController<S> {
        &self.controller
    }

    pub fn form(&self) -> &InputForm {
        &self.form
    }

    pub fn handle_event(&mut self, event: InputEvent) -> LoopControl {
        match event {
            InputEvent::Quit | InputEvent::Key(Key::Escape) => {
                info!("quit requested");
                return LoopControl::Quit;
            }
            InputEvent::PointerDown(position) => {
                if self.controller.config().start_button.contains(position)
                    && self.controller.try_spawn_boxes(&self.form.spawn_input()).is_err()
                {
                    debug!("fields left editable after rejected start");
                }
                self.form.handle_pointer(position);
            }
            InputEvent::Key(Key::Enter) => {
                self.form.handle_key(EditKey::Enter);
            }
            InputEvent::Key(Key::Backspace) => {
                self.form.handle_key(EditKey::Backspace);
            }
            InputEvent::Key(Key::Other) => {}
            InputEvent::Text(ch) => self.form.handle_text(ch),
        }
        LoopControl::Continue
    }

    /// Advances the simulation by one fixed tick.
    pub fn tick(&mut self) {
        let dt = self.controller.config().tick_dt;
        self.controller.tick(dt);
    }

    pub fn draw<R: Renderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        let config = self.controller.config();
        let font_size = config.font_size;
        renderer.clear(Color::WHITE)?;

        for field in self.form.fields() {
            let rect = field.rect;
            renderer.draw_text(
                &field.label,
                rect.mid_left() - Vec2::new(10.0, 0.0),
                TextAnchor::MidRight,
                font_size,
                Color::BLACK,
            )?;
            renderer.draw_text(
                &field.text,
                Vec2::new(rect.x + 5.0, rect.y + 5.0),
                TextAnchor::TopLeft,
                font_size,
                Color::BLACK,
            )?;
            renderer.stroke_rect(rect, 2.0, Color::BLACK)?;
        }

        let button = config.start_button;
        renderer.fill_rect(button, Color::GREEN)?;
        renderer.draw_text(
            "Start",
            Vec2::new(button.x + 20.0, button.y + 5.0),
            TextAnchor::TopLeft,
            font_size,
            Color::BLACK,
        )?;

        renderer.draw_text(
            &format!("Collisions: {}", self.controller.collision_count()),
            config.counter_position,
            TextAnchor::TopLeft,
            font_size,
            Color::BLACK,
        )?;

        if self.controller.run_state() == RunState::Running {
            let boxes = self.controller.boxes();
            for shape in self.controller.space().debug_shapes() {
                let color = match boxes {
                    Some([first, _]) if shape.body == first => Color::RED,
                    Some([_, second]) if shape.body == second => Color::BLUE,
                    _ => Color::BLACK,
                };
                renderer.draw_shape(&shape.outline, color)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::form::FieldId;
    use crate::math::Rect;
    use crate::world::Outline;
    use std::convert::Infallible;

    #[derive(Debug, Clone, PartialEq)]
    enum DrawCall {
        Clear(Color),
        FillRect(Rect, Color),
        StrokeRect(Rect, f64, Color),
        Text(String, Vec2, TextAnchor, Color),
        Shape(Outline, Color),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<DrawCall>,
    }

    impl RecordingRenderer {
        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Text(text, ..) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn shape_colors(&self) -> Vec<Color> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Shape(_, color) => Some(*color),
                    _ => None,
                })
                .collect()
        }
    }

    impl Renderer for RecordingRenderer {
        type Error = Infallible;

        fn clear(&mut self, color: Color) -> Result<(), Infallible> {
            self.calls.push(DrawCall::Clear(color));
            Ok(())
        }
        fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Infallible> {
            self.calls.push(DrawCall::FillRect(rect, color));
            Ok(())
        }
        fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Color) -> Result<(), Infallible> {
            self.calls.push(DrawCall::StrokeRect(rect, line_width, color));
            Ok(())
        }
        fn draw_text(
            &mut self,
            text: &str,
            position: Vec2,
            anchor: TextAnchor,
            _size: f32,
            color: Color,
        ) -> Result<(), Infallible> {
            self.calls.push(DrawCall::Text(text.to_string(), position, anchor, color));
            Ok(())
        }
        fn draw_shape(&mut self, outline: &Outline, color: Color) -> Result<(), Infallible> {
            self.calls.push(DrawCall::Shape(outline.clone(), color));
            Ok(())
        }
    }

    fn render(app: &App) -> RecordingRenderer {
        let mut renderer = RecordingRenderer::default();
        app.draw(&mut renderer).unwrap();
        renderer
    }

    fn click_field(app: &mut App, id: FieldId) {
        let r = app.form().field(id).rect;
        app.handle_event(InputEvent::PointerDown(Vec2::new(r.x + 5.0, r.y + 5.0)));
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_event(InputEvent::Text(ch));
        }
    }

    fn fill_fields(app: &mut App, values: [&str; 4]) {
        for (id, text) in FieldId::ALL.into_iter().zip(values) {
            click_field(app, id);
            type_str(app, text);
        }
    }

    fn click_start(app: &mut App) {
        app.handle_event(InputEvent::PointerDown(Vec2::new(650.0, 40.0)));
    }

    #[test]
    fn test_quit_and_escape_end_the_loop() {
        let mut app = App::with_defaults();
        assert_eq!(app.handle_event(InputEvent::Key(Key::Other)), LoopControl::Continue);
        assert_eq!(app.handle_event(InputEvent::Key(Key::Escape)), LoopControl::Quit);
        assert_eq!(app.handle_event(InputEvent::Quit), LoopControl::Quit);
    }

    #[test]
    fn test_setup_frame_layout() {
        let app = App::with_defaults();
        let renderer = render(&app);

        assert_eq!(renderer.calls[0], DrawCall::Clear(Color::WHITE));
        assert!(renderer.calls.contains(&DrawCall::Text(
            "Mass 1:".to_string(),
            Vec2::new(110.0, 26.0),
            TextAnchor::MidRight,
            Color::BLACK
        )));
        assert!(renderer.calls.contains(&DrawCall::StrokeRect(
            Rect::new(400.0, 60.0, 140.0, 32.0),
            2.0,
            Color::BLACK
        )));
        assert!(renderer
            .calls
            .contains(&DrawCall::FillRect(Rect::new(600.0, 20.0, 100.0, 40.0), Color::GREEN)));
        assert!(renderer.calls.contains(&DrawCall::Text(
            "Start".to_string(),
            Vec2::new(620.0, 25.0),
            TextAnchor::TopLeft,
            Color::BLACK
        )));
        assert!(renderer.calls.contains(&DrawCall::Text(
            "Collisions: 0".to_string(),
            Vec2::new(10.0, 560.0),
            TextAnchor::TopLeft,
            Color::BLACK
        )));
        // Bodies only appear once running.
        assert!(renderer.shape_colors().is_empty());
    }

    #[test]
    fn test_field_text_is_drawn_inside_the_box() {
        let mut app = App::with_defaults();
        click_field(&mut app, FieldId::Velocity1);
        type_str(&mut app, "10");
        let renderer = render(&app);
        assert!(renderer.calls.contains(&DrawCall::Text(
            "10".to_string(),
            Vec2::new(405.0, 15.0),
            TextAnchor::TopLeft,
            Color::BLACK
        )));
    }

    #[test]
    fn test_enter_commits_focused_field() {
        let mut app = App::with_defaults();
        click_field(&mut app, FieldId::Mass1);
        type_str(&mut app, "12");
        app.handle_event(InputEvent::Key(Key::Enter));
        assert_eq!(app.form().field(FieldId::Mass1).value, Some(12.0));
        assert_eq!(app.form().focus(), None);

        // Unfocused typing goes nowhere.
        type_str(&mut app, "99");
        assert!(app.form().fields().iter().all(|f| !f.text.contains("99")));
    }

    #[test]
    fn test_start_with_empty_fields_stays_in_setup() {
        let mut app = App::with_defaults();
        click_start(&mut app);
        assert_eq!(app.controller().run_state(), RunState::Setup);
        assert_eq!(app.controller().boxes(), None);
        app.tick();
        assert_eq!(app.controller().collision_count(), 0);
    }

    #[test]
    fn test_invalid_start_keeps_text_then_correction_succeeds() {
        let mut app = App::with_defaults();
        fill_fields(&mut app, ["5", "abc", "5", "10"]);
        click_start(&mut app);
        assert_eq!(app.controller().run_state(), RunState::Setup);
        assert_eq!(app.form().field(FieldId::Velocity1).text, "abc");

        click_field(&mut app, FieldId::Velocity1);
        for _ in 0..3 {
            app.handle_event(InputEvent::Key(Key::Backspace));
        }
        type_str(&mut app, "10");
        click_start(&mut app);
        assert_eq!(app.controller().run_state(), RunState::Running);
    }

    #[test]
    fn test_running_frame_draws_walls_and_coloured_boxes() {
        let mut app = App::with_defaults();
        fill_fields(&mut app, ["5", "10", "5", "10"]);
        click_start(&mut app);
        click_start(&mut app);
        app.tick();

        let renderer = render(&app);
        let colors = renderer.shape_colors();
        assert_eq!(colors.len(), 6);
        assert_eq!(colors.iter().filter(|c| **c == Color::BLACK).count(), 4);
        assert_eq!(colors.iter().filter(|c| **c == Color::RED).count(), 1);
        assert_eq!(colors.iter().filter(|c| **c == Color::BLUE).count(), 1);
        assert!(renderer.texts().contains(&"Collisions: 0"));
    }

    #[test]
    fn test_scenario_counts_collisions() {
        let mut app = App::with_defaults();
        fill_fields(&mut app, ["5", "10", "5", "10"]);
        click_start(&mut app);
        for _ in 0..900 {
            app.tick();
        }
        let count = app.controller().collision_count();
        assert!(count > 0);
        let renderer = render(&app);
        let expected = format!("Collisions: {}", count);
        assert!(renderer.texts().contains(&expected.as_str()));
    }
}
