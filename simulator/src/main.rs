use box_collision::app::{App, InputEvent, Key, LoopControl, SimConfig, SimulationController};
use box_collision::{PhysicsWorld, Vec2};
use ggez::{
    conf, event,
    input::keyboard::{KeyCode, KeyInput},
    input::mouse::MouseButton,
    Context, ContextBuilder, GameResult,
};
use log::info;

mod renderer;

use renderer::CanvasRenderer;

struct SimulatorState {
    app: App,
    target_fps: u32,
    screen_width: f32,
    screen_height: f32,
}

impl SimulatorState {
    fn new(config: SimConfig) -> Self {
        let target_fps = config.target_fps;
        let (screen_width, screen_height) = (config.width as f32, config.height as f32);
        let controller = SimulationController::new(PhysicsWorld::new(), config);
        Self {
            app: App::new(controller),
            target_fps,
            screen_width,
            screen_height,
        }
    }

    fn dispatch(&mut self, ctx: &mut Context, event: InputEvent) {
        if self.app.handle_event(event) == LoopControl::Quit {
            ctx.request_quit();
        }
    }
}

impl event::EventHandler<ggez::GameError> for SimulatorState {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        // Fixed 1/60 s ticks, however long the frame took
        while ctx.time.check_update_time(self.target_fps) {
            self.app.tick();
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut renderer = CanvasRenderer::new(ctx, self.screen_width, self.screen_height);
        self.app.draw(&mut renderer)?;
        renderer.into_canvas().finish(ctx)
    }

    fn mouse_button_down_event(&mut self, ctx: &mut Context, button: MouseButton, x: f32, y: f32) -> GameResult {
        if button == MouseButton::Left {
            self.dispatch(ctx, InputEvent::PointerDown(Vec2::new(x as f64, y as f64)));
        }
        Ok(())
    }

    fn key_down_event(&mut self, ctx: &mut Context, input: KeyInput, _repeated: bool) -> GameResult {
        let key = match input.keycode {
            Some(KeyCode::Return) | Some(KeyCode::NumpadEnter) => Key::Enter,
            Some(KeyCode::Back) => Key::Backspace,
            Some(KeyCode::Escape) => Key::Escape,
            _ => Key::Other,
        };
        self.dispatch(ctx, InputEvent::Key(key));
        Ok(())
    }

    fn text_input_event(&mut self, ctx: &mut Context, character: char) -> GameResult {
        self.dispatch(ctx, InputEvent::Text(character));
        Ok(())
    }

    fn quit_event(&mut self, _ctx: &mut Context) -> GameResult<bool> {
        info!("collisions counted: {}", self.app.controller().collision_count());
        Ok(false)
    }
}

pub fn main() -> GameResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::default();
    let (ctx, event_loop) = ContextBuilder::new("box_collision_sim", "box_collision")
        .window_setup(conf::WindowSetup::default().title(config.title))
        .window_mode(conf::WindowMode::default().dimensions(config.width as f32, config.height as f32))
        .build()?;

    let state = SimulatorState::new(config);
    event::run(ctx, event_loop, state)
}
