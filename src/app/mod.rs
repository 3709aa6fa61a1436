//! Headless simulator: input form, controller, frame logic and the renderer seam.

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod frame;
pub mod render;

pub use config::SimConfig;
pub use controller::{CollisionCounter, RunState, SimulationController, SpawnInput, SpawnOutcome};
pub use error::InputError;
pub use form::{FieldId, InputForm};
pub use frame::{App, InputEvent, Key, LoopControl};
pub use render::{Color, Renderer, TextAnchor};
