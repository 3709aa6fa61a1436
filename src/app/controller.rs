//! Owns the physics space, spawns the two boxes once, and counts their collisions.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info, warn};

use super::config::SimConfig;
use super::error::{parse_number, InputError};
use super::form::FieldId;
use crate::collision::CollisionManifold;
use crate::math::Vec2;
use crate::world::{BodyHandle, BoxDesc, PhysicsWorld, Space};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Setup,
    Running,
}

/// Box-box contact count, shared between the controller and the post-solve handler.
#[derive(Debug, Clone, Default)]
pub struct CollisionCounter(Rc<Cell<u64>>);

impl CollisionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

/// Raw text of the four fields at the moment Start is clicked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnInput {
    pub mass1: String,
    pub velocity1: String,
    pub mass2: String,
    pub velocity2: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub mass1: f64,
    pub velocity1: f64,
    pub mass2: f64,
    pub velocity2: f64,
}

impl SpawnParams {
    /// All four values must parse and both masses must be positive.
    /// A box needs positive mass to be dynamic; anything else would sit static at the origin.
    pub fn parse(input: &SpawnInput) -> Result<Self, InputError> {
        let params = SpawnParams {
            mass1: parse_number(FieldId::Mass1, &input.mass1)?,
            velocity1: parse_number(FieldId::Velocity1, &input.velocity1)?,
            mass2: parse_number(FieldId::Mass2, &input.mass2)?,
            velocity2: parse_number(FieldId::Velocity2, &input.velocity2)?,
        };
        for (field, value) in [(FieldId::Mass1, params.mass1), (FieldId::Mass2, params.mass2)] {
            if value <= 0.0 {
                return Err(InputError::NonPositiveMass { field, value });
            }
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned,
    AlreadyRunning,
}

pub struct SimulationController<S: Space = PhysicsWorld> {
    space: S,
    config: SimConfig,
    state: RunState,
    counter: CollisionCounter,
    boxes: Option<[BodyHandle; 2]>,
}

impl SimulationController<PhysicsWorld> {
    pub fn with_defaults() -> Self {
        Self::new(PhysicsWorld::new(), SimConfig::default())
    }
}

impl<S: Space> SimulationController<S> {
    /// Builds the walls, sets gravity and registers the box-box counter on `space`.
    pub fn new(mut space: S, config: SimConfig) -> Self {
        for wall in &config.walls {
            space.add_segment(wall.start, wall.end, config.wall_thickness, config.wall_elasticity);
        }
        space.set_gravity(config.gravity);

        let counter = CollisionCounter::new();
        let handler_counter = counter.clone();
        space.add_post_solve_handler(
            config.box_collision_type,
            config.box_collision_type,
            Box::new(move |_: &CollisionManifold| handler_counter.increment()),
        );

        Self {
            space,
            config,
            state: RunState::Setup,
            counter,
            boxes: None,
        }
    }

    /// Spawns both boxes from the field text. A no-op once running; on
    /// invalid input nothing is spawned and the state stays `Setup`.
    pub fn try_spawn_boxes(&mut self, input: &SpawnInput) -> Result<SpawnOutcome, InputError> {
        if self.state == RunState::Running {
            debug!("start ignored: boxes already spawned");
            return Ok(SpawnOutcome::AlreadyRunning);
        }

        let params = SpawnParams::parse(input).map_err(|err| {
            warn!("start rejected: {}", err);
            err
        })?;

        let desc1 = self.box_desc(params.mass1, self.config.box1_start, Vec2::new(params.velocity1, 0.0));
        let desc2 = self.box_desc(params.mass2, self.config.box2_start, Vec2::new(-params.velocity2, 0.0));
        let box1 = self.space.add_box(desc1);
        let box2 = self.space.add_box(desc2);
        self.boxes = Some([box1, box2]);
        self.state = RunState::Running;
        info!(
            "spawned boxes: m1={} v1={} m2={} v2={}",
            params.mass1, params.velocity1, params.mass2, params.velocity2
        );
        Ok(SpawnOutcome::Spawned)
    }

    fn box_desc(&self, mass: f64, position: Vec2, velocity: Vec2) -> BoxDesc {
        BoxDesc {
            mass,
            half_extent: self.config.box_half_extent,
            position,
            velocity,
            elasticity: self.config.box_elasticity,
            collision_type: self.config.box_collision_type,
        }
    }

    /// Advances the space by `dt` while running.
    pub fn tick(&mut self, dt: f64) {
        if self.state == RunState::Running {
            self.space.step(dt);
        }
    }

    pub fn collision_count(&self) -> u64 {
        self.counter.get()
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn boxes(&self) -> Option<[BodyHandle; 2]> {
        self.boxes
    }

    pub fn space(&self) -> &S {
        &self.space
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
