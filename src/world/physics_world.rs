use crate::{
    collision::{self, CollisionManifold},
    common::Material,
    math::vec2::Vec2,
    objects::rigid_body::RigidBody,
    shapes::{LineSegment, Polygon, Shape},
};
use crate::integration::integrator;
use crate::world::space::{BodyHandle, BoxDesc, DebugShape, Outline, PostSolveHandler, Space};

use log::{debug, trace};

struct CollisionHandler {
    tag_a: u32,
    tag_b: u32,
    post_solve: PostSolveHandler,
}

impl CollisionHandler {
    fn matches(&self, a: u32, b: u32) -> bool {
        (self.tag_a == a && self.tag_b == b) || (self.tag_a == b && self.tag_b == a)
    }
}

pub struct PhysicsWorld {
    pub bodies: Vec<RigidBody>,
    pub gravity: Vec2,
    /// Contacts detected during the last step.
    pub contacts: Vec<CollisionManifold>,
    handlers: Vec<CollisionHandler>,
}

impl PhysicsWorld {
    const COLLISION_ITERATIONS: usize = 10; // Sequential impulse passes per step
    const POSITIONAL_CORRECTION_PERCENT: f64 = 0.2; // Share of the penetration removed per step
    const POSITIONAL_CORRECTION_SLOP: f64 = 0.01; // Penetration left alone

    /// Creates a new, empty physics world with y-down gravity.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            gravity: Vec2::new(0.0, 981.0),
            contacts: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Adds a rigid body to the world and returns its index.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let index = self.bodies.len();
        self.bodies.push(body);
        index
    }

    /// Checks for collisions between all pairs of bodies.
    fn check_collisions(&mut self) {
        self.contacts.clear();

        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let body_a = &self.bodies[i];
                let body_b = &self.bodies[j];

                if body_a.is_static() && body_b.is_static() {
                    continue;
                }

                if let Some(manifold) = collision::check_collision(body_a, i, body_b, j) {
                    self.contacts.push(manifold);
                }
            }
        }
    }

    fn body_pair(&mut self, manifold: &CollisionManifold) -> (&mut RigidBody, &mut RigidBody) {
        // Manifolds always carry body_a_idx < body_b_idx.
        let (head, tail) = self.bodies.split_at_mut(manifold.body_b_idx);
        (&mut head[manifold.body_a_idx], &mut tail[0])
    }

    /// Normal speed the contact should separate at once solved, taken from
    /// the approach speed before gravity is applied for this step.
    fn bounce_velocity(&self, manifold: &CollisionManifold) -> f64 {
        let body_a = &self.bodies[manifold.body_a_idx];
        let body_b = &self.bodies[manifold.body_b_idx];
        let contact_point = manifold.contact.midpoint();

        let relative_velocity = body_b.velocity_at(contact_point) - body_a.velocity_at(contact_point);
        let relative_velocity_normal = relative_velocity.dot(manifold.normal);
        let restitution = body_a.material.combine(&body_b.material).restitution;

        (-restitution * relative_velocity_normal).max(0.0)
    }

    /// Applies impulse-based resolution for a single contact, driving its
    /// normal speed up to `bounce`.
    fn apply_collision_impulse(&mut self, manifold: &CollisionManifold, bounce: f64) {
        let (body_a, body_b) = self.body_pair(manifold);

        let contact_point = manifold.contact.midpoint();
        let r_a = contact_point - body_a.position;
        let r_b = contact_point - body_b.position;

        let relative_velocity = body_b.velocity_at(contact_point) - body_a.velocity_at(contact_point);
        let relative_velocity_normal = relative_velocity.dot(manifold.normal);

        // Already separating fast enough
        if relative_velocity_normal >= bounce {
            return;
        }

        let ra_cross_n = r_a.cross(manifold.normal);
        let rb_cross_n = r_b.cross(manifold.normal);
        let effective_mass_normal = body_a.inv_mass
            + body_b.inv_mass
            + ra_cross_n * ra_cross_n * body_a.inv_inertia
            + rb_cross_n * rb_cross_n * body_b.inv_inertia;
        if effective_mass_normal <= 0.0 {
            return;
        }

        let j = (bounce - relative_velocity_normal) / effective_mass_normal;
        let impulse = manifold.normal * j;
        body_a.apply_impulse(-impulse, contact_point);
        body_b.apply_impulse(impulse, contact_point);

        trace!(
            "contact {}-{}: vn={:.3} bounce={:.3} j={:.3}",
            manifold.body_a_idx,
            manifold.body_b_idx,
            relative_velocity_normal,
            bounce,
            j
        );
    }

    /// Pushes overlapping bodies apart in proportion to their inverse masses.
    fn apply_positional_correction(&mut self, manifold: &CollisionManifold) {
        let correction_magnitude = (manifold.depth - Self::POSITIONAL_CORRECTION_SLOP).max(0.0);
        if correction_magnitude < 1e-9 {
            return;
        }

        let (body_a, body_b) = self.body_pair(manifold);
        let total_inv_mass = body_a.inv_mass + body_b.inv_mass;
        if total_inv_mass < 1e-9 {
            return;
        }

        let correction =
            manifold.normal * (correction_magnitude / total_inv_mass * Self::POSITIONAL_CORRECTION_PERCENT);
        body_a.position -= correction * body_a.inv_mass;
        body_b.position += correction * body_b.inv_mass;
    }

    fn run_post_solve_handlers(&mut self, contacts: &[CollisionManifold]) {
        if self.handlers.is_empty() {
            return;
        }
        for manifold in contacts {
            let tag_a = self.bodies[manifold.body_a_idx].collision_type;
            let tag_b = self.bodies[manifold.body_b_idx].collision_type;
            for handler in self.handlers.iter_mut().filter(|h| h.matches(tag_a, tag_b)) {
                (handler.post_solve)(manifold);
            }
        }
    }

    /// Advances the simulation by one time step `dt`.
    pub fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        // 1. Collision detection
        self.check_collisions();
        let contacts = std::mem::take(&mut self.contacts);
        let bounces: Vec<f64> = contacts.iter().map(|m| self.bounce_velocity(m)).collect();

        // 2. Gravity into velocities
        let gravity = self.gravity;
        for body in self.bodies.iter_mut() {
            integrator::integrate_velocity(body, gravity, dt);
        }

        // 3. Solve contacts (impulses)
        for _ in 0..Self::COLLISION_ITERATIONS {
            for (manifold, &bounce) in contacts.iter().zip(&bounces) {
                self.apply_collision_impulse(manifold, bounce);
            }
        }

        // 4. Post-solve callbacks
        self.run_post_solve_handlers(&contacts);

        // 5. Positions follow the resolved velocities
        for body in self.bodies.iter_mut() {
            integrator::integrate_position(body, dt);
        }

        // 6. Positional correction (to prevent sinking)
        for manifold in &contacts {
            self.apply_positional_correction(manifold);
        }

        self.contacts = contacts;
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Space for PhysicsWorld {
    fn add_segment(&mut self, start: Vec2, end: Vec2, thickness: f64, elasticity: f64) -> BodyHandle {
        let shape = Shape::Segment(LineSegment::with_radius(start, end, thickness));
        let mut body = RigidBody::new_static(shape, Vec2::ZERO, 0.0);
        body.material = Material::elastic(elasticity);
        self.add_body(body)
    }

    fn add_box(&mut self, desc: BoxDesc) -> BodyHandle {
        let shape = Shape::Polygon(Polygon::new_box(desc.half_extent, desc.half_extent));
        let mut body = RigidBody::new_dynamic(desc.mass, shape);
        body.position = desc.position;
        body.linear_velocity = desc.velocity;
        body.material = Material::elastic(desc.elasticity);
        body.collision_type = desc.collision_type;
        self.add_body(body)
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn add_post_solve_handler(&mut self, tag_a: u32, tag_b: u32, handler: PostSolveHandler) {
        debug!("registered post-solve handler for tags ({}, {})", tag_a, tag_b);
        self.handlers.push(CollisionHandler {
            tag_a,
            tag_b,
            post_solve: handler,
        });
    }

    fn step(&mut self, dt: f64) {
        PhysicsWorld::step(self, dt);
    }

    fn debug_shapes(&self) -> Vec<DebugShape> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(index, body)| {
                let outline = match &body.shape {
                    Shape::Segment(segment) => {
                        let (a, b) = body.world_segment()?;
                        Outline::Segment {
                            a,
                            b,
                            radius: segment.radius,
                        }
                    }
                    Shape::Polygon(_) => Outline::Polygon(body.world_hull()?),
                };
                Some(DebugShape {
                    body: index,
                    is_static: body.is_static(),
                    outline,
                })
            })
            .collect()
    }

    fn body_position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| b.position)
    }

    fn body_velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| b.linear_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ContactPoint;
    use std::cell::Cell;
    use std::rc::Rc;
    const EPSILON: f64 = 1e-9;

    fn box_desc(position: Vec2, velocity: Vec2, collision_type: u32) -> BoxDesc {
        BoxDesc {
            mass: 5.0,
            half_extent: 25.0,
            position,
            velocity,
            elasticity: 0.5,
            collision_type,
        }
    }

    fn counting_handler(counter: &Rc<Cell<u32>>) -> PostSolveHandler {
        let counter = Rc::clone(counter);
        Box::new(move |_: &CollisionManifold| counter.set(counter.get() + 1))
    }

    #[test]
    fn test_world_new() {
        let world = PhysicsWorld::new();
        assert!(world.bodies.is_empty());
        assert_eq!(world.gravity, Vec2::new(0.0, 981.0));
        assert!(world.contacts.is_empty());
    }

    #[test]
    fn test_add_body() {
        let mut world = PhysicsWorld::new();
        let shape = Shape::Polygon(Polygon::new_box(1.0, 1.0));
        let idx1 = world.add_body(RigidBody::new_dynamic(1.0, shape.clone()));
        let idx2 = world.add_body(RigidBody::new_dynamic(2.0, shape));
        assert_eq!(idx1, 0);
        assert_eq!(idx2, 1);
        assert_eq!(world.bodies[1].mass, 2.0);
    }

    #[test]
    fn test_step_gravity() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec2::new(0.0, 10.0));
        let idx = world.add_box(box_desc(Vec2::ZERO, Vec2::ZERO, 0));

        world.step(0.1);
        assert!(world.bodies[idx].linear_velocity.x.abs() < EPSILON);
        assert!((world.bodies[idx].linear_velocity.y - 1.0).abs() < EPSILON);
        assert!((world.bodies[idx].position.y - 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_step_non_positive_dt_is_ignored() {
        let mut world = PhysicsWorld::new();
        let idx = world.add_box(box_desc(Vec2::ZERO, Vec2::new(3.0, 0.0), 0));
        world.step(0.0);
        world.step(-1.0);
        assert_eq!(world.bodies[idx].position, Vec2::ZERO);
    }

    #[test]
    fn test_static_segments_never_move() {
        let mut world = PhysicsWorld::new();
        let a = world.add_segment(Vec2::new(50.0, 50.0), Vec2::new(50.0, 550.0), 1.0, 1.0);
        let b = world.add_segment(Vec2::new(50.0, 50.0), Vec2::new(750.0, 50.0), 1.0, 1.0);
        let before = world.bodies.clone();
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        assert_eq!(world.bodies[a], before[a]);
        assert_eq!(world.bodies[b], before[b]);
        // Touching static walls produce no contacts.
        assert!(world.contacts.is_empty());
    }

    #[test]
    fn test_positional_correction_basic() {
        let mut world = PhysicsWorld::new();
        let a = world.add_box(box_desc(Vec2::new(-0.5, 0.0), Vec2::ZERO, 0));
        let b = world.add_box(box_desc(Vec2::new(0.5, 0.0), Vec2::ZERO, 0));
        let manifold = CollisionManifold {
            body_a_idx: a,
            body_b_idx: b,
            normal: Vec2::new(1.0, 0.0),
            depth: 1.0,
            contact: ContactPoint::default(),
        };

        world.apply_positional_correction(&manifold);

        // (1.0 - 0.01) / (0.2 + 0.2) * 0.2 = 0.495, split by inverse mass 0.2 each
        assert!((world.bodies[a].position.x + 0.5 + 0.099).abs() < EPSILON);
        assert!((world.bodies[b].position.x - 0.5 - 0.099).abs() < EPSILON);
    }

    #[test]
    fn test_fast_elastic_boxes_exchange_velocities() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec2::ZERO);
        let mut desc_a = box_desc(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 1);
        desc_a.elasticity = 1.0;
        let mut desc_b = box_desc(Vec2::new(49.0, 0.0), Vec2::new(-100.0, 0.0), 1);
        desc_b.elasticity = 1.0;
        let a = world.add_box(desc_a);
        let b = world.add_box(desc_b);

        world.step(1.0 / 60.0);

        let va = world.body_velocity(a).unwrap();
        let vb = world.body_velocity(b).unwrap();
        assert!((va.x + 100.0).abs() < 1e-6, "va = {:?}", va);
        assert!((vb.x - 100.0).abs() < 1e-6, "vb = {:?}", vb);
        assert!(va.y.abs() < 1e-9 && vb.y.abs() < 1e-9);
        assert!(world.bodies[a].angular_velocity.abs() < 1e-9);
    }

    #[test]
    fn test_slow_contact_keeps_box_elasticity() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec2::ZERO);
        let hits = Rc::new(Cell::new(0));
        world.add_post_solve_handler(1, 1, counting_handler(&hits));
        let a = world.add_box(box_desc(Vec2::new(0.0, 0.0), Vec2::new(14.0, 0.0), 1));
        let b = world.add_box(box_desc(Vec2::new(49.0, 0.0), Vec2::new(-14.0, 0.0), 1));

        world.step(1.0 / 60.0);

        // Restitution 0.5 * 0.5: a 28 approach comes back as 7.
        let va = world.body_velocity(a).unwrap();
        let vb = world.body_velocity(b).unwrap();
        assert!((va.x + 3.5).abs() < 1e-6, "va = {:?}", va);
        assert!((vb.x - 3.5).abs() < 1e-6, "vb = {:?}", vb);

        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }
        let settled = hits.get();
        assert!(world.contacts.is_empty());
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        assert_eq!(hits.get(), settled);
        assert!((world.body_velocity(a).unwrap().x + 3.5).abs() < 1e-6);
        assert!((world.body_velocity(b).unwrap().x - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_separating_contact_gets_no_impulse() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec2::ZERO);
        let a = world.add_box(box_desc(Vec2::new(0.0, 0.0), Vec2::new(-1.0, 0.0), 1));
        let b = world.add_box(box_desc(Vec2::new(49.0, 0.0), Vec2::new(1.0, 0.0), 1));

        world.step(1.0 / 60.0);

        assert_eq!(world.contacts.len(), 1);
        assert_eq!(world.body_velocity(a), Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(world.body_velocity(b), Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_box_settles_on_floor() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec2::new(0.0, 900.0));
        world.add_segment(Vec2::new(50.0, 590.0), Vec2::new(750.0, 590.0), 1.0, 1.0);
        let b = world.add_box(box_desc(Vec2::new(300.0, 540.0), Vec2::ZERO, 1));

        for _ in 0..300 {
            world.step(1.0 / 60.0);
        }

        let p = world.body_position(b).unwrap();
        let v = world.body_velocity(b).unwrap();
        // Bottom face rests on the floor skin at y = 589.
        assert!((p.y + 25.0 - 589.0).abs() < 0.5, "position {:?}", p);
        assert!((p.x - 300.0).abs() < EPSILON);
        assert!(v.y.abs() < 1e-6, "velocity {:?}", v);
        assert!(world.bodies[b].rotation.abs() < 1e-9);
    }

    #[test]
    fn test_post_solve_handler_fires_per_matching_contact() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec2::ZERO);
        let hits = Rc::new(Cell::new(0));
        world.add_post_solve_handler(1, 1, counting_handler(&hits));
        world.add_box(box_desc(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 1));
        world.add_box(box_desc(Vec2::new(49.0, 0.0), Vec2::new(-10.0, 0.0), 1));

        world.step(1.0 / 60.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(world.contacts.len(), 1);
    }

    #[test]
    fn test_post_solve_handler_tags_match_in_either_order() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec2::ZERO);
        let reversed = Rc::new(Cell::new(0));
        let unrelated = Rc::new(Cell::new(0));
        world.add_post_solve_handler(2, 1, counting_handler(&reversed));
        world.add_post_solve_handler(1, 1, counting_handler(&unrelated));
        world.add_box(box_desc(Vec2::new(0.0, 0.0), Vec2::ZERO, 1));
        world.add_box(box_desc(Vec2::new(49.0, 0.0), Vec2::ZERO, 2));

        world.step(1.0 / 60.0);
        assert_eq!(reversed.get(), 1);
        assert_eq!(unrelated.get(), 0);
    }

    #[test]
    fn test_handler_ignores_box_wall_contacts() {
        let mut world = PhysicsWorld::new();
        let hits = Rc::new(Cell::new(0));
        world.add_post_solve_handler(1, 1, counting_handler(&hits));
        world.add_segment(Vec2::new(50.0, 590.0), Vec2::new(750.0, 590.0), 1.0, 1.0);
        world.add_box(box_desc(Vec2::new(300.0, 565.0), Vec2::ZERO, 1));

        world.step(1.0 / 60.0);
        assert_eq!(world.contacts.len(), 1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_step_is_deterministic() {
        let build = || {
            let mut world = PhysicsWorld::new();
            world.set_gravity(Vec2::new(0.0, 900.0));
            world.add_segment(Vec2::new(50.0, 590.0), Vec2::new(750.0, 590.0), 1.0, 1.0);
            world.add_box(box_desc(Vec2::new(300.0, 540.0), Vec2::new(40.0, 0.0), 1));
            world.add_box(box_desc(Vec2::new(400.0, 540.0), Vec2::new(-40.0, 0.0), 1));
            world
        };
        let mut first = build();
        let mut second = build();
        for _ in 0..240 {
            first.step(1.0 / 60.0);
            second.step(1.0 / 60.0);
        }
        assert_eq!(first.bodies, second.bodies);
    }

    #[test]
    fn test_debug_shapes_cover_every_body() {
        let mut world = PhysicsWorld::new();
        let wall = world.add_segment(Vec2::new(50.0, 50.0), Vec2::new(750.0, 50.0), 1.0, 1.0);
        let b = world.add_box(box_desc(Vec2::new(300.0, 540.0), Vec2::ZERO, 1));

        let shapes = world.debug_shapes();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[wall].body, wall);
        assert!(shapes[wall].is_static);
        assert_eq!(
            shapes[wall].outline,
            Outline::Segment {
                a: Vec2::new(50.0, 50.0),
                b: Vec2::new(750.0, 50.0),
                radius: 1.0
            }
        );
        match &shapes[b].outline {
            Outline::Polygon(vertices) => {
                assert_eq!(vertices.len(), 4);
                assert!(vertices.contains(&Vec2::new(275.0, 515.0)));
                assert!(vertices.contains(&Vec2::new(325.0, 565.0)));
            }
            other => panic!("expected polygon, got {:?}", other),
        }
        assert!(world.body_position(99).is_none());
    }
}
