use crate::{
    collision::types::{Point2, Vec2},
    utils::unit_vector_deg,
};

/// The moving-body side of terrain contact.
///
/// Terrain features mutate bodies only through this trait, so they work with any controller
/// that exposes position, world velocity, and ground-relative velocity.
pub trait MovingBody {
    fn position(&self) -> Point2;

    fn translate(&mut self, delta: Vec2);

    /// World-space velocity (units per second).
    fn velocity(&self) -> Vec2;

    fn set_velocity(&mut self, velocity: Vec2);

    /// Speed along the current surface tangent while grounded (units per second).
    fn ground_velocity(&self) -> f32;

    fn set_ground_velocity(&mut self, speed: f32);

    fn is_grounded(&self) -> bool;

    /// Tangent angle of the surface the body currently stands on, in degrees.
    fn surface_angle(&self) -> f32;

    /// Leave the ground, keeping the current world velocity.
    fn detach(&mut self);
}

/// A plain box-shaped body state usable as a controller on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Point2,
    /// Visual/physical rotation in degrees. Follows `surface_angle` while grounded.
    pub rotation_deg: f32,
    pub velocity: Vec2,
    pub ground_velocity: f32,
    pub grounded: bool,
    pub surface_angle: f32,
}

impl BodyState {
    /// An airborne body at rest.
    pub fn at(position: Point2) -> Self {
        Self {
            position,
            rotation_deg: 0.0,
            velocity: Vec2::zeros(),
            ground_velocity: 0.0,
            grounded: false,
            surface_angle: 0.0,
        }
    }

    /// A body standing on flat ground.
    pub fn grounded_at(position: Point2) -> Self {
        Self {
            grounded: true,
            ..Self::at(position)
        }
    }

    /// Attach to a surface with the given tangent angle, keeping the speed along it.
    pub fn land(&mut self, surface_angle: f32, ground_velocity: f32) {
        self.grounded = true;
        self.surface_angle = surface_angle;
        self.rotation_deg = surface_angle;
        self.ground_velocity = ground_velocity;
        self.velocity = unit_vector_deg(surface_angle) * ground_velocity;
    }
}

impl MovingBody for BodyState {
    fn position(&self) -> Point2 {
        self.position
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        if self.grounded {
            self.ground_velocity = velocity.dot(&unit_vector_deg(self.surface_angle));
        }
    }

    fn ground_velocity(&self) -> f32 {
        self.ground_velocity
    }

    fn set_ground_velocity(&mut self, speed: f32) {
        self.ground_velocity = speed;
        if self.grounded {
            self.velocity = unit_vector_deg(self.surface_angle) * speed;
        }
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn surface_angle(&self) -> f32 {
        self.surface_angle
    }

    fn detach(&mut self) {
        if self.grounded {
            self.velocity = unit_vector_deg(self.surface_angle) * self.ground_velocity;
        }
        self.grounded = false;
        self.ground_velocity = 0.0;
        self.surface_angle = 0.0;
        self.rotation_deg = 0.0;
    }
}
