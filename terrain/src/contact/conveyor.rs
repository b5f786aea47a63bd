use crate::{body::MovingBody, utils::unit_vector_deg};

use super::{ReactivePlatform, SurfaceContactState};

/// Default belt speed, in units per second.
pub const DEFAULT_CONVEYOR_VELOCITY: f32 = 2.5;

/// Carries bodies along its surface and hands them the belt's momentum when they leave.
///
/// Positive `velocity` moves along the surface tangent (rightwards on a flat belt), negative
/// moves backwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConveyorBelt {
    pub velocity: f32,
}

impl Default for ConveyorBelt {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_CONVEYOR_VELOCITY,
        }
    }
}

impl ConveyorBelt {
    pub fn new(velocity: f32) -> Self {
        Self { velocity }
    }
}

impl ReactivePlatform for ConveyorBelt {
    fn on_contact_stay(&mut self, body: &mut dyn MovingBody, state: &SurfaceContactState, dt: f32) {
        body.translate(unit_vector_deg(state.surface_angle) * self.velocity * dt);
    }

    fn on_contact_end(&mut self, body: &mut dyn MovingBody, state: &SurfaceContactState) {
        if body.is_grounded() {
            body.set_ground_velocity(body.ground_velocity() + self.velocity);
        } else {
            let boost = unit_vector_deg(state.surface_angle) * self.velocity;
            body.set_velocity(body.velocity() + boost);
        }
    }
}
