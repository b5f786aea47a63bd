use log::debug;

use crate::{
    body::MovingBody,
    collision::types::Vec2,
    utils::{normal_from_surface_angle, unit_vector_deg},
};

use super::{ReactivePlatform, SurfaceContactState};

/// Launches bodies away from its surface on first contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    /// Launch speed along the surface normal, in units per second.
    pub power: f32,
    /// Keep the body's tangential speed instead of replacing the whole velocity.
    pub keep_tangential: bool,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            power: 10.0,
            keep_tangential: false,
        }
    }
}

impl Spring {
    pub fn new(power: f32) -> Self {
        Self {
            power,
            ..Self::default()
        }
    }
}

impl ReactivePlatform for Spring {
    fn on_contact_begin(&mut self, body: &mut dyn MovingBody, state: &SurfaceContactState) {
        let normal = unit_vector_deg(normal_from_surface_angle(state.surface_angle));
        let tangential = if self.keep_tangential {
            unit_vector_deg(state.surface_angle) * state.along
        } else {
            Vec2::zeros()
        };

        body.detach();
        body.set_velocity(tangential + normal * self.power);
        debug!("spring {:?} launched body at {:.2}", state.surface, self.power);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        body::BodyState,
        collision::types::{Point2, RawHit, SurfaceId, TerrainHit},
        contact::{ContactTracker, TerrainFeatures},
        side::LogicalSide,
    };

    fn pad_hit(normal: Vec2) -> TerrainHit {
        TerrainHit::from_raw(
            RawHit {
                surface: SurfaceId(3),
                point: Point2::origin(),
                normal,
                fraction: 0.5,
            },
            LogicalSide::Bottom,
            Point2::from(normal),
            Point2::from(-normal),
        )
    }

    #[test]
    fn floor_spring_launches_straight_up() {
        let mut features = TerrainFeatures::new();
        features.register(SurfaceId(3), Spring::new(12.0));
        let mut tracker = ContactTracker::new();
        let mut body = BodyState::grounded_at(Point2::origin());
        body.land(0.0, 4.0);

        tracker.update(&[pad_hit(Vec2::y())], &mut body, &mut features, 0.1);

        assert!(!body.grounded);
        assert!((body.velocity - Vec2::new(0.0, 12.0)).norm() < 1.0e-4);
    }

    #[test]
    fn wall_spring_can_keep_tangential_speed() {
        let mut features = TerrainFeatures::new();
        features.register(
            SurfaceId(3),
            Spring {
                power: 8.0,
                keep_tangential: true,
            },
        );
        let mut tracker = ContactTracker::new();
        let mut body = BodyState::at(Point2::origin());
        body.velocity = Vec2::new(0.0, 2.0);

        // Wall facing left: normal 180, tangent 90 (up).
        tracker.update(&[pad_hit(-Vec2::x())], &mut body, &mut features, 0.1);

        assert!((body.velocity - Vec2::new(-8.0, 2.0)).norm() < 1.0e-4);
    }
}
