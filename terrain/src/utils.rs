use crate::collision::{
    settings::DIST_EPS,
    types::{Point2, Vec2},
};

/// Wrap an angle in degrees into `[0, 360)`.
///
/// Non-finite input maps to `0.0` so callers never have to special-case NaN from a degenerate
/// normal.
#[inline]
pub fn positive_angle_deg(angle_deg: f32) -> f32 {
    if !angle_deg.is_finite() {
        return 0.0;
    }
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.0.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest difference `to - from` in degrees, in `(-180, 180]`.
#[inline]
pub fn angle_difference_deg(from_deg: f32, to_deg: f32) -> f32 {
    let d = positive_angle_deg(to_deg - from_deg);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Unit vector pointing at `angle_deg` (counter-clockwise from +X).
#[inline]
pub fn unit_vector_deg(angle_deg: f32) -> Vec2 {
    let r = angle_deg.to_radians();
    Vec2::new(r.cos(), r.sin())
}

/// Direction of `v` in degrees, wrapped into `[0, 360)`.
///
/// Returns `None` for vectors too short to have a direction.
#[inline]
pub fn angle_of_vector_deg(v: Vec2) -> Option<f32> {
    if v.norm_squared() <= DIST_EPS * DIST_EPS {
        return None;
    }
    Some(positive_angle_deg(v.y.atan2(v.x).to_degrees()))
}

/// Surface (tangent) angle for a surface whose outward normal points at `normal_deg`.
///
/// A flat floor has normal 90 and surface angle 0.
#[inline]
pub fn surface_angle_from_normal(normal_deg: f32) -> f32 {
    positive_angle_deg(normal_deg - 90.0)
}

/// Inverse of [`surface_angle_from_normal`].
#[inline]
pub fn normal_from_surface_angle(surface_deg: f32) -> f32 {
    positive_angle_deg(surface_deg + 90.0)
}

/// Split `velocity` into `(along, perpendicular)` components relative to a surface whose
/// tangent points at `surface_deg`. `perpendicular` is positive away from the surface.
#[inline]
pub fn decompose_velocity(velocity: Vec2, surface_deg: f32) -> (f32, f32) {
    let tangent = unit_vector_deg(surface_deg);
    let normal = unit_vector_deg(normal_from_surface_angle(surface_deg));
    (velocity.dot(&tangent), velocity.dot(&normal))
}

/// Rebuild a world velocity from its surface-relative components.
#[inline]
pub fn compose_velocity(along: f32, perpendicular: f32, surface_deg: f32) -> Vec2 {
    unit_vector_deg(surface_deg) * along
        + unit_vector_deg(normal_from_surface_angle(surface_deg)) * perpendicular
}

/// Rotate a body-local offset by `angle_deg` and add it to `origin`.
#[inline]
pub fn offset_point(origin: Point2, local: Vec2, angle_deg: f32) -> Point2 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    origin + Vec2::new(local.x * c - local.y * s, local.x * s + local.y * c)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-4;

    #[test]
    fn positive_angle_wraps_both_directions() {
        assert!((positive_angle_deg(-90.0) - 270.0).abs() < EPS);
        assert!((positive_angle_deg(720.0 + 45.0) - 45.0).abs() < EPS);
        assert_eq!(positive_angle_deg(360.0), 0.0);
        assert_eq!(positive_angle_deg(f32::NAN), 0.0);
        // Tiny negatives must not round up to 360.
        assert!(positive_angle_deg(-1.0e-9) < 360.0);
    }

    #[test]
    fn angle_difference_takes_the_short_way_round() {
        assert!((angle_difference_deg(350.0, 10.0) - 20.0).abs() < EPS);
        assert!((angle_difference_deg(10.0, 350.0) + 20.0).abs() < EPS);
        assert!((angle_difference_deg(0.0, 180.0) - 180.0).abs() < EPS);
    }

    #[test]
    fn surface_and_normal_angles_are_a_quarter_turn_apart() {
        assert!((surface_angle_from_normal(90.0) - 0.0).abs() < EPS);
        assert!((surface_angle_from_normal(0.0) - 270.0).abs() < EPS);
        assert!((normal_from_surface_angle(45.0) - 135.0).abs() < EPS);
    }

    #[test]
    fn decompose_then_compose_preserves_velocity() {
        // A 30 degree slope: check against a hand-projected vector.
        let v = Vec2::new(3.0, -1.0);
        let (along, perp) = decompose_velocity(v, 30.0);
        let back = compose_velocity(along, perp, 30.0);
        assert!((back - v).norm() < EPS);

        // On flat ground, along = x and perpendicular = y.
        let (along, perp) = decompose_velocity(v, 0.0);
        assert!((along - 3.0).abs() < EPS);
        assert!((perp + 1.0).abs() < EPS);
    }

    #[test]
    fn vector_angle_of_zero_vector_is_none() {
        assert!(angle_of_vector_deg(Vec2::zeros()).is_none());
        let a = angle_of_vector_deg(Vec2::new(0.0, -2.0)).unwrap();
        assert!((a - 270.0).abs() < EPS);
    }

    #[test]
    fn offset_point_rotates_local_offsets() {
        let p = offset_point(Point2::new(1.0, 1.0), Vec2::new(0.0, -1.0), 90.0);
        // Rotating "down" by a quarter turn gives "right".
        assert!((p - Point2::new(2.0, 1.0)).norm() < EPS);
    }
}
