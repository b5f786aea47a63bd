/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- the terrain source (raw segment intersections)
- the surface classifier (candidate hits)
- the terrain caster and its result pool (accepted hits)
- the surface-following controller and the contact protocol
*/

use nalgebra as na;

use crate::{
    side::{LogicalSide, side_of},
    utils::{angle_of_vector_deg, surface_angle_from_normal},
};

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Point2 = na::Point2<f32>;
pub type Iso = na::Isometry2<f32>;

/// Opaque, non-owning handle to a collidable surface.
///
/// The value is the stable id the surface was registered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// A rigid 2D transform in world space. Rotation is in degrees, counter-clockwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec2,
    pub rotation_deg: f32,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec2, rotation_deg: f32) -> Self {
        Self {
            translation,
            rotation_deg,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec2) -> Self {
        Self::new(translation, 0.0)
    }

    /// Convert to nalgebra `Isometry2` for use with rapier queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::new(self.translation, self.rotation_deg.to_radians())
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.translation.iter().all(|c| c.is_finite()) && self.rotation_deg.is_finite()
    }
}

/// One raw intersection of a cast segment with a surface, before classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawHit {
    pub surface: SurfaceId,
    /// World-space contact point.
    pub point: Point2,
    /// Outward surface normal at the contact point (unit length, or zero if unknown).
    pub normal: Vec2,
    /// Fraction (0..1) of the segment where the hit occurred.
    pub fraction: f32,
}

/// A candidate or accepted terrain contact, annotated with the query that produced it.
///
/// This is a plain value: it references its surface by id and owns nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainHit {
    pub surface: SurfaceId,
    pub point: Point2,
    /// Outward surface normal (unit length).
    pub normal: Vec2,
    /// Normal direction in degrees, `[0, 360)`.
    pub normal_angle: f32,
    /// The side of the body that issued the query (`Any` when unspecified).
    pub side: LogicalSide,
    pub start: Point2,
    pub end: Point2,
    /// Distance from `start` to `point` along the segment.
    pub distance: f32,
    /// The segment started inside the surface.
    pub inside: bool,
}

impl TerrainHit {
    /// Build a hit from a raw intersection of the segment `start -> end`.
    ///
    /// A zero normal (cast started inside the surface) is replaced by the reversed segment
    /// direction so the hit still faces the caster.
    pub fn from_raw(raw: RawHit, side: LogicalSide, start: Point2, end: Point2) -> Self {
        let segment = end - start;
        let len = segment.norm();
        let raw_angle = angle_of_vector_deg(raw.normal);
        let inside = raw_angle.is_none();
        let normal_angle = raw_angle
            .or_else(|| angle_of_vector_deg(-segment))
            .unwrap_or(0.0);
        let normal = if !inside {
            raw.normal.normalize()
        } else if len > 0.0 {
            -segment / len
        } else {
            Vec2::zeros()
        };

        Self {
            surface: raw.surface,
            point: raw.point,
            normal,
            normal_angle,
            side,
            start,
            end,
            distance: raw.fraction.clamp(0.0, 1.0) * len,
            inside,
        }
    }

    /// The side the hit surface faces, derived from its normal.
    #[inline]
    pub fn normal_side(&self) -> LogicalSide {
        side_of(self.normal_angle)
    }

    /// Tangent angle of the surface (0 = flat floor).
    #[inline]
    pub fn surface_angle(&self) -> f32 {
        surface_angle_from_normal(self.normal_angle)
    }

    /// Fraction (0..1) of the segment consumed before the hit.
    #[inline]
    pub fn fraction(&self) -> f32 {
        let len = (self.end - self.start).norm();
        if len > 0.0 { self.distance / len } else { 0.0 }
    }
}
