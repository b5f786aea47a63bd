use rapier2d::prelude::*;

use crate::{
    error::{Result, TerrainError},
    layers::{LayerMask, TerrainLayer},
};

use super::{
    classify::SurfaceTraits,
    types::{Point2, SurfaceId, Transform, Vec2},
};

/// Canonical definition of one piece of level terrain.
#[derive(Clone, Debug)]
pub struct SurfaceDef {
    /// Stable unique identifier; becomes the surface's [`SurfaceId`].
    pub id: u32,
    /// World-space pose.
    pub transform: Transform,
    /// Collider shape parameters.
    pub shape: SurfaceShapeDef,
    /// Layers the surface lives on; casts only see surfaces sharing a layer with their mask.
    pub layers: LayerMask,
    /// Optional classification capabilities.
    pub traits: SurfaceTraits,
}

impl SurfaceDef {
    /// Plain solid terrain on the `Solid` layer.
    pub fn new(id: u32, shape: SurfaceShapeDef, transform: Transform) -> Self {
        Self {
            id,
            transform,
            shape,
            layers: LayerMask::none().with(TerrainLayer::Solid),
            traits: SurfaceTraits::solid(),
        }
    }

    pub fn on_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_traits(mut self, traits: SurfaceTraits) -> Self {
        self.traits = traits;
        self
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        SurfaceId(self.id)
    }
}

/// Supported terrain shapes.
#[derive(Clone, Debug)]
pub enum SurfaceShapeDef {
    /// Infinite ground line (half-plane).
    ///
    /// The outward normal is derived from the pose as `rotation * +Y`; the boundary passes
    /// through the pose translation shifted by `offset_along_normal`.
    HalfPlane { offset_along_normal: f32 },

    /// Oriented box with given half-extents.
    Cuboid { half_extents: Vec2 },

    /// Circle.
    Ball { radius: f32 },

    /// Y-aligned capsule.
    CapsuleY { radius: f32, half_height: f32 },

    /// Box with rounded corners.
    RoundCuboid { half_extents: Vec2, border_radius: f32 },

    /// Single line segment in local space (thin ledges, one-way platforms).
    Segment { a: Point2, b: Point2 },

    /// Triangle in local space (ramps).
    Triangle { a: Point2, b: Point2, c: Point2 },

    /// Open or closed chain of segments in local space (curves, loops, quarter pipes).
    Polyline { vertices: Vec<Point2> },
}

impl SurfaceShapeDef {
    fn check(&self, id: SurfaceId) -> Result<()> {
        let degenerate = |reason| Err(TerrainError::DegenerateShape { id, reason });
        let finite = |p: &Point2| p.x.is_finite() && p.y.is_finite();

        match self {
            SurfaceShapeDef::HalfPlane {
                offset_along_normal,
            } if !offset_along_normal.is_finite() => degenerate("non-finite plane offset"),
            SurfaceShapeDef::Cuboid { half_extents }
            | SurfaceShapeDef::RoundCuboid { half_extents, .. }
                if !(half_extents.x > 0.0 && half_extents.y > 0.0) =>
            {
                degenerate("half extents must be positive")
            }
            SurfaceShapeDef::RoundCuboid { border_radius, .. } if !(*border_radius >= 0.0) => {
                degenerate("border radius must be non-negative")
            }
            SurfaceShapeDef::Ball { radius } | SurfaceShapeDef::CapsuleY { radius, .. }
                if !(*radius > 0.0) =>
            {
                degenerate("radius must be positive")
            }
            SurfaceShapeDef::CapsuleY { half_height, .. } if !(*half_height >= 0.0) => {
                degenerate("capsule half height must be non-negative")
            }
            SurfaceShapeDef::Segment { a, b } if !finite(a) || !finite(b) || a == b => {
                degenerate("segment endpoints must be finite and distinct")
            }
            SurfaceShapeDef::Triangle { a, b, c }
                if ![a, b, c].iter().all(|p| finite(*p))
                    || (b - a).perp(&(c - a)).abs() <= f32::EPSILON =>
            {
                degenerate("triangle must be finite and non-flat")
            }
            SurfaceShapeDef::Polyline { vertices }
                if vertices.len() < 2 || !vertices.iter().all(finite) =>
            {
                degenerate("polyline needs at least two finite vertices")
            }
            _ => Ok(()),
        }
    }
}

/// Validate a definition before it is inserted into a world.
pub fn validate_def(def: &SurfaceDef) -> Result<()> {
    let id = def.surface_id();
    if !def.transform.is_finite() {
        return Err(TerrainError::NonFiniteTransform(id));
    }
    def.shape.check(id)
}

/// Build a posed Rapier collider from a validated `SurfaceDef`.
///
/// The surface id is stored in the collider's `user_data` so query results map straight back
/// to the surface.
pub fn collider_from_def(def: &SurfaceDef) -> Collider {
    let mut collider = match &def.shape {
        SurfaceShapeDef::HalfPlane {
            offset_along_normal,
        } => {
            // World-space normal from pose rotation: n = R * +Y.
            // The boundary line satisfies n ⋅ x = n ⋅ t + offset.
            let iso = def.transform.iso();
            let n = iso.rotation * Vector::y();
            let dist = n.dot(&def.transform.translation) + *offset_along_normal;
            let unit_n = UnitVector::new_normalize(n);

            // The boundary sits at `unit_n * dist`; the pose rotation is already in `unit_n`.
            return ColliderBuilder::new(SharedShape::new(HalfSpace::new(unit_n)))
                .translation(unit_n.into_inner() * dist)
                .user_data(def.id as u128)
                .build();
        }

        SurfaceShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
        }

        SurfaceShapeDef::Ball { radius } => ColliderBuilder::ball(*radius),

        SurfaceShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        SurfaceShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(half_extents.x, half_extents.y, *border_radius),

        SurfaceShapeDef::Segment { a, b } => ColliderBuilder::segment(*a, *b),

        SurfaceShapeDef::Triangle { a, b, c } => ColliderBuilder::triangle(*a, *b, *c),

        SurfaceShapeDef::Polyline { vertices } => ColliderBuilder::polyline(vertices.clone(), None),
    }
    .user_data(def.id as u128)
    .build();

    collider.set_position(def.transform.iso());
    collider
}
