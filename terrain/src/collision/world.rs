//! Rapier-based query world for level terrain.
//!
//! Builds an in-memory Rapier scene from a set of surface definitions and answers the raw
//! segment casts the terrain caster needs.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-only: no dynamics are ever stepped; terrain does not move after construction.
//! - Non-owning results: hits reference surfaces by [`SurfaceId`], resolved back through
//!   [`TerrainWorld::surface`].

use std::collections::HashMap;

use log::debug;
use rapier2d::prelude::*;

use crate::{
    error::{Result, TerrainError},
    layers::LayerMask,
};

use super::{
    classify::SurfaceTraits,
    query::TerrainSource,
    settings::DIST_EPS,
    shapes::{SurfaceDef, collider_from_def, validate_def},
    types::{Point2, RawHit, SurfaceId},
};

/// Per-surface data kept alongside its collider.
#[derive(Clone, Debug)]
pub struct SurfaceEntry {
    pub handle: ColliderHandle,
    pub layers: LayerMask,
    pub traits: SurfaceTraits,
}

/// In-memory Rapier structures needed for segment casts against static terrain.
pub struct TerrainWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    surfaces: HashMap<SurfaceId, SurfaceEntry>,
}

impl TerrainWorld {
    /// Build a terrain world from surface definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - Every definition is validated; the first invalid one aborts the build.
    pub fn build(mut defs: Vec<SurfaceDef>) -> Result<Self> {
        defs.sort_by_key(|d| d.id);

        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut modified_colliders = Vec::with_capacity(defs.len());
        let mut surfaces = HashMap::with_capacity(defs.len());

        for def in defs {
            validate_def(&def)?;
            let id = def.surface_id();
            if surfaces.contains_key(&id) {
                return Err(TerrainError::DuplicateSurface(id));
            }

            let handle = colliders.insert(collider_from_def(&def));
            modified_colliders.push(handle);
            surfaces.insert(
                id,
                SurfaceEntry {
                    handle,
                    layers: def.layers,
                    traits: def.traits,
                },
            );
        }

        // Only the broad-phase BVH is needed for scene queries.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters::default(),
            &colliders,
            &bodies,
            &modified_colliders,
            &[],
            &mut events,
        );

        debug!("built terrain world with {} surfaces", surfaces.len());

        Ok(Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::default(),
            surfaces,
        })
    }

    /// Create a borrowed `QueryPipeline` view for scene queries.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    #[inline]
    pub fn surface(&self, id: SurfaceId) -> Option<&SurfaceEntry> {
        self.surfaces.get(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    #[inline]
    fn surface_id_of(collider: &Collider) -> SurfaceId {
        SurfaceId(collider.user_data as u32)
    }

    fn layers_of(&self, collider: &Collider) -> LayerMask {
        self.surfaces
            .get(&Self::surface_id_of(collider))
            .map_or(LayerMask::none(), |s| s.layers)
    }
}

impl TerrainSource for TerrainWorld {
    fn linecast(
        &self,
        start: Point2,
        end: Point2,
        mask: LayerMask,
        max_hits: usize,
        out: &mut Vec<RawHit>,
    ) -> bool {
        let segment = end - start;
        if segment.norm_squared() <= DIST_EPS * DIST_EPS {
            return false;
        }

        let predicate = |_handle: ColliderHandle, collider: &Collider| {
            self.layers_of(collider).intersects(mask)
        };
        let filter = QueryFilter::default().predicate(&predicate);
        let pipeline = self.query_pipeline(filter);

        // Unnormalized direction: time of impact is the fraction of the segment.
        let ray = Ray::new(start, segment);
        for (_handle, collider, hit) in pipeline.intersect_ray(ray, 1.0, true) {
            if out.len() >= max_hits {
                return true;
            }

            // Ensure the normal faces the caster. A zero normal means the ray started inside.
            let mut normal = hit.normal;
            if normal.dot(&segment) > 0.0 {
                normal = -normal;
            }

            out.push(RawHit {
                surface: Self::surface_id_of(collider),
                point: ray.point_at(hit.time_of_impact),
                normal,
                fraction: hit.time_of_impact,
            });
        }

        false
    }

    fn traits(&self, surface: SurfaceId) -> Option<&SurfaceTraits> {
        self.surfaces.get(&surface).map(|s| &s.traits)
    }
}
