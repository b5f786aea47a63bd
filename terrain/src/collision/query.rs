use log::{trace, warn};

use crate::{layers::LayerMask, side::LogicalSide};

use super::{
    classify::{SurfaceTraits, is_solid},
    pool::{HitPool, HitSlot},
    settings::{DIST_EPS, MAX_TERRAIN_CAST_RESULTS},
    types::{Point2, RawHit, SurfaceId, TerrainHit},
};

/// Anything a terrain cast can run against.
///
/// [`TerrainWorld`](super::world::TerrainWorld) is the Rapier-backed implementation.
pub trait TerrainSource {
    /// Append every intersection of `start -> end` with surfaces whose layers intersect `mask`
    /// to `out`, in any order, stopping after `max_hits` entries.
    ///
    /// Returns `true` if more intersections existed than were collected.
    fn linecast(
        &self,
        start: Point2,
        end: Point2,
        mask: LayerMask,
        max_hits: usize,
        out: &mut Vec<RawHit>,
    ) -> bool;

    /// Classification capabilities of a surface. `None` for unknown ids, which classify as
    /// plain terrain.
    fn traits(&self, surface: SurfaceId) -> Option<&SurfaceTraits>;
}

/// One directional probe: a segment plus the body side that issued it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SideProbe {
    pub side: LogicalSide,
    pub start: Point2,
    pub end: Point2,
}

impl SideProbe {
    pub fn new(side: LogicalSide, start: Point2, end: Point2) -> Self {
        Self { side, start, end }
    }
}

/// Runs terrain casts for one body (or one simulation thread).
///
/// Owns a reusable candidate buffer and a ring of recent results, so casts do not allocate
/// once warmed up. Not meant to be shared across concurrent simulations; give each its own.
#[derive(Debug)]
pub struct TerrainCaster {
    candidates: Vec<RawHit>,
    max_candidates: usize,
    pool: HitPool,
    last: Option<HitSlot>,
    truncated: bool,
}

impl Default for TerrainCaster {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainCaster {
    pub fn new() -> Self {
        Self::with_max_candidates(MAX_TERRAIN_CAST_RESULTS)
    }

    pub fn with_max_candidates(max_candidates: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(max_candidates),
            max_candidates,
            pool: HitPool::new(),
            last: None,
            truncated: false,
        }
    }

    /// Cast `start -> end` and return the nearest surface that classifies as solid.
    ///
    /// Rejected candidates are transparent: the scan continues past them. The result is tagged
    /// with `side` and also stored in the caster's pool (see [`TerrainCaster::last_slot`]).
    /// No solid surface along the segment is `None`, not an error.
    pub fn query_terrain<S: TerrainSource + ?Sized>(
        &mut self,
        source: &S,
        mask: LayerMask,
        start: Point2,
        end: Point2,
        side: LogicalSide,
    ) -> Option<TerrainHit> {
        self.candidates.clear();
        self.truncated = false;
        if (end - start).norm_squared() <= DIST_EPS * DIST_EPS {
            return None;
        }

        self.truncated =
            source.linecast(start, end, mask, self.max_candidates, &mut self.candidates);
        if self.truncated {
            warn!(
                "terrain cast from {:?} to {:?} hit the {}-candidate cap; scanning the truncated set",
                start, end, self.max_candidates
            );
        }

        // Nearest first; equal distances fall back to surface id for determinism.
        self.candidates.sort_unstable_by(|a, b| {
            a.fraction
                .total_cmp(&b.fraction)
                .then(a.surface.cmp(&b.surface))
        });

        for raw in &self.candidates {
            let hit = TerrainHit::from_raw(*raw, side, start, end);
            let solid = source.traits(raw.surface).is_none_or(|t| is_solid(&hit, t));
            if !solid {
                trace!("skipping non-solid surface {:?} at {:.3}", hit.surface, hit.distance);
                continue;
            }

            self.last = Some(self.pool.store(hit));
            return Some(hit);
        }

        None
    }

    /// Run several probes and return the nearest accepted hit among them.
    ///
    /// Ties go to the earlier probe.
    pub fn query_nearest<S: TerrainSource + ?Sized>(
        &mut self,
        source: &S,
        mask: LayerMask,
        probes: &[SideProbe],
    ) -> Option<TerrainHit> {
        let mut best: Option<TerrainHit> = None;
        for probe in probes {
            if let Some(hit) = self.query_terrain(source, mask, probe.start, probe.end, probe.side)
            {
                if best.as_ref().is_none_or(|b| hit.distance < b.distance) {
                    best = Some(hit);
                }
            }
        }
        best
    }

    /// Run one query per probe and report the nearest accepted hit for each side, indexed
    /// Right, Top, Left, Bottom (the order of [`LogicalSide::ALL`]).
    ///
    /// Several probes for the same side keep the nearest hit.
    ///
    /// # Panics
    /// A probe tagged `LogicalSide::Any` is a caller bug: per-side results need a concrete side.
    pub fn query_sides<S: TerrainSource + ?Sized>(
        &mut self,
        source: &S,
        mask: LayerMask,
        probes: &[SideProbe],
    ) -> [Option<TerrainHit>; 4] {
        let mut hits: [Option<TerrainHit>; 4] = [None; 4];
        for probe in probes {
            let Some(i) = probe.side.index() else {
                panic!("query_sides needs a concrete side, got LogicalSide::Any");
            };
            if let Some(hit) = self.query_terrain(source, mask, probe.start, probe.end, probe.side)
            {
                if hits[i].as_ref().is_none_or(|b| hit.distance < b.distance) {
                    hits[i] = Some(hit);
                }
            }
        }
        hits
    }

    /// Whether the most recent cast hit the candidate cap.
    #[inline]
    pub fn last_truncated(&self) -> bool {
        self.truncated
    }

    /// Slot of the most recent accepted hit.
    #[inline]
    pub fn last_slot(&self) -> Option<HitSlot> {
        self.last
    }

    /// Recent accepted hits, valid per the pool's slot contract.
    #[inline]
    pub fn pool(&self) -> &HitPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::collision::{
        classify::{AreaKind, OneWayPlatform},
        shapes::{SurfaceDef, SurfaceShapeDef},
        types::{Transform, Vec2},
        world::TerrainWorld,
    };

    /// In-memory source returning a fixed candidate list.
    #[derive(Default)]
    struct Scripted {
        hits: Vec<RawHit>,
        traits: HashMap<SurfaceId, SurfaceTraits>,
    }

    impl Scripted {
        fn with(mut self, id: u32, fraction: f32, traits: SurfaceTraits) -> Self {
            self.hits.push(RawHit {
                surface: SurfaceId(id),
                point: Point2::new(0.0, -fraction),
                normal: Vec2::y(),
                fraction,
            });
            self.traits.insert(SurfaceId(id), traits);
            self
        }
    }

    impl TerrainSource for Scripted {
        fn linecast(
            &self,
            _start: Point2,
            _end: Point2,
            _mask: LayerMask,
            max_hits: usize,
            out: &mut Vec<RawHit>,
        ) -> bool {
            out.extend(self.hits.iter().take(max_hits).copied());
            self.hits.len() > max_hits
        }

        fn traits(&self, surface: SurfaceId) -> Option<&SurfaceTraits> {
            self.traits.get(&surface)
        }
    }

    fn down(caster: &mut TerrainCaster, source: &impl TerrainSource) -> Option<TerrainHit> {
        caster.query_terrain(
            source,
            LayerMask::all(),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, -1.0),
            LogicalSide::Bottom,
        )
    }

    #[test]
    fn no_candidates_is_no_hit() {
        let mut caster = TerrainCaster::new();
        assert!(down(&mut caster, &Scripted::default()).is_none());
        assert!(caster.last_slot().is_none());
    }

    #[test]
    fn nearer_rejected_candidate_is_skipped() {
        // Source order is deliberately far-to-near.
        let source = Scripted::default()
            .with(2, 0.8, SurfaceTraits::solid())
            .with(1, 0.3, SurfaceTraits::area(AreaKind::Water));
        let mut caster = TerrainCaster::new();

        let hit = down(&mut caster, &source).unwrap();
        assert_eq!(hit.surface, SurfaceId(2));
        assert_eq!(hit.side, LogicalSide::Bottom);
        assert!((hit.distance - 0.8).abs() < 1.0e-6);
    }

    #[test]
    fn nearest_accepted_candidate_wins() {
        let source = Scripted::default()
            .with(3, 0.9, SurfaceTraits::solid())
            .with(4, 0.2, SurfaceTraits::solid());
        let mut caster = TerrainCaster::new();
        assert_eq!(down(&mut caster, &source).unwrap().surface, SurfaceId(4));
    }

    #[test]
    fn all_rejected_is_no_hit() {
        let source = Scripted::default()
            .with(1, 0.1, SurfaceTraits::area(AreaKind::Hazard))
            .with(2, 0.5, SurfaceTraits::area(AreaKind::Trigger));
        let mut caster = TerrainCaster::new();
        assert!(down(&mut caster, &source).is_none());
    }

    #[test]
    fn truncated_cast_still_scans_what_it_got() {
        let source = Scripted::default()
            .with(1, 0.5, SurfaceTraits::solid())
            .with(2, 0.1, SurfaceTraits::solid())
            .with(3, 0.05, SurfaceTraits::solid());
        let mut caster = TerrainCaster::with_max_candidates(2);
        // Surface 3 was cut off by the cap, so the nearest kept candidate wins.
        assert_eq!(down(&mut caster, &source).unwrap().surface, SurfaceId(2));
        assert!(caster.last_truncated());

        let mut roomy = TerrainCaster::with_max_candidates(3);
        assert_eq!(down(&mut roomy, &source).unwrap().surface, SurfaceId(3));
        assert!(!roomy.last_truncated());
    }

    #[test]
    fn truncation_flag_resets_on_the_next_cast() {
        let crowded = Scripted::default()
            .with(1, 0.5, SurfaceTraits::solid())
            .with(2, 0.1, SurfaceTraits::solid());
        let sparse = Scripted::default().with(1, 0.5, SurfaceTraits::solid());
        let mut caster = TerrainCaster::with_max_candidates(1);

        down(&mut caster, &crowded);
        assert!(caster.last_truncated());
        down(&mut caster, &sparse);
        assert!(!caster.last_truncated());
    }

    #[test]
    fn accepted_hits_land_in_the_pool() {
        let source = Scripted::default().with(5, 0.5, SurfaceTraits::solid());
        let mut caster = TerrainCaster::new();
        let hit = down(&mut caster, &source).unwrap();
        let slot = caster.last_slot().unwrap();
        assert_eq!(caster.pool().get(slot), Some(&hit));
    }

    #[test]
    fn water_over_floor_in_a_rapier_world() {
        let water = SurfaceDef::new(
            1,
            SurfaceShapeDef::Cuboid {
                half_extents: Vec2::new(5.0, 1.0),
            },
            Transform::from_translation(Vec2::new(0.0, -1.0)),
        )
        .with_traits(SurfaceTraits::area(AreaKind::Water));
        let floor = SurfaceDef::new(
            2,
            SurfaceShapeDef::HalfPlane {
                offset_along_normal: 0.0,
            },
            Transform::from_translation(Vec2::new(0.0, -3.0)),
        );
        let world = TerrainWorld::build(vec![water, floor]).unwrap();
        let mut caster = TerrainCaster::new();

        let hit = caster
            .query_terrain(
                &world,
                LayerMask::all(),
                Point2::new(0.0, 1.0),
                Point2::new(0.0, -5.0),
                LogicalSide::Bottom,
            )
            .unwrap();

        assert_eq!(hit.surface, SurfaceId(2));
        assert!((hit.point.y + 3.0).abs() < 1.0e-4);
        assert!((hit.normal_angle - 90.0).abs() < 1.0e-3);
        assert!((hit.distance - 4.0).abs() < 1.0e-4);
    }

    #[test]
    fn one_way_ledge_catches_floor_probe_but_not_head_probe() {
        let ledge = SurfaceDef::new(
            1,
            SurfaceShapeDef::Cuboid {
                half_extents: Vec2::new(2.0, 0.25),
            },
            Transform::from_translation(Vec2::zeros()),
        )
        .with_traits(SurfaceTraits::platform(OneWayPlatform::default()));
        let world = TerrainWorld::build(vec![ledge]).unwrap();
        let mut caster = TerrainCaster::new();

        let landing = caster.query_terrain(
            &world,
            LayerMask::all(),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, -1.0),
            LogicalSide::Bottom,
        );
        assert_eq!(landing.map(|h| h.surface), Some(SurfaceId(1)));

        let head_bump = caster.query_terrain(
            &world,
            LayerMask::all(),
            Point2::new(0.0, -1.0),
            Point2::new(0.0, 1.0),
            LogicalSide::Top,
        );
        assert!(head_bump.is_none());
    }

    #[test]
    fn query_sides_reports_each_side_separately() {
        let floor = SurfaceDef::new(
            1,
            SurfaceShapeDef::HalfPlane {
                offset_along_normal: 0.0,
            },
            Transform::from_translation(Vec2::zeros()),
        );
        let wall = SurfaceDef::new(
            2,
            SurfaceShapeDef::Cuboid {
                half_extents: Vec2::new(0.5, 5.0),
            },
            Transform::from_translation(Vec2::new(2.5, 5.0)),
        );
        let world = TerrainWorld::build(vec![floor, wall]).unwrap();
        let mut caster = TerrainCaster::new();
        let center = Point2::new(0.0, 1.0);

        let hits = caster.query_sides(
            &world,
            LayerMask::all(),
            &[
                SideProbe::new(LogicalSide::Bottom, center, Point2::new(0.0, -1.0)),
                SideProbe::new(LogicalSide::Right, center, Point2::new(4.0, 1.0)),
                SideProbe::new(LogicalSide::Top, center, Point2::new(0.0, 4.0)),
                // A second, farther floor probe does not replace the first.
                SideProbe::new(LogicalSide::Bottom, Point2::new(0.5, 1.5), Point2::new(0.5, -1.0)),
            ],
        );

        let [right, top, left, bottom] = hits;
        assert_eq!(right.map(|h| h.surface), Some(SurfaceId(2)));
        assert_eq!(right.map(|h| h.side), Some(LogicalSide::Right));
        assert!((right.unwrap().distance - 2.0).abs() < 1.0e-4);
        assert!(top.is_none());
        assert!(left.is_none());
        assert_eq!(bottom.map(|h| h.surface), Some(SurfaceId(1)));
        assert!((bottom.unwrap().distance - 1.0).abs() < 1.0e-4);
    }

    #[test]
    #[should_panic]
    fn query_sides_rejects_the_wildcard_side() {
        let source = Scripted::default().with(1, 0.5, SurfaceTraits::solid());
        let mut caster = TerrainCaster::new();
        caster.query_sides(
            &source,
            LayerMask::all(),
            &[SideProbe::new(
                LogicalSide::Any,
                Point2::origin(),
                Point2::new(0.0, -1.0),
            )],
        );
    }

    #[test]
    fn query_nearest_picks_the_closest_probe() {
        let floor = SurfaceDef::new(
            1,
            SurfaceShapeDef::Triangle {
                a: Point2::new(-4.0, 0.0),
                b: Point2::new(4.0, 0.0),
                c: Point2::new(4.0, 2.0),
            },
            Transform::from_translation(Vec2::zeros()),
        );
        let world = TerrainWorld::build(vec![floor]).unwrap();
        let mut caster = TerrainCaster::new();

        // Right foot is above the higher part of the ramp.
        let probes = [
            SideProbe::new(LogicalSide::Bottom, Point2::new(-1.0, 3.0), Point2::new(-1.0, -1.0)),
            SideProbe::new(LogicalSide::Bottom, Point2::new(1.0, 3.0), Point2::new(1.0, -1.0)),
        ];
        let hit = caster
            .query_nearest(&world, LayerMask::all(), &probes)
            .unwrap();
        assert!((hit.start.x - 1.0).abs() < 1.0e-6);
        assert!(hit.point.y > 1.0);
    }
}
