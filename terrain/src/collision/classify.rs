/*!
Surface classification: does a candidate hit count as solid ground?

Surfaces opt into non-default solidity through two optional capabilities:
- platform solidity: a per-hit verdict (one-way platforms, conditional ledges)
- area marker: "this is a zone, not ground" (water, hazards, triggers)

First matching rule wins:
1. platform solidity present -> its verdict
2. area marker present -> not solid
3. otherwise solid
*/

use std::{fmt, sync::Arc};

use crate::side::{LogicalSide, SideMask};

use super::types::TerrainHit;

/// Per-hit solidity override carried by a surface.
pub trait PlatformSolidity: fmt::Debug + Send + Sync {
    fn is_solid(&self, hit: &TerrainHit) -> bool;
}

/// Kind of non-solid zone a surface marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AreaKind {
    Water,
    Hazard,
    Trigger,
}

/// Optional capabilities attached to a surface.
///
/// A surface with no capabilities is plain terrain.
#[derive(Clone, Debug, Default)]
pub struct SurfaceTraits {
    pub solidity: Option<Arc<dyn PlatformSolidity>>,
    pub area: Option<AreaKind>,
}

impl SurfaceTraits {
    /// Plain terrain.
    pub fn solid() -> Self {
        Self::default()
    }

    pub fn area(kind: AreaKind) -> Self {
        Self {
            solidity: None,
            area: Some(kind),
        }
    }

    pub fn platform(solidity: impl PlatformSolidity + 'static) -> Self {
        Self {
            solidity: Some(Arc::new(solidity)),
            area: None,
        }
    }

    pub fn with_area(mut self, kind: AreaKind) -> Self {
        self.area = Some(kind);
        self
    }

    /// `None` when the surface carries no solidity override, otherwise the override's verdict.
    #[inline]
    pub fn solidity_verdict(&self, hit: &TerrainHit) -> Option<bool> {
        self.solidity.as_ref().map(|s| s.is_solid(hit))
    }

    #[inline]
    pub fn is_area(&self) -> bool {
        self.area.is_some()
    }
}

/// Decide whether `hit` against a surface with `traits` blocks motion.
#[inline]
pub fn is_solid(hit: &TerrainHit, traits: &SurfaceTraits) -> bool {
    if let Some(verdict) = traits.solidity_verdict(hit) {
        return verdict;
    }
    !traits.is_area()
}

/// Solid only from one face and only for some probing sides.
///
/// The default is the classic jump-through ledge: its top face is solid to a body's floor
/// probe, everything else passes through, including probes that start inside it.
#[derive(Clone, Copy, Debug)]
pub struct OneWayPlatform {
    /// World-facing side of the solid face (by normal).
    pub face: LogicalSide,
    /// Body sides whose probes may collide with the face.
    pub probe_sides: SideMask,
}

impl Default for OneWayPlatform {
    fn default() -> Self {
        Self {
            face: LogicalSide::Top,
            probe_sides: SideMask::of(&[LogicalSide::Bottom]),
        }
    }
}

impl PlatformSolidity for OneWayPlatform {
    fn is_solid(&self, hit: &TerrainHit) -> bool {
        !hit.inside && hit.normal_side() == self.face && self.probe_sides.contains(hit.side)
    }
}

/// Never solid, even when the surface also sits on a solid layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl PlatformSolidity for PassThrough {
    fn is_solid(&self, _hit: &TerrainHit) -> bool {
        false
    }
}
