/*!
Surface contact protocol.

Terrain features (conveyor belts, springs, ...) react to bodies resting on or
against them through three lifecycle calls:

- `on_contact_begin`: the first step a surface is touched
- `on_contact_stay`: every later step the contact persists, after the body's
  position for that step is final
- `on_contact_end`: exactly once when the contact is lost, with the last known state

Per (body, surface) pair:
`NoContact -> begin -> Contacting -> stay* -> end -> NoContact`, repeating
for as long as the game runs.

The [`ContactTracker`] only sequences these calls and hands over the current
[`SurfaceContactState`]; features apply their own side effects to the body.
*/

pub mod conveyor;
pub mod spring;

use std::collections::{BTreeMap, HashMap};

use log::{debug, trace};

use crate::{
    body::MovingBody,
    collision::types::{SurfaceId, TerrainHit},
    side::LogicalSide,
    utils::decompose_velocity,
};

pub use conveyor::ConveyorBelt;
pub use spring::Spring;

/// Snapshot of one body's contact with one surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceContactState {
    pub surface: SurfaceId,
    /// False only in the snapshot delivered to `on_contact_end`.
    pub active: bool,
    /// Tangent angle of the surface at the contact, in degrees (0 = flat floor).
    pub surface_angle: f32,
    /// Body velocity along the surface tangent.
    pub along: f32,
    /// Body velocity along the surface normal (positive = away from the surface).
    pub perpendicular: f32,
    /// Body side that touched the surface.
    pub side: LogicalSide,
    /// Steps the contact has persisted after the first.
    pub stay_steps: u32,
}

impl SurfaceContactState {
    fn from_hit(hit: &TerrainHit, body: &dyn MovingBody) -> Self {
        let surface_angle = hit.surface_angle();
        let (along, perpendicular) = decompose_velocity(body.velocity(), surface_angle);
        Self {
            surface: hit.surface,
            active: true,
            surface_angle,
            along,
            perpendicular,
            side: hit.side,
            stay_steps: 0,
        }
    }

    fn refresh(&mut self, hit: &TerrainHit, body: &dyn MovingBody) {
        let fresh = Self::from_hit(hit, body);
        *self = Self {
            stay_steps: self.stay_steps + 1,
            ..fresh
        };
    }
}

/// A terrain feature that reacts to surface contact.
///
/// Every hook defaults to doing nothing.
pub trait ReactivePlatform {
    fn on_contact_begin(&mut self, _body: &mut dyn MovingBody, _state: &SurfaceContactState) {}

    fn on_contact_stay(
        &mut self,
        _body: &mut dyn MovingBody,
        _state: &SurfaceContactState,
        _dt: f32,
    ) {
    }

    fn on_contact_end(&mut self, _body: &mut dyn MovingBody, _state: &SurfaceContactState) {}
}

/// Terrain features keyed by the surface they are attached to.
///
/// Surfaces without a feature still produce contacts; nothing reacts to them.
#[derive(Default)]
pub struct TerrainFeatures {
    features: HashMap<SurfaceId, Box<dyn ReactivePlatform>>,
}

impl TerrainFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `feature` to `surface`, returning the feature it replaced.
    pub fn register(
        &mut self,
        surface: SurfaceId,
        feature: impl ReactivePlatform + 'static,
    ) -> Option<Box<dyn ReactivePlatform>> {
        self.features.insert(surface, Box::new(feature))
    }

    pub fn remove(&mut self, surface: SurfaceId) -> Option<Box<dyn ReactivePlatform>> {
        self.features.remove(&surface)
    }

    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.features.contains_key(&surface)
    }

    fn get_mut(&mut self, surface: SurfaceId) -> Option<&mut (dyn ReactivePlatform + 'static)> {
        self.features.get_mut(&surface).map(|f| f.as_mut())
    }
}

/// Per-body begin/stay/end sequencing.
///
/// Call [`ContactTracker::update`] once per simulation step with every accepted terrain hit
/// the body touched that step.
#[derive(Debug, Default)]
pub struct ContactTracker {
    // Ordered so dispatch order does not depend on hashing.
    open: BTreeMap<SurfaceId, SurfaceContactState>,
    // Scratch buffers reused every step.
    touched: Vec<TerrainHit>,
    lost: Vec<SurfaceId>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one step.
    ///
    /// - surfaces touched now but not last step get `begin`
    /// - surfaces touched in both get `stay`
    /// - surfaces touched last step but not now get `end`
    ///
    /// A surface hit by several probes in one step counts once, using the nearest hit.
    pub fn update(
        &mut self,
        contacts: &[TerrainHit],
        body: &mut dyn MovingBody,
        features: &mut TerrainFeatures,
        dt: f32,
    ) {
        self.touched.clear();
        for hit in contacts {
            match self.touched.iter_mut().find(|t| t.surface == hit.surface) {
                Some(existing) if hit.distance < existing.distance => *existing = *hit,
                Some(_) => {}
                None => self.touched.push(*hit),
            }
        }
        self.touched.sort_unstable_by_key(|h| h.surface);

        self.lost.clear();
        for id in self.open.keys() {
            if !self.touched.iter().any(|h| h.surface == *id) {
                self.lost.push(*id);
            }
        }
        for id in self.lost.drain(..) {
            if let Some(state) = self.open.remove(&id) {
                Self::end(state, body, features);
            }
        }

        for hit in &self.touched {
            match self.open.get_mut(&hit.surface) {
                Some(state) => {
                    state.refresh(hit, body);
                    let state = *state;
                    trace!("contact stay {:?} ({} steps)", state.surface, state.stay_steps);
                    if let Some(feature) = features.get_mut(state.surface) {
                        feature.on_contact_stay(body, &state, dt);
                    }
                }
                None => {
                    let state = SurfaceContactState::from_hit(hit, body);
                    debug!("contact begin {:?} on {:?} side", state.surface, state.side);
                    self.open.insert(state.surface, state);
                    if let Some(feature) = features.get_mut(state.surface) {
                        feature.on_contact_begin(body, &state);
                    }
                }
            }
        }
    }

    /// End every open contact (body removed, teleported, or respawned).
    pub fn clear(&mut self, body: &mut dyn MovingBody, features: &mut TerrainFeatures) {
        for (_, state) in std::mem::take(&mut self.open) {
            Self::end(state, body, features);
        }
    }

    #[inline]
    pub fn is_touching(&self, surface: SurfaceId) -> bool {
        self.open.contains_key(&surface)
    }

    /// Current state of an open contact.
    #[inline]
    pub fn state(&self, surface: SurfaceId) -> Option<&SurfaceContactState> {
        self.open.get(&surface)
    }

    pub fn open_contacts(&self) -> impl Iterator<Item = &SurfaceContactState> {
        self.open.values()
    }

    fn end(
        mut state: SurfaceContactState,
        body: &mut dyn MovingBody,
        features: &mut TerrainFeatures,
    ) {
        state.active = false;
        debug!("contact end {:?} after {} steps", state.surface, state.stay_steps);
        if let Some(feature) = features.get_mut(state.surface) {
            feature.on_contact_end(body, &state);
        }
    }
}
