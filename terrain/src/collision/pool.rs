/*!
Fixed-capacity, round-robin storage for recent terrain hits.

Terrain casts run several times per body per step, so the caster keeps its
results in a preallocated ring instead of allocating per query.

Contract
- Every stored hit claims the next slot, wrapping around after `N` stores.
- A [`HitSlot`] stays readable until that slot is claimed again. Each claim
  bumps the slot generation, so a stale handle reads back `None` instead of a
  newer, unrelated hit.
- Callers already receive each hit by value; the pool exists for callers that
  want to refer back to "this step's hits" by handle.
*/

use super::{settings::TERRAIN_HIT_POOL_SIZE, types::TerrainHit};

/// Handle to a pooled hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HitSlot {
    index: usize,
    generation: u32,
}

impl HitSlot {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    hit: Option<TerrainHit>,
    generation: u32,
}

/// Ring of the `N` most recently stored hits.
#[derive(Clone, Debug)]
pub struct HitPool<const N: usize = TERRAIN_HIT_POOL_SIZE> {
    entries: [Entry; N],
    next: usize,
}

impl<const N: usize> Default for HitPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HitPool<N> {
    pub fn new() -> Self {
        assert!(N > 0, "HitPool capacity must be non-zero");
        Self {
            entries: [Entry {
                hit: None,
                generation: 0,
            }; N],
            next: 0,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Claim the next slot for `hit`, invalidating whatever handle pointed at it before.
    pub fn store(&mut self, hit: TerrainHit) -> HitSlot {
        let index = self.next;
        self.next = (self.next + 1) % N;

        let entry = &mut self.entries[index];
        entry.generation = entry.generation.wrapping_add(1);
        entry.hit = Some(hit);

        HitSlot {
            index,
            generation: entry.generation,
        }
    }

    /// Read a pooled hit back. `None` once its slot has been reclaimed.
    #[inline]
    pub fn get(&self, slot: HitSlot) -> Option<&TerrainHit> {
        let entry = self.entries.get(slot.index)?;
        if entry.generation != slot.generation {
            return None;
        }
        entry.hit.as_ref()
    }

    /// Drop every pooled hit. Outstanding handles become stale.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.generation = entry.generation.wrapping_add(1);
            entry.hit = None;
        }
        self.next = 0;
    }
}
