/*!
Collision root module.

Terrain queries for a 2D side-on character: segment casts against static
surfaces, filtered by per-surface classification. The code is split for clarity:

- types:    shared data types (SurfaceId, Transform, RawHit, TerrainHit)
- settings: tolerances, caps, and controller defaults
- shapes:   surface definitions and their Rapier colliders
- world:    Rapier-backed query world
- classify: solid/non-solid decisions (one-way platforms, areas)
- query:    nearest-solid-hit casts for a body side
- pool:     small ring of recent results
*/

pub mod classify;
pub mod pool;
pub mod query;
pub mod settings;
pub mod shapes;
pub mod types;
pub mod world;

// Re-export commonly used types and functions.
pub use classify::{
    AreaKind, OneWayPlatform, PassThrough, PlatformSolidity, SurfaceTraits, is_solid,
};
pub use pool::{HitPool, HitSlot};
pub use query::{SideProbe, TerrainCaster, TerrainSource};
pub use shapes::{SurfaceDef, SurfaceShapeDef};
pub use types::{Iso, Point2, RawHit, SurfaceId, TerrainHit, Transform, Vec2};
pub use world::{SurfaceEntry, TerrainWorld};
