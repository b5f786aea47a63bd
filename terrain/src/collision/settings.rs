/*!
Terrain query and surface-following tolerances.

These constants centralize the parameters used by the terrain caster, the
surface classifier and the surface-following controller. Keeping them
together makes tuning easier and keeps queries deterministic across platforms.

Notes
- Distances are in world units, time in seconds, angles in degrees.
- Per-character values live in `ControllerConfig`; these are the defaults it
  starts from.
*/

/// Upper bound on raw intersections collected by a single terrain cast.
/// Reaching it means the scene stacks an unreasonable number of colliders on one segment;
/// the cast logs a warning and proceeds on the truncated set.
pub const MAX_TERRAIN_CAST_RESULTS: usize = 256;

/// Number of recent results kept by a caster's result pool.
/// Four sides plus auxiliary ceiling/wall probes fit comfortably.
pub const TERRAIN_HIT_POOL_SIZE: usize = 16;

/// Practical small distance for comparisons (world units).
/// Use for zero-length segment checks, dot-product guards, etc.
pub const DIST_EPS: f32 = 1.0e-6;

/// Separation kept from a surface after snapping onto it.
pub const DEFAULT_SKIN: f32 = 0.01;

/// Extra reach of the floor probe beyond the body's half height while grounded.
/// Lets the body stay glued to convex curves at speed.
pub const GROUND_STICK_DISTANCE: f32 = 0.25;

/// Surfaces steeper than this (degrees from the body's current "up") are not attached to.
pub const MAX_ATTACH_ANGLE_DEG: f32 = 46.0;

/// Below this ground speed a body on a wall or ceiling falls off.
pub const DETACH_SPEED: f32 = 2.5;

/// Gravity magnitude (units per second squared, positive value).
pub const GRAVITY: f32 = 9.81;

/// Upper clamp on falling speed.
pub const TERMINAL_FALL_SPEED: f32 = 16.0;
