pub mod body;
pub mod collision;
pub mod contact;
pub mod error;
pub mod layers;
pub mod movement;
pub mod side;
pub mod utils;

pub use body::{BodyState, MovingBody};
pub use collision::{
    SurfaceDef, SurfaceShapeDef, SurfaceTraits, TerrainCaster, TerrainHit, TerrainSource,
    TerrainWorld,
};
pub use contact::{
    ContactTracker, ConveyorBelt, ReactivePlatform, Spring, SurfaceContactState, TerrainFeatures,
};
pub use error::{Result, TerrainError};
pub use layers::{LayerMask, TerrainLayer};
pub use movement::{ControllerConfig, StepMovementResult, SurfaceFollower};
pub use side::{LogicalSide, SideMask, angle_of, side_of};
pub use utils::{angle_difference_deg, positive_angle_deg, unit_vector_deg};
