use thiserror::Error;

use crate::collision::types::SurfaceId;

/// Errors raised while building a terrain world from surface definitions.
///
/// Queries themselves never fail: "nothing solid there" is an empty result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TerrainError {
    #[error("surface id {0:?} is defined more than once")]
    DuplicateSurface(SurfaceId),

    #[error("surface {0:?} has a non-finite transform")]
    NonFiniteTransform(SurfaceId),

    #[error("surface {id:?} has a degenerate shape: {reason}")]
    DegenerateShape { id: SurfaceId, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, TerrainError>;
