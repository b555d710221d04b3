//! Input errors, detected before the optimizer starts.

use thiserror::Error;

use crate::geom::PolygonDefect;
use crate::model::LoadPointId;

/// Result alias for fallible setup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Precondition failures. A run that returns one of these did no work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid boundary ({which}): {defect}")]
    InvalidBoundary {
        which: BoundaryPart,
        defect: PolygonDefect,
    },

    #[error("hole {0} is not inside the outer boundary")]
    HoleOutsideBoundary(usize),

    #[error("no load points supplied")]
    EmptyLoadPoints,

    #[error("rebar catalog is empty")]
    EmptyCatalog,

    #[error("load point {id}: {reason}")]
    InvalidLoadPoint { id: LoadPointId, reason: String },

    #[error("load point id {0} appears more than once")]
    DuplicateLoadPoint(LoadPointId),

    #[error("rebar option {name:?}: {reason}")]
    InvalidRebarOption { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Which loop of a boundary failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPart {
    Outer,
    Hole(usize),
}

impl std::fmt::Display for BoundaryPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryPart::Outer => write!(f, "outer"),
            BoundaryPart::Hole(k) => write!(f, "hole {k}"),
        }
    }
}
