//! Error taxonomy.
//!
//! Only [`TourError::StepNotFound`] ever crosses the session's public
//! operations. The other variants are produced internally, logged, and
//! recovered from.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TourError {
    /// A step was requested by an id the current tour does not contain.
    #[error("step with id `{id}` not found")]
    StepNotFound { id: String },

    #[error("tour `{0}` not found")]
    TourNotFound(String),

    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Geometry the placement engine refuses to work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("non-finite {what} geometry")]
    NonFinite { what: &'static str },

    #[error("negative {what} size")]
    NegativeSize { what: &'static str },
}
