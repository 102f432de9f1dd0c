pub mod breakpoint;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod placement;
pub mod side;

pub use breakpoint::Breakpoints;
pub use config::{OverlayConfig, TimingConfig};
pub use error::{PlacementError, TourError};
pub use id::Ident;
pub use model::*;
pub use placement::{
    ArrowPlacement, PlacementInput, PlacementOptions, PlacementResult, SizeConstraints, Strategy,
    compute_placement,
};
pub use side::{Alignment, Axis, CustomSide, Placement, Side, SidePreference, resolve_side};

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Size, Vec2};
