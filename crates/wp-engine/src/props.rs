//! Data handed to the host's render slots.
//!
//! The engine renders nothing. Each frame the host reads these snapshots and
//! draws the pointer, card, arrow and optional tour chrome however it likes;
//! the card's controls call back into `TourSession` (`next`, `previous`,
//! `go_to_step`, `close`, `set_visible`).

use serde::Serialize;
use wp_core::{ArrowPlacement, Ident, PlacementResult, Rect, Step, Strategy, Tour};

/// Latest resolved geometry for the current step.
#[derive(Debug, Clone, Default)]
pub struct OverlayFrame {
    /// Target box in document coordinates; a zero-size box at the viewport
    /// center when the step has no resolved target.
    pub pointer: Option<Rect>,
    /// Last successful card placement.
    pub placement: Option<PlacementResult>,
    /// Whether the last update should animate (forced recomputes) or apply
    /// instantly (live updates).
    pub animate: bool,
    /// Bumped on every update.
    pub revision: u64,
}

/// Card position in a serializable shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPosition {
    pub x: f64,
    pub y: f64,
    pub strategy: Strategy,
    pub side: String,
    pub flipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<ArrowPlacement>,
}

impl From<&PlacementResult> for CardPosition {
    fn from(p: &PlacementResult) -> Self {
        Self {
            x: p.x,
            y: p.y,
            strategy: p.strategy,
            side: p.effective_side(),
            flipped: p.flipped,
            max_width: p.constraints.max_width,
            max_height: p.constraints.max_height,
            arrow: p.arrow,
        }
    }
}

/// Spotlight geometry, already padded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerProps {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    /// Hidden while scrolling.
    pub visible: bool,
    pub animate: bool,
    pub shadow_rgb: String,
    pub shadow_opacity: String,
}

/// Card render slot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProps<'a> {
    pub step: &'a Step,
    pub tour: &'a Tour,
    pub current_step: usize,
    pub total_steps: usize,
    pub completed_steps: Vec<usize>,
    pub pending_route_change: bool,
    pub is_step_changing: bool,
    pub is_scrolling: bool,
    /// The arrow only makes sense when there is a target to point at.
    pub show_arrow: bool,
    pub position: Option<CardPosition>,
}

/// Optional tour-chrome render slot (progress, step list, ...).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourChromeProps<'a> {
    pub tour: &'a Tour,
    pub current_tour: Ident,
    pub current_step: usize,
    pub completed_steps: Vec<usize>,
    pub is_scrolling: bool,
}
