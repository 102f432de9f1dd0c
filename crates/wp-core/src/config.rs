//! Overlay configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Cosmetic fields (shadow, card transition) are carried through untouched
//! for the host renderer.

use crate::breakpoint::Breakpoints;
use crate::placement::PlacementOptions;
use crate::side::CustomSide;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// `"r, g, b"` of the dimmed backdrop.
    pub shadow_rgb: String,
    pub shadow_opacity: String,
    /// Card animation parameters, opaque to the engine.
    pub card_transition: serde_json::Value,

    /// How long to wait for a target after a route change.
    pub observer_timeout_ms: u64,
    /// Custom breakpoints, merged over the built-in table.
    pub breakpoints: BTreeMap<String, f64>,
    /// Named sides in addition to the built-in ones.
    pub extend_sides: HashMap<String, CustomSide>,
    /// Emit diagnostic logging. Never changes behavior.
    pub debug: bool,

    /// Visibility used when `start` is called without one.
    pub default_visible: bool,
    /// Tour started when the session is mounted.
    pub initial_tour: Option<String>,

    pub timing: TimingConfig,
    pub placement: PlacementOptions,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            shadow_rgb: "0, 0, 0".to_string(),
            shadow_opacity: "0.2".to_string(),
            card_transition: serde_json::json!({
                "type": "spring",
                "damping": 26,
                "stiffness": 170,
            }),
            observer_timeout_ms: 5000,
            breakpoints: BTreeMap::new(),
            extend_sides: HashMap::new(),
            debug: false,
            default_visible: true,
            initial_tour: None,
            timing: TimingConfig::default(),
            placement: PlacementOptions::default(),
        }
    }
}

impl OverlayConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Built-in breakpoints merged with the configured ones.
    pub fn merged_breakpoints(&self) -> Breakpoints {
        Breakpoints::merged(&self.breakpoints)
    }
}

/// Delays of the step-transition and scroll-settle protocols, in ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimingConfig {
    /// Between click simulation and applying the new step index.
    pub step_apply_delay_ms: u64,
    /// Between starting a transition and clearing `is_step_changing`.
    pub step_settle_delay_ms: u64,
    /// Hard ceiling on waiting for a scroll to finish.
    pub scroll_settle_timeout_ms: u64,
    /// Quiet window after the last scroll event.
    pub scroll_idle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_apply_delay_ms: 100,
            step_settle_delay_ms: 500,
            scroll_settle_timeout_ms: 400,
            scroll_idle_ms: 100,
        }
    }
}
