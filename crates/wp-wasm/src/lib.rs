//! WASM bridge for Waypoint: exposes the tour session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page script owns the
//! rendering and the event listeners; it forwards scroll/resize/mutation
//! events and animation-frame timestamps here and reads back JSON props for
//! the pointer, card and tour chrome.

mod dom;

use dom::{JsHooks, JsNavigator, WebDom};
use js_sys::Function;
use log::Level;
use wasm_bindgen::prelude::*;
use wp_core::{OverlayConfig, Size, StepRef, Tour};
use wp_engine::TourSession;

/// The main WASM-facing overlay controller.
///
/// Holds the tour session over the live page. All interaction from the
/// page script goes through this struct.
#[wasm_bindgen]
pub struct WaypointOverlay {
    session: TourSession<WebDom, JsNavigator>,
}

#[wasm_bindgen]
impl WaypointOverlay {
    /// Create a controller from a JSON tour list and a JSON config object
    /// (empty string for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(tours_json: &str, config_json: &str) -> Result<WaypointOverlay, JsValue> {
        console_error_panic_hook::set_once();

        let config = if config_json.trim().is_empty() {
            OverlayConfig::default()
        } else {
            OverlayConfig::from_json(config_json).map_err(js_error)?
        };
        init_logging(config.debug);

        let tours: Vec<Tour> = serde_json::from_str(tours_json).map_err(js_error)?;
        let dom = WebDom::new()?;
        let session = TourSession::new(dom, JsNavigator::new(None, None), tours, config);
        Ok(Self { session })
    }

    /// Route through the host router: `navigate(route)`, `prefetch(route)`.
    pub fn set_router(&mut self, navigate: Option<Function>, prefetch: Option<Function>) {
        *self.session.navigator_mut() = JsNavigator::new(navigate, prefetch);
    }

    /// `onStepComplete(tourId, index, step)`, `onTourComplete(tourId)`.
    pub fn set_hooks(&mut self, on_step_complete: Option<Function>, on_tour_complete: Option<Function>) {
        self.session.set_hooks(JsHooks {
            on_step_complete,
            on_tour_complete,
        });
    }

    /// Register a custom target lookup: `resolve(document) -> Element | null`.
    pub fn register_resolver(&mut self, name: &str, resolve: Function) {
        let label = name.to_string();
        self.session.register_resolver(name, move |dom: &WebDom| {
            match resolve.call1(&JsValue::NULL, dom.document()) {
                Ok(found) => found.dyn_into::<web_sys::Element>().ok(),
                Err(err) => {
                    log::error!("resolver `{label}` threw: {err:?}");
                    None
                }
            }
        });
    }

    /// Register a completion predicate: `check(element | null) -> boolean`.
    pub fn register_predicate(&mut self, name: &str, check: Function) {
        let label = name.to_string();
        self.session
            .register_predicate(name, move |_dom: &WebDom, element: Option<&web_sys::Element>| {
                let arg = element.map_or(JsValue::NULL, |el| el.clone().into());
                match check.call1(&JsValue::NULL, &arg) {
                    Ok(result) => result.is_truthy(),
                    Err(err) => {
                        log::error!("completion predicate `{label}` threw: {err:?}");
                        false
                    }
                }
            });
    }

    // ─── Progression ─────────────────────────────────────────────────────

    /// Start a tour. `step` is an index, an id, or `undefined`;
    /// `completed_json` is a JSON boolean array or empty. Host-side async
    /// initializers resolve before calling this.
    pub fn start(
        &mut self,
        tour_id: &str,
        visible: Option<bool>,
        step: JsValue,
        completed_json: &str,
    ) -> Result<bool, JsValue> {
        let initial = step_ref(&step)?;
        let completed = if completed_json.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Vec<bool>>(completed_json).map_err(js_error)?)
        };
        self.session
            .start_with_completed(tour_id, visible, initial, completed)
            .map_err(js_error)
    }

    /// Start the configured initial tour, if any.
    pub fn mount(&mut self) -> Result<bool, JsValue> {
        match self.session.config().initial_tour.clone() {
            Some(tour_id) if self.session.current_tour().is_none() => self
                .session
                .start_with_completed(&tour_id, None, None, None)
                .map_err(js_error),
            _ => Ok(false),
        }
    }

    pub fn close(&mut self) {
        self.session.close();
    }

    pub fn next(&mut self) -> bool {
        self.session.next()
    }

    pub fn previous(&mut self) -> bool {
        self.session.previous()
    }

    pub fn go_to_step(&mut self, step: JsValue) -> Result<bool, JsValue> {
        let Some(step) = step_ref(&step)? else {
            return Ok(false);
        };
        self.session.go_to_step(step).map_err(js_error)
    }

    pub fn set_current_step(&mut self, step: JsValue, delay_ms: Option<f64>) -> Result<(), JsValue> {
        let Some(step) = step_ref(&step)? else {
            return Ok(());
        };
        let delay = delay_ms.map(|ms| ms.max(0.0) as u64);
        self.session.set_current_step(step, delay).map_err(js_error)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.session.set_visible(visible);
    }

    pub fn mark_complete(&mut self, index: usize) -> bool {
        self.session.mark_complete(index)
    }

    // ─── Time and events ─────────────────────────────────────────────────

    /// Fire timers due by `now_ms` (e.g. `performance.now()`).
    pub fn advance(&mut self, now_ms: f64) {
        self.session.advance(now_ms.max(0.0) as u64);
    }

    /// When `advance` should be called next, if anything is pending.
    pub fn next_deadline(&self) -> Option<f64> {
        self.session.next_deadline().map(|t| t as f64)
    }

    pub fn on_scroll(&mut self) {
        self.session.on_scroll();
    }

    pub fn on_scroll_end(&mut self) {
        self.session.on_scroll_end();
    }

    pub fn on_resize(&mut self) {
        self.session.on_resize();
    }

    pub fn on_target_resize(&mut self) {
        self.session.on_target_resize();
    }

    pub fn on_layout_shift(&mut self) {
        self.session.on_layout_shift();
    }

    pub fn on_dom_mutation(&mut self) {
        self.session.on_dom_mutation();
    }

    pub fn on_route_changed(&mut self) {
        self.session.on_route_changed();
    }

    /// Measured card box; call `clear_card_size` when the card unmounts.
    pub fn set_card_size(&mut self, width: f64, height: f64) {
        self.session.set_card_size(Some(Size::new(width, height)));
    }

    pub fn clear_card_size(&mut self) {
        self.session.set_card_size(None);
    }

    pub fn set_arrow_size(&mut self, width: f64, height: f64) {
        self.session.set_arrow_size(Some(Size::new(width, height)));
    }

    // ─── Render slots ────────────────────────────────────────────────────

    /// Card props as JSON, or `null` when nothing should render.
    pub fn card_props_json(&self) -> String {
        to_json(&self.session.card_props())
    }

    /// Pointer props as JSON, or `null`.
    pub fn pointer_props_json(&self) -> String {
        to_json(&self.session.pointer_props())
    }

    /// Tour-chrome props as JSON, or `null`.
    pub fn tour_chrome_json(&self) -> String {
        to_json(&self.session.tour_chrome_props())
    }

    /// Session state as JSON.
    pub fn state_json(&self) -> String {
        let state = serde_json::json!({
            "currentTour": self.session.current_tour().map(|id| id.to_string()),
            "currentStep": self.session.current_step(),
            "completedSteps": self.session.completed_steps(),
            "isVisible": self.session.is_visible(),
            "isStepChanging": self.session.is_step_changing(),
            "isScrolling": self.session.is_scrolling(),
            "pendingRouteChange": self.session.pending_route_change(),
            "revision": self.session.frame().revision,
            "animate": self.session.frame().animate,
        });
        state.to_string()
    }

    /// Card animation parameters from the config, passed through untouched.
    pub fn card_transition_json(&self) -> String {
        self.session.config().card_transition.to_string()
    }
}

fn step_ref(value: &JsValue) -> Result<Option<StepRef>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    if let Some(index) = value.as_f64() {
        if index < 0.0 || index.fract() != 0.0 {
            return Err(JsValue::from_str(&format!("invalid step index {index}")));
        }
        return Ok(Some(StepRef::Index(index as usize)));
    }
    match value.as_string() {
        Some(id) => Ok(Some(StepRef::Id(id))),
        None => Err(JsValue::from_str("step must be an index or an id")),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("props serialization failed: {e}");
        "null".to_string()
    })
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Route `log` records to the browser console. `debug` raises the level so
/// session diagnostics show up.
fn init_logging(debug: bool) {
    let level = if debug { Level::Debug } else { Level::Warn };
    if console_log::init_with_level(level).is_err() {
        // Installed by an earlier controller; only the level changes.
        log::set_max_level(level.to_level_filter());
    }
}

// ─── Standalone validation (no page needed) ──────────────────────────────

/// Validate a JSON tour list. Returns `{"ok":true,"warnings":[...]}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_tours(tours_json: &str) -> String {
    match serde_json::from_str::<Vec<Tour>>(tours_json) {
        Ok(tours) => {
            let warnings: Vec<String> = tours.iter().flat_map(Tour::warnings).collect();
            serde_json::json!({ "ok": true, "warnings": warnings }).to_string()
        }
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}
