//! Browser adapters: `Dom` over `web_sys`, `Navigator` and `TourHooks` over
//! JavaScript callbacks.

use js_sys::Function;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};
use wp_core::{Rect, Size, Step, Tour, Vec2};
use wp_engine::{Dom, Navigator, TourHooks};

/// The live page.
pub struct WebDom {
    window: Window,
    document: Document,
    scroll_end: bool,
}

impl WebDom {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let scroll_end = js_sys::Reflect::has(&window, &JsValue::from_str("onscrollend"))
            .unwrap_or(false);
        Ok(Self {
            window,
            document,
            scroll_end,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for WebDom {
    type Element = Element;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(_) => {
                log::warn!("invalid selector `{selector}`");
                None
            }
        }
    }

    fn bounding_rect(&self, element: &Element) -> Rect {
        let r = element.get_bounding_client_rect();
        Rect::new(r.x(), r.y(), r.x() + r.width(), r.y() + r.height())
    }

    fn viewport(&self) -> Size {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(
            dim(self.window.inner_width()),
            dim(self.window.inner_height()),
        )
    }

    fn scroll_offset(&self) -> Vec2 {
        Vec2::new(
            self.window.scroll_x().unwrap_or(0.0),
            self.window.scroll_y().unwrap_or(0.0),
        )
    }

    fn scroll_into_view(&mut self, element: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
    options.set_inline(ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn supports_scroll_end(&self) -> bool {
        self.scroll_end
    }

    fn set_pointer_events(&mut self, element: &Element, enabled: bool) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        let result = if enabled {
            style.set_property("pointer-events", "auto")
        } else {
            style.remove_property("pointer-events").map(|_| ())
        };
        if result.is_err() {
            log::warn!("could not update pointer-events on {element:?}");
        }
    }

    fn click(&mut self, element: &Element) {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.click(),
            None => log::warn!("click target {element:?} is not an HTML element"),
        }
    }
}

/// Routing through host callbacks. Without a `navigate` callback the
/// location is assigned directly.
pub struct JsNavigator {
    window: Option<Window>,
    navigate: Option<Function>,
    prefetch: Option<Function>,
}

impl JsNavigator {
    pub fn new(navigate: Option<Function>, prefetch: Option<Function>) -> Self {
        Self {
            window: web_sys::window(),
            navigate,
            prefetch,
        }
    }
}

impl Navigator for JsNavigator {
    fn current_route(&self) -> Option<String> {
        self.window.as_ref()?.location().pathname().ok()
    }

    fn navigate_to(&mut self, route: &str) {
        let result = match (&self.navigate, &self.window) {
            (Some(navigate), _) => navigate.call1(&JsValue::NULL, &route.into()).map(|_| ()),
            (None, Some(window)) => window.location().assign(route),
            (None, None) => Ok(()),
        };
        if let Err(err) = result {
            log::error!("navigation to `{route}` failed: {err:?}");
        }
    }

    fn prefetch(&mut self, route: &str) {
        if let Some(prefetch) = &self.prefetch
            && let Err(err) = prefetch.call1(&JsValue::NULL, &route.into())
        {
            log::warn!("prefetch of `{route}` failed: {err:?}");
        }
    }
}

/// Completion hooks through host callbacks:
/// `onStepComplete(tourId, index, step)` and `onTourComplete(tourId)`.
#[derive(Default)]
pub struct JsHooks {
    pub on_step_complete: Option<Function>,
    pub on_tour_complete: Option<Function>,
}

impl TourHooks for JsHooks {
    fn step_completed(&mut self, tour: &Tour, index: usize, step: &Step) {
        let Some(callback) = &self.on_step_complete else {
            return;
        };
        let step = serde_json::to_string(step)
            .ok()
            .and_then(|json| js_sys::JSON::parse(&json).ok())
            .unwrap_or(JsValue::NULL);
        let result = callback.call3(
            &JsValue::NULL,
            &tour.id.as_str().into(),
            &JsValue::from_f64(index as f64),
            &step,
        );
        if let Err(err) = result {
            log::error!("onStepComplete threw: {err:?}");
        }
    }

    fn tour_completed(&mut self, tour: &Tour) {
        if let Some(callback) = &self.on_tour_complete
            && let Err(err) = callback.call1(&JsValue::NULL, &tour.id.as_str().into())
        {
            log::error!("onTourComplete threw: {err:?}");
        }
    }
}
