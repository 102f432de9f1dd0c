//! Shared test doubles: an in-memory page, a router, and recording hooks.
//!
//! Each double keeps its state behind `Rc<RefCell<_>>` so a test can keep a
//! handle after moving the double into a `TourSession`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use wp_core::{OverlayConfig, Rect, Size, Step, Tour, Vec2};
use wp_engine::{CompletionFuture, Dom, Navigator, TourHooks, TourSession};

pub const VIEWPORT: Size = Size {
    width: 1280.0,
    height: 800.0,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn tours() -> Vec<Tour> {
    serde_json::from_str(include_str!("../fixtures/tours.json")).unwrap()
}

// ─── Page ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Page {
    /// Selector → box in document coordinates.
    pub elements: Vec<(String, Rect)>,
    pub viewport: Size,
    pub scroll: Vec2,
    pub native_scroll_end: bool,
    /// Elements a completion predicate treats as "on".
    pub checked: HashSet<String>,

    pub scrolled_to: Vec<String>,
    pub clicks: Vec<String>,
    pub pointer_events: Vec<(String, bool)>,
}

impl Page {
    pub fn insert(&mut self, selector: &str, rect: Rect) {
        self.elements.retain(|(s, _)| s != selector);
        self.elements.push((selector.to_string(), rect));
    }

    pub fn remove(&mut self, selector: &str) {
        self.elements.retain(|(s, _)| s != selector);
    }

    fn document_rect(&self, selector: &str) -> Option<Rect> {
        self.elements
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, r)| *r)
    }
}

#[derive(Debug, Clone)]
pub struct FakeDom {
    pub page: Rc<RefCell<Page>>,
}

impl FakeDom {
    /// The standard page most tests run against.
    pub fn standard() -> Self {
        let mut page = Page {
            viewport: VIEWPORT,
            ..Page::default()
        };
        page.insert("#sidebar", Rect::new(0.0, 80.0, 240.0, 700.0));
        page.insert("#search", Rect::new(400.0, 300.0, 800.0, 340.0));
        page.insert("#open-menu", Rect::new(1200.0, 20.0, 1240.0, 60.0));
        page.insert("#table", Rect::new(0.0, 0.0, 1280.0, 3000.0));
        page.insert("#row-3", Rect::new(300.0, 500.0, 900.0, 540.0));
        page.insert("#toggle", Rect::new(1000.0, 200.0, 1040.0, 220.0));
        page.insert("#close-drawer", Rect::new(10.0, 10.0, 30.0, 30.0));
        page.insert("#expand-footer", Rect::new(10.0, 40.0, 30.0, 60.0));
        page.insert("#footer-cta", Rect::new(500.0, 2400.0, 700.0, 2450.0));
        Self {
            page: Rc::new(RefCell::new(page)),
        }
    }
}

impl Dom for FakeDom {
    type Element = String;

    fn query_selector(&self, selector: &str) -> Option<String> {
        self.page
            .borrow()
            .document_rect(selector)
            .map(|_| selector.to_string())
    }

    fn bounding_rect(&self, element: &String) -> Rect {
        let page = self.page.borrow();
        page.document_rect(element).unwrap_or(Rect::ZERO) - page.scroll
    }

    fn viewport(&self) -> Size {
        self.page.borrow().viewport
    }

    fn scroll_offset(&self) -> Vec2 {
        self.page.borrow().scroll
    }

    /// Jumps straight to the final position: element centered vertically.
    fn scroll_into_view(&mut self, element: &String) {
        let mut page = self.page.borrow_mut();
        if let Some(rect) = page.document_rect(element) {
            let y = (rect.center().y - page.viewport.height / 2.0).max(0.0);
            page.scroll = Vec2::new(0.0, y);
        }
        page.scrolled_to.push(element.clone());
    }

    fn supports_scroll_end(&self) -> bool {
        self.page.borrow().native_scroll_end
    }

    fn set_pointer_events(&mut self, element: &String, enabled: bool) {
        self.page
            .borrow_mut()
            .pointer_events
            .push((element.clone(), enabled));
    }

    fn click(&mut self, element: &String) {
        self.page.borrow_mut().clicks.push(element.clone());
    }
}

// ─── Router ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Router {
    pub route: Option<String>,
    pub navigations: Vec<String>,
    pub prefetched: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeNavigator {
    pub router: Rc<RefCell<Router>>,
}

impl FakeNavigator {
    pub fn at(route: &str) -> Self {
        let nav = Self::default();
        nav.router.borrow_mut().route = Some(route.to_string());
        nav
    }
}

impl Navigator for FakeNavigator {
    fn current_route(&self) -> Option<String> {
        self.router.borrow().route.clone()
    }

    fn navigate_to(&mut self, route: &str) {
        let mut router = self.router.borrow_mut();
        router.route = Some(route.to_string());
        router.navigations.push(route.to_string());
    }

    fn prefetch(&mut self, route: &str) {
        self.router.borrow_mut().prefetched.push(route.to_string());
    }
}

// ─── Hooks ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HookLog {
    pub steps: Vec<(String, usize)>,
    pub tours: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingHooks {
    pub log: Rc<RefCell<HookLog>>,
    /// Returned by the async initializer when set.
    pub initial: Option<Vec<bool>>,
}

impl TourHooks for RecordingHooks {
    fn step_completed(&mut self, tour: &Tour, index: usize, _step: &Step) {
        self.log
            .borrow_mut()
            .steps
            .push((tour.id.to_string(), index));
    }

    fn tour_completed(&mut self, tour: &Tour) {
        self.log.borrow_mut().tours.push(tour.id.to_string());
    }

    fn initial_completed_steps(&self, _tour: &Tour) -> Option<CompletionFuture<'_>> {
        let initial = self.initial.clone()?;
        Some(Box::pin(async move {
            tokio::task::yield_now().await;
            initial
        }))
    }
}

// ─── Harness ─────────────────────────────────────────────────────────────

pub struct Harness {
    pub session: TourSession<FakeDom, FakeNavigator>,
    pub page: Rc<RefCell<Page>>,
    pub router: Rc<RefCell<Router>>,
    pub hooks: Rc<RefCell<HookLog>>,
}

pub fn harness() -> Harness {
    harness_with(OverlayConfig::default(), RecordingHooks::default())
}

pub fn harness_with(config: OverlayConfig, hooks: RecordingHooks) -> Harness {
    build(tours(), config, hooks)
}

/// A harness over the standard page running hand-built tours.
pub fn harness_for(tours: Vec<Tour>) -> Harness {
    build(tours, OverlayConfig::default(), RecordingHooks::default())
}

fn build(tours: Vec<Tour>, config: OverlayConfig, hooks: RecordingHooks) -> Harness {
    init_logging();
    let dom = FakeDom::standard();
    let nav = FakeNavigator::at("/home");
    let page = dom.page.clone();
    let router = nav.router.clone();
    let log = hooks.log.clone();
    let session = TourSession::new(dom, nav, tours, config).with_hooks(hooks);
    Harness {
        session,
        page,
        router,
        hooks: log,
    }
}

pub const CARD: Size = Size {
    width: 300.0,
    height: 120.0,
};
