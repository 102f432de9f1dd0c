//! Capabilities the host application supplies.
//!
//! The engine reaches the page only through these traits: [`Dom`] for
//! element lookup, geometry, scrolling and the two small DOM side effects it
//! is allowed (pointer-events toggling and click simulation), [`Navigator`]
//! for routing, and [`TourHooks`] for completion callbacks.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use wp_core::{Rect, Size, Step, Tour, Vec2};

/// Page access.
pub trait Dom {
    /// Handle to an element. Compared to detect target changes.
    type Element: Clone + PartialEq + fmt::Debug;

    /// First element matching a CSS selector.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Bounding box relative to the viewport.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    fn viewport(&self) -> Size;

    /// Document scroll offset.
    fn scroll_offset(&self) -> Vec2;

    /// Smooth-scroll `element` to the center of the viewport.
    fn scroll_into_view(&mut self, element: &Self::Element);

    /// Whether the host forwards a native scroll-end signal
    /// (`TourSession::on_scroll_end`).
    fn supports_scroll_end(&self) -> bool {
        false
    }

    /// Enable or restore pointer events on an element.
    fn set_pointer_events(&mut self, element: &Self::Element, enabled: bool);

    /// Simulate a user click.
    fn click(&mut self, element: &Self::Element);
}

/// Routing.
pub trait Navigator {
    fn current_route(&self) -> Option<String>;
    fn navigate_to(&mut self, route: &str);
    fn prefetch(&mut self, route: &str);
}

/// Future returned by [`TourHooks::initial_completed_steps`].
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Vec<bool>> + 'a>>;

/// Completion callbacks, all optional.
pub trait TourHooks {
    /// A step entered the completed set.
    fn step_completed(&mut self, _tour: &Tour, _index: usize, _step: &Step) {}

    /// The tour was closed with every step complete.
    fn tour_completed(&mut self, _tour: &Tour) {}

    /// Per-step completion state awaited when the tour starts.
    fn initial_completed_steps(&self, _tour: &Tour) -> Option<CompletionFuture<'_>> {
        None
    }
}

impl TourHooks for () {}

/// Custom target lookup registered under a name.
pub type CustomResolver<D> = Box<dyn Fn(&D) -> Option<<D as Dom>::Element>>;

/// Completion predicate registered under a name. Receives the observed
/// element, if any.
pub type CompletionPredicate<D> = Box<dyn Fn(&D, Option<&<D as Dom>::Element>) -> bool>;
