//! Target resolution: step → element, plus on-screen checks.

use crate::host::{CustomResolver, Dom};
use std::collections::HashMap;
use wp_core::{Step, TargetLocator};

/// Read-only view over the page for locating step targets.
pub struct TargetResolver<'a, D: Dom> {
    dom: &'a D,
    resolvers: &'a HashMap<String, CustomResolver<D>>,
    debug: bool,
}

impl<'a, D: Dom> TargetResolver<'a, D> {
    pub fn new(dom: &'a D, resolvers: &'a HashMap<String, CustomResolver<D>>, debug: bool) -> Self {
        Self {
            dom,
            resolvers,
            debug,
        }
    }

    /// The element a step points at. `None` for steps without a locator and
    /// for misses; a miss is not an error.
    pub fn locate(&self, step: &Step) -> Option<D::Element> {
        let found = match step.locator()? {
            TargetLocator::Selector(selector) => self.dom.query_selector(selector),
            TargetLocator::Custom(name) => match self.resolvers.get(name) {
                Some(resolve) => resolve(self.dom),
                None => {
                    log::warn!("no resolver registered as `{name}`");
                    None
                }
            },
        };
        if found.is_none() && self.debug {
            log::debug!("target not found for step {:?}", step.locator());
        }
        found
    }

    /// All four edges inside the viewport and, when given, inside the
    /// visible box of the scroll container.
    pub fn is_on_screen(&self, element: &D::Element, container: Option<&D::Element>) -> bool {
        let rect = self.dom.bounding_rect(element);
        let view = self.dom.viewport();
        let in_viewport =
            rect.x0 >= 0.0 && rect.y0 >= 0.0 && rect.x1 <= view.width && rect.y1 <= view.height;
        if !in_viewport {
            return false;
        }
        match container {
            Some(container) => {
                let bounds = self.dom.bounding_rect(container);
                rect.x0 >= bounds.x0
                    && rect.y0 >= bounds.y0
                    && rect.x1 <= bounds.x1
                    && rect.y1 <= bounds.y1
            }
            None => true,
        }
    }

    /// The scroll container for a step: the step override, else the tour's.
    /// A selector that matches nothing yields `None` (document scrolling).
    pub fn scroll_container(&self, step: &Step, tour_container: Option<&str>) -> Option<D::Element> {
        let selector = step.scroll_container_override.as_deref().or(tour_container)?;
        let container = self.dom.query_selector(selector);
        if container.is_none() && self.debug {
            log::debug!("scroll container `{selector}` not found, using the document");
        }
        container
    }
}
