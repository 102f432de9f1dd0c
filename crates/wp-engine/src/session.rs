//! Tour session: progression state machine plus the step lifecycle.
//!
//! A `TourSession` owns the host capabilities, the tour catalog and every
//! piece of per-tour state. The host drives it with two kinds of input:
//!
//! - **Calls and events**: `start`, `next`, `go_to_step`, `on_scroll`,
//!   `on_dom_mutation`, ... Each runs to completion synchronously.
//! - **Time**: `advance(now_ms)`. Every delay (step apply, step-changing
//!   guard, scroll settle, route timeout, live updates) is an entry in one
//!   timer queue, so identical input sequences produce identical frames.
//!
//! Step setup always runs teardown first. Everything a step acquires (target,
//! pointer-events override, scroll wait, route watch, live updater) is
//! released there, which is why a stale timer can never act on a step that is
//! no longer current: its handle is no longer stored anywhere.

use crate::host::{CompletionPredicate, CustomResolver, Dom, Navigator, TourHooks};
use crate::live::LivePositionUpdater;
use crate::props::{CardPosition, CardProps, OverlayFrame, PointerProps, TourChromeProps};
use crate::resolver::TargetResolver;
use crate::route::RouteCoordinator;
use crate::scroll::ScrollCoordinator;
use crate::timers::{TimerHandle, TimerKind, TimerQueue};
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};
use wp_core::side::DEFAULT_SIDE;
use wp_core::{
    Breakpoints, Ident, OverlayConfig, PlacementInput, Rect, Size, Step, StepRef, Tour, TourError,
    compute_placement, resolve_side,
};

/// Debug-level diagnostics, emitted only when `OverlayConfig::debug` is set.
macro_rules! diag {
    ($session:expr, $($arg:tt)*) => {
        if $session.config.debug {
            log::debug!($($arg)*);
        }
    };
}

/// How a position recompute was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recompute {
    /// Step entry, scroll settle, resize. Animated.
    Forced,
    /// Coalesced scroll/layout notification. Instant, skipped while scrolling.
    Live,
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    Next,
    Previous,
    Jump(usize),
}

/// Resources held by the current step.
#[derive(Debug)]
struct Stage<E> {
    target: Option<E>,
    /// Element whose pointer events were enabled.
    interactive: Option<E>,
}

impl<E> Default for Stage<E> {
    fn default() -> Self {
        Self {
            target: None,
            interactive: None,
        }
    }
}

pub struct TourSession<D: Dom, N: Navigator> {
    dom: D,
    navigator: N,
    hooks: Box<dyn TourHooks>,
    tours: Vec<Tour>,
    config: OverlayConfig,
    breakpoints: Breakpoints,
    resolvers: HashMap<String, CustomResolver<D>>,
    predicates: HashMap<String, CompletionPredicate<D>>,

    // ── Progression ──
    tour: Option<usize>,
    current_step: usize,
    completed: BTreeSet<usize>,
    visible: bool,
    step_changing: bool,
    /// Apply/clear timers of the transition in flight.
    transition: SmallVec<[TimerHandle; 2]>,

    // ── Step lifecycle ──
    now: u64,
    timers: TimerQueue<TimerKind>,
    stage: Stage<D::Element>,
    scroll: ScrollCoordinator,
    route: RouteCoordinator,
    live: LivePositionUpdater,

    // ── Output ──
    frame: OverlayFrame,
    card_size: Option<Size>,
    arrow_size: Option<Size>,
}

impl<D: Dom, N: Navigator> TourSession<D, N> {
    pub fn new(dom: D, navigator: N, tours: Vec<Tour>, config: OverlayConfig) -> Self {
        let breakpoints = config.merged_breakpoints();
        Self {
            dom,
            navigator,
            hooks: Box::new(()),
            tours,
            config,
            breakpoints,
            resolvers: HashMap::new(),
            predicates: HashMap::new(),
            tour: None,
            current_step: 0,
            completed: BTreeSet::new(),
            visible: false,
            step_changing: false,
            transition: SmallVec::new(),
            now: 0,
            timers: TimerQueue::new(),
            stage: Stage::default(),
            scroll: ScrollCoordinator::default(),
            route: RouteCoordinator::default(),
            live: LivePositionUpdater::default(),
            frame: OverlayFrame::default(),
            card_size: None,
            arrow_size: None,
        }
    }

    pub fn with_hooks(mut self, hooks: impl TourHooks + 'static) -> Self {
        self.set_hooks(hooks);
        self
    }

    pub fn set_hooks(&mut self, hooks: impl TourHooks + 'static) {
        self.hooks = Box::new(hooks);
    }

    /// Register a custom target lookup, referenced by `Step::resolver`.
    pub fn register_resolver(
        &mut self,
        name: &str,
        resolve: impl Fn(&D) -> Option<D::Element> + 'static,
    ) {
        self.resolvers.insert(name.to_string(), Box::new(resolve));
    }

    /// Register a completion predicate, referenced by `Step::complete_when`.
    pub fn register_predicate(
        &mut self,
        name: &str,
        predicate: impl Fn(&D, Option<&D::Element>) -> bool + 'static,
    ) {
        self.predicates.insert(name.to_string(), Box::new(predicate));
    }

    // ─── Progression ─────────────────────────────────────────────────────

    /// Start `OverlayConfig::initial_tour`, if any and nothing is running.
    pub async fn mount(&mut self) -> Result<bool, TourError> {
        match (self.tour, self.config.initial_tour.clone()) {
            (None, Some(tour_id)) => self.start(&tour_id, None, None).await,
            _ => Ok(false),
        }
    }

    /// Start a tour, awaiting the completion initializer when the hooks
    /// provide one. Returns `Ok(false)` for an unknown tour.
    pub async fn start(
        &mut self,
        tour_id: &str,
        visible: Option<bool>,
        initial_step: Option<StepRef>,
    ) -> Result<bool, TourError> {
        self.close();
        let completed = match self.tours.iter().find(|t| t.id.as_str() == tour_id) {
            Some(tour) => match self.hooks.initial_completed_steps(tour) {
                Some(pending) => Some(pending.await),
                None => None,
            },
            None => None,
        };
        self.start_with_completed(tour_id, visible, initial_step, completed)
    }

    /// Synchronous start with an already-known completion vector.
    ///
    /// The entry step is `initial_step` when given, else the first incomplete
    /// step, else the last step. An unknown step id fails before any state is
    /// touched.
    pub fn start_with_completed(
        &mut self,
        tour_id: &str,
        visible: Option<bool>,
        initial_step: Option<StepRef>,
        completed: Option<Vec<bool>>,
    ) -> Result<bool, TourError> {
        self.close();
        let Some(index) = self.tours.iter().position(|t| t.id.as_str() == tour_id) else {
            log::warn!("{}", TourError::TourNotFound(tour_id.to_string()));
            return Ok(false);
        };

        let tour = &self.tours[index];
        for warning in tour.warnings() {
            log::warn!("{warning}");
        }

        let len = tour.steps.len();
        let done: BTreeSet<usize> = completed
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(i, done)| (done && i < len).then_some(i))
            .collect();
        let fallback = (0..len)
            .find(|i| !done.contains(i))
            .unwrap_or(len.saturating_sub(1));

        let entry = match initial_step {
            Some(step) => {
                let requested = tour.resolve_step(&step)?;
                if requested < len {
                    requested
                } else {
                    log::warn!(
                        "tour `{}` has {len} steps, ignoring initial step {requested}",
                        tour.id
                    );
                    fallback
                }
            }
            None => fallback,
        };
        diag!(self, "starting tour `{tour_id}` at step {entry}, completed {done:?}");

        self.tour = Some(index);
        self.completed = done;
        self.current_step = entry;
        self.visible = visible.unwrap_or(self.config.default_visible);
        self.setup_step();
        Ok(true)
    }

    /// End the tour. Fires `tour_completed` when every step is complete.
    pub fn close(&mut self) {
        if let Some(index) = self.tour {
            let tour = &self.tours[index];
            if self.completed.len() == tour.steps.len() {
                diag!(self, "tour `{}` completed", tour.id);
                self.hooks.tour_completed(tour);
            }
        }
        self.teardown_step();
        self.route.reset(&mut self.timers);
        self.timers.clear();
        self.transition.clear();

        self.tour = None;
        self.current_step = 0;
        self.completed.clear();
        self.visible = false;
        self.step_changing = false;
        self.frame = OverlayFrame::default();
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.setup_step();
        } else {
            self.teardown_step();
        }
    }

    /// Add a step to the completed set. Returns `false` when it already was
    /// complete (the hook fires once per step) or is out of range.
    pub fn mark_complete(&mut self, index: usize) -> bool {
        let Some(tour_index) = self.tour else {
            return false;
        };
        let tour = &self.tours[tour_index];
        let Some(step) = tour.steps.get(index) else {
            return false;
        };
        if !self.completed.insert(index) {
            return false;
        }
        diag!(self, "step {index} of `{}` completed", tour.id);
        self.hooks.step_completed(tour, index, step);
        true
    }

    /// Advance one step. Returns `false` when ignored (no tour, or a
    /// transition already in flight).
    pub fn next(&mut self) -> bool {
        self.begin_transition(Transition::Next)
    }

    /// Go back one step. At step 0 nothing is applied, but the transition
    /// guard still runs.
    pub fn previous(&mut self) -> bool {
        self.begin_transition(Transition::Previous)
    }

    /// Jump to a step by index or id. Unknown ids are an error even while a
    /// transition is in flight.
    pub fn go_to_step(&mut self, step: impl Into<StepRef>) -> Result<bool, TourError> {
        let Some(index) = self.resolve_ref(step.into())? else {
            return Ok(false);
        };
        Ok(self.begin_transition(Transition::Jump(index)))
    }

    /// Set the current step directly, optionally after `delay_ms`. No click
    /// simulation and no transition guard.
    pub fn set_current_step(
        &mut self,
        step: impl Into<StepRef>,
        delay_ms: Option<u64>,
    ) -> Result<(), TourError> {
        let Some(index) = self.resolve_ref(step.into())? else {
            return Ok(());
        };
        match delay_ms {
            Some(delay) if delay > 0 => {
                self.timers
                    .schedule(self.now.saturating_add(delay), TimerKind::ApplyStep(index));
            }
            _ => self.apply_step(index),
        }
        Ok(())
    }

    fn resolve_ref(&self, step: StepRef) -> Result<Option<usize>, TourError> {
        match (self.active_tour(), step) {
            (Some(tour), step) => tour.resolve_step(&step).map(Some),
            (None, StepRef::Id(id)) => Err(TourError::StepNotFound { id }),
            (None, StepRef::Index(_)) => Ok(None),
        }
    }

    fn begin_transition(&mut self, transition: Transition) -> bool {
        let Some(tour_index) = self.tour else {
            return false;
        };
        if self.step_changing {
            diag!(self, "{transition:?} ignored, step already changing");
            return false;
        }
        self.step_changing = true;

        let index = self.current_step;
        let steps = &self.tours[tour_index].steps;
        let current = steps.get(index);
        let (clicks, target) = match transition {
            Transition::Next => (
                [current.and_then(|s| s.click_on_next.clone()), None],
                Some(index + 1),
            ),
            Transition::Previous => (
                [current.and_then(|s| s.click_on_prev.clone()), None],
                index.checked_sub(1),
            ),
            Transition::Jump(to) => (
                [
                    current.and_then(|s| s.click_on_unset.clone()),
                    steps.get(to).and_then(|s| s.click_on_set.clone()),
                ],
                Some(to),
            ),
        };
        for selector in clicks.into_iter().flatten() {
            self.simulate_click(&selector);
        }

        let timing = self.config.timing;
        match target {
            Some(index) => {
                let apply = self.timers.schedule(
                    self.now.saturating_add(timing.step_apply_delay_ms),
                    TimerKind::ApplyStep(index),
                );
                self.transition.push(apply);
            }
            None => diag!(self, "already at the first step"),
        }
        let clear = self.timers.schedule(
            self.now.saturating_add(timing.step_settle_delay_ms),
            TimerKind::ClearStepChanging,
        );
        self.transition.push(clear);
        true
    }

    fn simulate_click(&mut self, selector: &str) {
        match self.dom.query_selector(selector) {
            Some(element) => {
                diag!(self, "clicking `{selector}`");
                self.dom.click(&element);
            }
            None => diag!(self, "click target `{selector}` not found"),
        }
    }

    /// Make `index` the current step and run its setup.
    fn apply_step(&mut self, index: usize) {
        let Some(tour_index) = self.tour else {
            return;
        };
        let len = self.tours[tour_index].steps.len();
        if index >= len {
            log::warn!("step {index} out of range ({len} steps), staying on {}", self.current_step);
            return;
        }
        if index != self.current_step {
            self.route.reset(&mut self.timers);
            self.current_step = index;
        }
        self.setup_step();
    }

    // ─── Time ────────────────────────────────────────────────────────────

    /// Move the clock to `now_ms` and fire every timer due by then, in due
    /// order. Time never goes backwards.
    pub fn advance(&mut self, now_ms: u64) {
        self.now = self.now.max(now_ms);
        while let Some((handle, kind)) = self.timers.pop_due(self.now) {
            self.fire(handle, kind);
        }
    }

    /// When the host should call `advance` next.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_due()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    fn fire(&mut self, handle: TimerHandle, kind: TimerKind) {
        match kind {
            TimerKind::ApplyStep(index) => {
                self.transition.retain(|h| *h != handle);
                self.apply_step(index);
            }
            TimerKind::ClearStepChanging => {
                self.transition.retain(|h| *h != handle);
                self.step_changing = false;
            }
            TimerKind::RouteTimeout => {
                if let Some(index) = self.route.timed_out(handle) {
                    log::error!(
                        "no target for step {index} within {} ms of navigating",
                        self.config.observer_timeout_ms
                    );
                    self.center_pointer();
                }
            }
            TimerKind::ScrollIdle | TimerKind::ScrollCeiling => {
                if self.scroll.owns(handle) {
                    diag!(self, "scroll settled ({kind:?})");
                    self.finish_scroll();
                }
            }
            TimerKind::LiveUpdate => {
                if self.live.fire(handle) {
                    self.recompute(Recompute::Live);
                }
            }
        }
    }

    // ─── Step lifecycle ──────────────────────────────────────────────────

    fn resolver(&self) -> TargetResolver<'_, D> {
        TargetResolver::new(&self.dom, &self.resolvers, self.config.debug)
    }

    fn teardown_step(&mut self) {
        if let Some(element) = self.stage.interactive.take() {
            self.dom.set_pointer_events(&element, false);
        }
        self.stage.target = None;
        self.scroll.cancel(&mut self.timers);
        self.route.disconnect(&mut self.timers);
        self.live.stop(&mut self.timers);
    }

    fn setup_step(&mut self) {
        self.teardown_step();
        if !self.visible {
            return;
        }
        let Some(step) = self.current_step_def().cloned() else {
            return;
        };
        let index = self.current_step;
        diag!(self, "entering step {index}, completed {:?}", self.completed);
        self.frame.placement = None;

        let element = if step.has_target() {
            self.resolver().locate(&step)
        } else {
            None
        };
        let found = element.is_some();
        if let Some(element) = element {
            self.attach_target(&step, element);
        }

        if let Some(route) = step.route.as_deref() {
            let current = self.navigator.current_route();
            let timeout = self.config.observer_timeout_ms;
            if self.route.needs_navigation(index, route, current.as_deref()) {
                diag!(self, "navigating to `{route}` for step {index}");
                self.navigator.navigate_to(route);
                self.route
                    .begin(&mut self.timers, self.now, timeout, index, route);
            } else if step.has_target() && !found && self.route.navigated_for(index, route) {
                diag!(self, "resuming wait for the target of step {index}");
                self.route.wait(&mut self.timers, self.now, timeout, index);
            }
        }

        if !step.has_target() && !self.route.is_pending() && !self.completed.contains(&index) {
            diag!(self, "step {index} has no target, completing");
            self.mark_complete(index);
        }
        if !found {
            self.center_pointer();
        }

        self.check_completion_predicate();
        self.prefetch_next();
    }

    /// Bind the resolved target: pointer events, then either an immediate
    /// placement or a scroll-and-settle wait.
    fn attach_target(&mut self, step: &Step, element: D::Element) {
        if let Some(previous) = self.stage.interactive.take()
            && previous != element
        {
            self.dom.set_pointer_events(&previous, false);
        }
        if step.interactable {
            self.dom.set_pointer_events(&element, true);
            self.stage.interactive = Some(element.clone());
        }

        let on_screen = {
            let resolver = self.resolver();
            let tour_container = self.active_tour().and_then(|t| t.scroll_container.as_deref());
            let container = resolver.scroll_container(step, tour_container);
            resolver.is_on_screen(&element, container.as_ref())
        };
        self.stage.target = Some(element.clone());

        if on_screen {
            self.scroll.cancel(&mut self.timers);
            self.recompute(Recompute::Forced);
            self.sync_live();
        } else {
            diag!(self, "target {element:?} off screen, scrolling");
            self.live.stop(&mut self.timers);
            let native = self.dom.supports_scroll_end();
            self.scroll
                .begin(&mut self.timers, self.now, &self.config.timing, native);
            self.dom.scroll_into_view(&element);
        }
    }

    fn finish_scroll(&mut self) {
        self.recompute(Recompute::Forced);
        self.scroll.cancel(&mut self.timers);
        self.sync_live();
    }

    /// Start the live updater when a settled, visible target and a measured
    /// card are present; stop it otherwise.
    fn sync_live(&mut self) {
        let ready = self.visible
            && self.tour.is_some()
            && !self.scroll.is_active()
            && self.stage.target.is_some()
            && self.card_size.is_some();
        if ready {
            self.live.start();
        } else {
            self.live.stop(&mut self.timers);
        }
    }

    /// Zero-size pointer at the viewport center, no card placement.
    fn center_pointer(&mut self) {
        let view = self.dom.viewport();
        let (cx, cy) = (view.width / 2.0, view.height / 2.0);
        self.frame.pointer = Some(Rect::new(cx, cy, cx, cy));
        self.frame.placement = None;
        self.frame.animate = false;
        self.frame.revision += 1;
        self.stage.target = None;
        self.scroll.cancel(&mut self.timers);
        self.live.stop(&mut self.timers);
    }

    fn recompute(&mut self, mode: Recompute) {
        if mode == Recompute::Live && self.scroll.is_active() {
            return;
        }
        if mode == Recompute::Forced {
            self.live.cancel_pending(&mut self.timers);
        }

        let located = {
            let Some(step) = self.current_step_def() else {
                return;
            };
            let element = if step.has_target() {
                self.resolver().locate(step)
            } else {
                None
            };
            let width = self.dom.viewport().width;
            let side_name = step
                .side
                .as_ref()
                .map_or(DEFAULT_SIDE, |pref| pref.resolve(&self.breakpoints, width));
            let side = resolve_side(side_name, &self.config.extend_sides);
            element.map(|element| (element, side))
        };
        let Some((element, side)) = located else {
            self.center_pointer();
            return;
        };

        let reference = self.dom.bounding_rect(&element);
        let scroll = self.dom.scroll_offset();
        let input = PlacementInput {
            reference: Some(reference),
            floating: self.card_size,
            arrow: self.arrow_size,
            preferred: side.placement,
            viewport: self.dom.viewport(),
            scroll,
            extra_offset: side.extra_offset,
        };
        match compute_placement(&input, &self.config.placement) {
            Ok(Some(placement)) => {
                diag!(
                    self,
                    "card at ({}, {}) on {}",
                    placement.x,
                    placement.y,
                    placement.effective_side()
                );
                self.frame.placement = Some(placement);
            }
            // Card not measured yet.
            Ok(None) => {}
            Err(err) => log::error!("{}", TourError::from(err)),
        }

        self.frame.pointer = Some(reference + scroll);
        self.frame.animate = mode == Recompute::Forced;
        self.frame.revision += 1;
        self.stage.target = Some(element);
    }

    fn check_completion_predicate(&mut self) {
        let index = self.current_step;
        let holds = {
            let Some(step) = self.current_step_def() else {
                return;
            };
            let Some(name) = step.complete_when.as_deref() else {
                return;
            };
            let Some(predicate) = self.predicates.get(name) else {
                diag!(self, "no completion predicate registered as `{name}`");
                return;
            };
            let observed = match step.observer_selector.as_deref() {
                Some(selector) => self.dom.query_selector(selector),
                None => self.stage.target.clone(),
            };
            predicate(&self.dom, observed.as_ref())
        };
        if holds && !self.completed.contains(&index) {
            diag!(self, "completion predicate holds for step {index}");
            self.mark_complete(index);
        }
    }

    fn prefetch_next(&mut self) {
        let route = self
            .active_tour()
            .and_then(|t| t.steps.get(self.current_step + 1))
            .and_then(|step| step.route.as_deref())
            .map(str::to_string);
        if let Some(route) = route {
            diag!(self, "prefetching `{route}`");
            self.navigator.prefetch(&route);
        }
    }

    /// Re-check the route wait after the page changed.
    fn check_route_watch(&mut self) {
        if !self.route.is_pending() {
            return;
        }
        let Some(step) = self.current_step_def().cloned() else {
            return;
        };
        let element = if step.has_target() {
            self.resolver().locate(&step)
        } else {
            None
        };
        let arrived = !step.has_target() || element.is_some();
        if self.route.check(&mut self.timers, |_| arrived).is_none() {
            diag!(self, "still waiting for the target of step {}", self.current_step);
            return;
        }
        match element {
            Some(element) => {
                diag!(self, "target of step {} appeared", self.current_step);
                self.attach_target(&step, element);
            }
            None => self.setup_step(),
        }
    }

    // ─── Host events ─────────────────────────────────────────────────────

    /// Window or scroll-container scroll.
    pub fn on_scroll(&mut self) {
        if self.scroll.is_active() {
            self.scroll
                .on_activity(&mut self.timers, self.now, &self.config.timing);
        } else {
            self.live.request(&mut self.timers, self.now);
        }
    }

    /// Native scroll-end signal.
    pub fn on_scroll_end(&mut self) {
        if self.scroll.accepts_native_end() {
            diag!(self, "scroll settled (native)");
            self.finish_scroll();
        }
    }

    pub fn on_resize(&mut self) {
        if self.tour.is_none() || !self.visible || self.scroll.is_active() {
            return;
        }
        self.recompute(Recompute::Forced);
        self.sync_live();
    }

    /// The target's box changed size.
    pub fn on_target_resize(&mut self) {
        self.live.request(&mut self.timers, self.now);
    }

    /// Something else moved the layout (ancestor resize, font load, ...).
    pub fn on_layout_shift(&mut self) {
        self.live.request(&mut self.timers, self.now);
    }

    /// Nodes were added or removed anywhere in the document.
    pub fn on_dom_mutation(&mut self) {
        if self.tour.is_none() || !self.visible {
            return;
        }
        self.check_route_watch();
        self.check_completion_predicate();
    }

    /// The host finished a navigation.
    pub fn on_route_changed(&mut self) {
        if self.route.is_pending() {
            self.check_route_watch();
        } else if self.tour.is_some() && self.visible {
            self.setup_step();
        }
    }

    /// Measured card size; `None` when the card is unmounted.
    pub fn set_card_size(&mut self, size: Option<Size>) {
        let changed = self.card_size != size;
        self.card_size = size;
        self.sync_live();
        if !changed || size.is_none() {
            return;
        }
        if self.frame.placement.is_none()
            && self.stage.target.is_some()
            && !self.scroll.is_active()
        {
            self.recompute(Recompute::Forced);
        } else {
            self.live.request(&mut self.timers, self.now);
        }
    }

    pub fn set_arrow_size(&mut self, size: Option<Size>) {
        if self.arrow_size != size {
            self.arrow_size = size;
            self.live.request(&mut self.timers, self.now);
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn current_tour(&self) -> Option<Ident> {
        self.active_tour().map(|t| t.id)
    }

    pub fn active_tour(&self) -> Option<&Tour> {
        self.tour.map(|i| &self.tours[i])
    }

    pub fn current_tour_steps(&self) -> &[Step] {
        self.active_tour()
            .map(|t| t.steps.as_slice())
            .unwrap_or_default()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    fn current_step_def(&self) -> Option<&Step> {
        self.active_tour()?.steps.get(self.current_step)
    }

    pub fn completed_steps(&self) -> Vec<usize> {
        self.completed.iter().copied().collect()
    }

    pub fn is_complete(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_step_changing(&self) -> bool {
        self.step_changing
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_active()
    }

    pub fn pending_route_change(&self) -> bool {
        self.route.is_pending()
    }

    pub fn frame(&self) -> &OverlayFrame {
        &self.frame
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    // ─── Render slots ────────────────────────────────────────────────────

    /// Card slot. `None` while hidden or before a pointer position exists.
    pub fn card_props(&self) -> Option<CardProps<'_>> {
        if !self.visible {
            return None;
        }
        let tour = self.active_tour()?;
        let step = tour.steps.get(self.current_step)?;
        self.frame.pointer?;
        Some(CardProps {
            step,
            tour,
            current_step: self.current_step,
            total_steps: tour.steps.len(),
            completed_steps: self.completed_steps(),
            pending_route_change: self.route.is_pending(),
            is_step_changing: self.step_changing,
            is_scrolling: self.scroll.is_active(),
            show_arrow: step.has_target() && self.stage.target.is_some(),
            position: self.frame.placement.as_ref().map(CardPosition::from),
        })
    }

    pub fn tour_chrome_props(&self) -> Option<TourChromeProps<'_>> {
        if !self.visible {
            return None;
        }
        let tour = self.active_tour()?;
        Some(TourChromeProps {
            tour,
            current_tour: tour.id,
            current_step: self.current_step,
            completed_steps: self.completed_steps(),
            is_scrolling: self.scroll.is_active(),
        })
    }

    /// Spotlight geometry, padded by the step's pointer padding.
    pub fn pointer_props(&self) -> Option<PointerProps> {
        if !self.visible {
            return None;
        }
        let step = self.current_step_def()?;
        let rect = self.frame.pointer?;
        let padding = step.pointer_padding();
        Some(PointerProps {
            x: rect.x0 - padding / 2.0,
            y: rect.y0 - padding / 2.0,
            width: rect.width() + padding,
            height: rect.height() + padding,
            radius: step.pointer_radius(),
            visible: !self.scroll.is_active(),
            animate: self.frame.animate,
            shadow_rgb: self.config.shadow_rgb.clone(),
            shadow_opacity: self.config.shadow_opacity.clone(),
        })
    }
}

impl<D: Dom, N: Navigator> Drop for TourSession<D, N> {
    fn drop(&mut self) {
        if let Some(element) = self.stage.interactive.take() {
            self.dom.set_pointer_events(&element, false);
        }
    }
}
