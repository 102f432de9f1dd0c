//! Tour and step data model.
//!
//! Tours are plain data supplied by the host application and never mutated
//! by the engine. Behavior hooks (completion callbacks, the asynchronous
//! completion-state initializer, custom target resolvers, completion
//! predicates) live on the host side and are referenced from here by name
//! or keyed by tour id, so a whole tour list round-trips through JSON.

use crate::error::TourError;
use crate::id::Ident;
use crate::side::SidePreference;
use serde::{Deserialize, Serialize};

/// Default spotlight padding around the target, in pixels.
pub const DEFAULT_POINTER_PADDING: f64 = 30.0;
/// Default spotlight corner radius, in pixels.
pub const DEFAULT_POINTER_RADIUS: f64 = 28.0;

/// A named, ordered sequence of steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    #[serde(alias = "tour")]
    pub id: Ident,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Whether the host may offer a dismiss control.
    #[serde(default)]
    pub dismissible: bool,
    /// Selector of the scroll container targets live in, if not the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_container: Option<String>,
}

impl Tour {
    pub fn new(id: &str, steps: Vec<Step>) -> Self {
        Self {
            id: Ident::intern(id),
            title: None,
            description: None,
            steps,
            dismissible: false,
            scroll_container: None,
        }
    }

    /// Index of the step with the given id.
    pub fn step_index(&self, id: &str) -> Option<usize> {
        let id = Ident::lookup(id)?;
        self.steps.iter().position(|s| s.id == Some(id))
    }

    /// Resolve a step reference to an index. Indices pass through unchecked;
    /// ids must exist.
    pub fn resolve_step(&self, step: &StepRef) -> Result<usize, TourError> {
        match step {
            StepRef::Index(index) => Ok(*index),
            StepRef::Id(id) => self
                .step_index(id)
                .ok_or_else(|| TourError::StepNotFound { id: id.clone() }),
        }
    }

    /// Authoring problems worth a warning: duplicate step ids and
    /// deprecated route fields.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (i, step) in self.steps.iter().enumerate() {
            if let Some(id) = step.id
                && self.steps[..i].iter().any(|s| s.id == Some(id))
            {
                warnings.push(format!("tour `{}`: duplicate step id `{id}`", self.id));
            }
            if step.next_route.is_some() || step.prev_route.is_some() {
                warnings.push(format!(
                    "tour `{}` step {i}: `nextRoute`/`prevRoute` are ignored, use `route`",
                    self.id
                ));
            }
        }
        warnings
    }
}

/// A step referenced by position or by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRef {
    Index(usize),
    Id(String),
}

impl From<usize> for StepRef {
    fn from(index: usize) -> Self {
        StepRef::Index(index)
    }
}

impl From<&str> for StepRef {
    fn from(id: &str) -> Self {
        StepRef::Id(id.to_string())
    }
}

impl From<String> for StepRef {
    fn from(id: String) -> Self {
        StepRef::Id(id)
    }
}

/// How a step finds its target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLocator<'a> {
    /// CSS selector, single query.
    Selector(&'a str),
    /// Name of a resolver function registered with the session.
    Custom(&'a str),
}

/// One highlighted element in a tour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Ident>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body for the host's card renderer: text or any JSON the host
    /// understands.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub content: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    // ── Target ──
    /// Takes precedence over `resolver` when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(
        default,
        alias = "customQuerySelector",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolver: Option<String>,

    // ── Click simulation ──
    #[serde(
        default,
        alias = "clickElementOnNext",
        skip_serializing_if = "Option::is_none"
    )]
    pub click_on_next: Option<String>,
    #[serde(
        default,
        alias = "clickElementOnPrev",
        skip_serializing_if = "Option::is_none"
    )]
    pub click_on_prev: Option<String>,
    #[serde(
        default,
        alias = "clickElementOnSet",
        skip_serializing_if = "Option::is_none"
    )]
    pub click_on_set: Option<String>,
    #[serde(
        default,
        alias = "clickElementOnUnset",
        skip_serializing_if = "Option::is_none"
    )]
    pub click_on_unset: Option<String>,

    // ── Options ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<SidePreference>,
    #[serde(default = "default_true")]
    pub show_controls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_radius: Option<f64>,
    /// Leave the target clickable while it is highlighted.
    #[serde(default)]
    pub interactable: bool,
    /// Overrides the tour's scroll container for this step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_container_override: Option<String>,

    // ── Completion predicate ──
    /// Name of a completion predicate registered with the session.
    #[serde(
        default,
        alias = "isCompleteConditions",
        skip_serializing_if = "Option::is_none"
    )]
    pub complete_when: Option<String>,
    /// Element the predicate is evaluated against, if not the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer_selector: Option<String>,

    // ── Routing ──
    /// The route this step lives on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Deprecated. Kept so old tour files still load; only reported by
    /// [`Tour::warnings`], never navigated to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_route: Option<String>,
    /// Deprecated, like `next_route`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_route: Option<String>,

    /// Free-form host data.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

fn default_true() -> bool {
    true
}

impl Step {
    /// A step highlighting the element matched by `selector`.
    pub fn with_selector(selector: &str) -> Self {
        Self {
            selector: Some(selector.to_string()),
            show_controls: true,
            ..Self::default()
        }
    }

    /// A step with no target: the pointer is centered on screen.
    pub fn informational() -> Self {
        Self {
            show_controls: true,
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(Ident::intern(id));
        self
    }

    pub fn route(mut self, route: &str) -> Self {
        self.route = Some(route.to_string());
        self
    }

    pub fn side(mut self, side: SidePreference) -> Self {
        self.side = Some(side);
        self
    }

    pub fn locator(&self) -> Option<TargetLocator<'_>> {
        if let Some(selector) = self.selector.as_deref() {
            Some(TargetLocator::Selector(selector))
        } else {
            self.resolver.as_deref().map(TargetLocator::Custom)
        }
    }

    pub fn has_target(&self) -> bool {
        self.locator().is_some()
    }

    pub fn pointer_padding(&self) -> f64 {
        self.pointer_padding.unwrap_or(DEFAULT_POINTER_PADDING)
    }

    pub fn pointer_radius(&self) -> f64 {
        self.pointer_radius.unwrap_or(DEFAULT_POINTER_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selector_wins_over_resolver() {
        let step = Step {
            selector: Some("#a".into()),
            resolver: Some("custom".into()),
            ..Step::default()
        };
        assert_eq!(step.locator(), Some(TargetLocator::Selector("#a")));

        let custom = Step {
            resolver: Some("custom".into()),
            ..Step::default()
        };
        assert_eq!(custom.locator(), Some(TargetLocator::Custom("custom")));
        assert!(!Step::informational().has_target());
    }

    #[test]
    fn resolve_step_by_id_and_index() {
        let tour = Tour::new(
            "model-ids",
            vec![
                Step::informational().id("first"),
                Step::with_selector("#b").id("second"),
            ],
        );
        assert_eq!(tour.resolve_step(&"second".into()), Ok(1));
        assert_eq!(tour.resolve_step(&StepRef::Index(7)), Ok(7));
        assert_eq!(
            tour.resolve_step(&"missing-id".into()),
            Err(TourError::StepNotFound {
                id: "missing-id".to_string()
            })
        );
    }

    #[test]
    fn deserializes_legacy_field_names() {
        let json = r##"{
            "tour": "legacy",
            "steps": [{
                "id": "s1",
                "selector": "#profile",
                "clickElementOnNext": "#open-menu",
                "side": {"default": "top", "md": "right"},
                "nextRoute": "/profile",
                "interactable": true
            }]
        }"##;
        let tour: Tour = serde_json::from_str(json).unwrap();
        assert_eq!(tour.id.as_str(), "legacy");
        let step = &tour.steps[0];
        assert_eq!(step.click_on_next.as_deref(), Some("#open-menu"));
        assert_eq!(step.next_route.as_deref(), Some("/profile"));
        assert_eq!(step.route, None);
        assert!(step.interactable);
        assert!(step.show_controls);
        assert_eq!(step.pointer_padding(), DEFAULT_POINTER_PADDING);
        assert_eq!(tour.warnings().len(), 1);
    }

    #[test]
    fn content_is_passed_through_as_json() {
        let json = r##"[
            {"content": "Plain text"},
            {"content": {"video": "intro.mp4", "autoplay": false}},
            {"prevRoute": "/home"}
        ]"##;
        let steps: Vec<Step> = serde_json::from_str(json).unwrap();
        assert_eq!(steps[0].content, serde_json::json!("Plain text"));
        assert_eq!(steps[1].content["video"], "intro.mp4");
        assert!(steps[2].content.is_null());
        assert_eq!(steps[2].route, None);
        let tour = Tour::new("media", steps);
        assert_eq!(tour.warnings().len(), 1);
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let tour = Tour::new(
            "dupes",
            vec![Step::informational().id("a"), Step::informational().id("a")],
        );
        let warnings = tour.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("duplicate step id `a`"));
    }
}
