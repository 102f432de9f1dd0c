//! Sides, alignments, and the placement descriptor they parse into.
//!
//! Steps name the side of the target their card should sit on with short
//! strings: the four primary sides (`top`, `right`, `bottom`, `left`) or a
//! primary side plus a corner (`top-left`, `right-bottom`, ...). Corner names
//! map onto `start`/`end` relative to the primary axis, so `top-left` is the
//! top side aligned to the start of the horizontal axis.
//!
//! Hosts may register extra named sides (`extendSides`) that resolve to a
//! built-in placement plus an optional extra offset.

use crate::breakpoint::Breakpoints;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Side name used when a step declares nothing.
pub const DEFAULT_SIDE: &str = "bottom";

/// Key of the breakpoint-independent entry in a side map.
pub const DEFAULT_KEY: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Side {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top" => Some(Side::Top),
            "right" => Some(Side::Right),
            "bottom" => Some(Side::Bottom),
            "left" => Some(Side::Left),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// The axis the card is pushed along when placed on this side.
    pub fn axis(self) -> Axis {
        match self {
            Side::Top | Side::Bottom => Axis::Y,
            Side::Left | Side::Right => Axis::X,
        }
    }

    /// Top and left sit on the coordinate origin side of their axis.
    pub fn is_origin(self) -> bool {
        matches!(self, Side::Top | Side::Left)
    }

    /// Unit direction pointing away from the reference: `-1.0` for
    /// origin sides, `+1.0` otherwise.
    pub fn outward(self) -> f64 {
        if self.is_origin() { -1.0 } else { 1.0 }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Start,
    #[default]
    Center,
    End,
}

/// A primary side plus an alignment along the perpendicular axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub side: Side,
    pub alignment: Alignment,
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Side::Bottom, Alignment::Center)
    }
}

impl Placement {
    pub const fn new(side: Side, alignment: Alignment) -> Self {
        Self { side, alignment }
    }

    /// Parse a built-in side name. Accepts the four primary sides, the
    /// corner compounds (`top-left`, `left-bottom`, ...) and the
    /// `side-start` / `side-end` spelling.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(side) = Side::parse(s) {
            return Some(Self::new(side, Alignment::Center));
        }
        let (primary, corner) = s.split_once('-')?;
        let side = Side::parse(primary)?;
        let alignment = match corner {
            "left" | "top" | "start" => Alignment::Start,
            "right" | "bottom" | "end" => Alignment::End,
            _ => return None,
        };
        Some(Self::new(side, alignment))
    }

    /// Same alignment on the opposite side.
    pub fn opposite(self) -> Self {
        Self::new(self.side.opposite(), self.alignment)
    }

    /// Render back into the corner spelling used by step definitions.
    pub fn to_side_name(self) -> String {
        let corner = match (self.side.axis(), self.alignment) {
            (_, Alignment::Center) => return self.side.as_str().to_string(),
            (Axis::Y, Alignment::Start) => "left",
            (Axis::Y, Alignment::End) => "right",
            (Axis::X, Alignment::Start) => "top",
            (Axis::X, Alignment::End) => "bottom",
        };
        format!("{}-{}", self.side, corner)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_side_name())
    }
}

/// A host-defined named side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSide {
    /// Built-in side name this custom side places like.
    pub placement: String,
    /// Added to the base card offset.
    #[serde(default)]
    pub offset: Option<f64>,
}

/// Outcome of resolving a side name against built-ins and custom sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSide {
    pub placement: Placement,
    pub extra_offset: f64,
}

/// Resolve a side name. Custom sides win over built-ins of the same name;
/// anything unparseable falls back to `bottom`.
pub fn resolve_side(name: &str, custom: &HashMap<String, CustomSide>) -> ResolvedSide {
    if let Some(side) = custom.get(name) {
        return ResolvedSide {
            placement: parse_or_default(&side.placement),
            extra_offset: side.offset.unwrap_or(0.0),
        };
    }
    ResolvedSide {
        placement: parse_or_default(name),
        extra_offset: 0.0,
    }
}

fn parse_or_default(name: &str) -> Placement {
    Placement::parse(name).unwrap_or_else(|| {
        log::warn!("unknown side `{name}`, placing at {DEFAULT_SIDE}");
        Placement::default()
    })
}

/// Per-step side preference: a default side plus breakpoint overrides.
///
/// Deserializes from either a bare side string (`"top"`) or a map keyed by
/// breakpoint name (`{"default": "bottom", "md": "right"}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SideRepr", into = "SideRepr")]
pub struct SidePreference {
    pub default: Option<String>,
    pub by_breakpoint: SmallVec<[(String, String); 4]>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SideRepr {
    Single(String),
    Map(BTreeMap<String, String>),
}

impl From<SideRepr> for SidePreference {
    fn from(repr: SideRepr) -> Self {
        match repr {
            SideRepr::Single(side) => SidePreference::uniform(&side),
            SideRepr::Map(map) => {
                let mut pref = SidePreference::default();
                for (key, side) in map {
                    if key == DEFAULT_KEY {
                        pref.default = Some(side);
                    } else {
                        pref.by_breakpoint.push((key, side));
                    }
                }
                pref
            }
        }
    }
}

impl From<SidePreference> for SideRepr {
    fn from(pref: SidePreference) -> Self {
        let mut map: BTreeMap<String, String> = pref.by_breakpoint.into_iter().collect();
        if let Some(default) = pref.default {
            map.insert(DEFAULT_KEY.to_string(), default);
        }
        SideRepr::Map(map)
    }
}

impl SidePreference {
    /// Same side at every width.
    pub fn uniform(side: &str) -> Self {
        Self {
            default: Some(side.to_string()),
            by_breakpoint: SmallVec::new(),
        }
    }

    /// Builder: add a breakpoint override.
    pub fn at(mut self, breakpoint: &str, side: &str) -> Self {
        self.by_breakpoint
            .push((breakpoint.to_string(), side.to_string()));
        self
    }

    /// Side name in effect at `width`, mobile-first.
    ///
    /// Starts from the default (or `bottom`) and walks the overrides in
    /// ascending threshold order, applying each whose threshold is at most
    /// `width` and stopping at the first larger one. Unknown breakpoint
    /// names count as threshold 0.
    pub fn resolve(&self, breakpoints: &Breakpoints, width: f64) -> &str {
        let mut side = self.default.as_deref().unwrap_or(DEFAULT_SIDE);

        let mut entries: SmallVec<[(f64, &str); 4]> = self
            .by_breakpoint
            .iter()
            .map(|(key, side)| (breakpoints.threshold(key).unwrap_or(0.0), side.as_str()))
            .collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (threshold, candidate) in entries {
            if width >= threshold {
                side = candidate;
            } else {
                break;
            }
        }
        side
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_primary_and_corner_sides() {
        assert_eq!(
            Placement::parse("top"),
            Some(Placement::new(Side::Top, Alignment::Center))
        );
        assert_eq!(
            Placement::parse("top-left"),
            Some(Placement::new(Side::Top, Alignment::Start))
        );
        assert_eq!(
            Placement::parse("bottom-right"),
            Some(Placement::new(Side::Bottom, Alignment::End))
        );
        assert_eq!(
            Placement::parse("left-top"),
            Some(Placement::new(Side::Left, Alignment::Start))
        );
        assert_eq!(
            Placement::parse("right-bottom"),
            Some(Placement::new(Side::Right, Alignment::End))
        );
        assert_eq!(
            Placement::parse("right-end"),
            Some(Placement::new(Side::Right, Alignment::End))
        );
        assert_eq!(Placement::parse("diagonal"), None);
        assert_eq!(Placement::parse("top-middle"), None);
    }

    #[test]
    fn side_names_roundtrip_through_placement() {
        for name in [
            "top",
            "bottom",
            "left",
            "right",
            "top-left",
            "top-right",
            "bottom-left",
            "bottom-right",
            "left-top",
            "left-bottom",
            "right-top",
            "right-bottom",
        ] {
            assert_eq!(Placement::parse(name).unwrap().to_side_name(), name);
        }
    }

    #[test]
    fn opposite_keeps_alignment() {
        let p = Placement::parse("top-left").unwrap();
        assert_eq!(p.opposite().to_side_name(), "bottom-left");
    }

    #[test]
    fn custom_side_resolves_to_builtin() {
        let mut custom = HashMap::new();
        custom.insert(
            "under-wide".to_string(),
            CustomSide {
                placement: "bottom-left".to_string(),
                offset: Some(10.0),
            },
        );
        let resolved = resolve_side("under-wide", &custom);
        assert_eq!(resolved.placement.to_side_name(), "bottom-left");
        assert_eq!(resolved.extra_offset, 10.0);

        let fallback = resolve_side("nonsense", &custom);
        assert_eq!(fallback.placement, Placement::default());
    }

    #[test]
    fn preference_is_mobile_first() {
        let bps = Breakpoints::default();
        let pref = SidePreference::uniform("bottom")
            .at("lg", "left")
            .at("md", "right");

        assert_eq!(pref.resolve(&bps, 375.0), "bottom");
        assert_eq!(pref.resolve(&bps, 800.0), "right");
        assert_eq!(pref.resolve(&bps, 1024.0), "left");
        assert_eq!(pref.resolve(&bps, 1920.0), "left");
    }

    #[test]
    fn preference_without_default_falls_back_to_bottom() {
        let bps = Breakpoints::default();
        let pref = SidePreference::default().at("xl", "top");
        assert_eq!(pref.resolve(&bps, 600.0), "bottom");
        assert_eq!(pref.resolve(&bps, 1300.0), "top");
    }

    #[test]
    fn preference_deserializes_from_string_or_map() {
        let single: SidePreference = serde_json::from_str(r#""right-top""#).unwrap();
        assert_eq!(single.default.as_deref(), Some("right-top"));

        let map: SidePreference =
            serde_json::from_str(r#"{"default": "top", "sm": "left"}"#).unwrap();
        assert_eq!(map.default.as_deref(), Some("top"));
        assert_eq!(map.by_breakpoint.len(), 1);
        assert_eq!(map.by_breakpoint[0], ("sm".to_string(), "left".to_string()));
    }
}
