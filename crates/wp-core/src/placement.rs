//! Adaptive card placement.
//!
//! Computes where the floating card (and its arrow) sits relative to the
//! highlighted target, keeping it inside the viewport:
//!
//! 1. Place on the preferred side, pushed out by `offset`.
//! 2. If the preferred side lacks room, try the direct opposite side only
//!    (never the lateral ones). When neither fits, the side with the smaller
//!    overflow wins.
//! 3. Shift on both axes to stay `padding` inside the viewport, limited so
//!    the card never detaches from the target.
//! 4. Cap the card size to the viewport minus padding.
//! 5. Position the arrow along the edge facing the target.
//!
//! All geometry is in viewport coordinates; `Strategy::Absolute` results are
//! translated into document coordinates by the caller-supplied scroll offset.

use crate::error::PlacementError;
use crate::side::{Alignment, Axis, Placement, Side};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Positioning strategy of the card element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Document coordinates (scrolls with the page).
    #[default]
    Absolute,
    /// Viewport coordinates.
    Fixed,
}

/// Tunables of the placement engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementOptions {
    /// Gap between target and card.
    pub offset: f64,
    /// Minimum distance between card and viewport edge.
    pub padding: f64,
    /// Minimum distance between arrow and card corner.
    pub arrow_padding: f64,
    /// Arrow distance from the card edge for start/end alignments.
    pub arrow_inset: f64,
    pub strategy: Strategy,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            offset: 15.0,
            padding: 8.0,
            arrow_padding: 8.0,
            arrow_inset: 10.0,
            strategy: Strategy::Absolute,
        }
    }
}

/// Everything the engine reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInput {
    /// Target box, viewport-relative.
    pub reference: Option<Rect>,
    /// Card size.
    pub floating: Option<Size>,
    pub arrow: Option<Size>,
    pub preferred: Placement,
    pub viewport: Size,
    /// Document scroll offset, used for `Strategy::Absolute`.
    pub scroll: Vec2,
    /// Added to `PlacementOptions::offset` (custom sides).
    pub extra_offset: f64,
}

/// Arrow position on the card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowPlacement {
    /// Card edge the arrow sits on (opposite of the effective side).
    pub edge: Side,
    /// Degrees, for an arrow drawn pointing right.
    pub rotation: f64,
    /// Distance of the arrow's leading edge from the start of `edge`.
    pub offset: f64,
    /// Offset that points the arrow at the target's center.
    pub anchor_offset: f64,
}

/// Upper bounds for the card box when it would not fit otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

/// Computed card position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResult {
    pub x: f64,
    pub y: f64,
    pub strategy: Strategy,
    /// Placement after flipping.
    pub placement: Placement,
    pub flipped: bool,
    pub arrow: Option<ArrowPlacement>,
    pub constraints: SizeConstraints,
    pub reference: Size,
}

impl PlacementResult {
    /// Effective side in step-definition spelling (`top-left`, ...).
    pub fn effective_side(&self) -> String {
        self.placement.to_side_name()
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Compute the card position. `Ok(None)` when the target or card is absent.
pub fn compute_placement(
    input: &PlacementInput,
    options: &PlacementOptions,
) -> Result<Option<PlacementResult>, PlacementError> {
    let (Some(reference), Some(floating)) = (input.reference, input.floating) else {
        return Ok(None);
    };
    validate(input, reference, floating)?;

    let offset = options.offset + input.extra_offset;
    let padding = options.padding;
    let viewport = input.viewport;

    let preferred = input.preferred;
    let fits = has_space_for(reference, floating, viewport, preferred.side, offset, padding);

    let mut placement = preferred;
    let mut flipped = false;
    if !fits {
        let opposite = preferred.opposite();
        let here = main_overflow(
            place(reference, floating, preferred, offset),
            floating,
            viewport,
            preferred.side,
            padding,
        );
        let there = main_overflow(
            place(reference, floating, opposite, offset),
            floating,
            viewport,
            opposite.side,
            padding,
        );
        if here > 0.0 && there < here {
            placement = opposite;
            flipped = true;
        }
    }

    let base = place(reference, floating, placement, offset);
    let origin = shift(base, reference, floating, viewport, placement.side, offset, padding);

    let constraints = SizeConstraints {
        max_width: (floating.width > viewport.width - padding * 2.0)
            .then(|| (viewport.width - padding * 2.0).max(0.0)),
        max_height: (floating.height > viewport.height - padding * 2.0)
            .then(|| (viewport.height - padding * 2.0).max(0.0)),
    };

    let arrow = input
        .arrow
        .map(|arrow| place_arrow(arrow, reference, floating, origin, placement, options));

    let origin = match options.strategy {
        Strategy::Absolute => origin + input.scroll,
        Strategy::Fixed => origin,
    };

    Ok(Some(PlacementResult {
        x: origin.x,
        y: origin.y,
        strategy: options.strategy,
        placement,
        flipped,
        arrow,
        constraints,
        reference: reference.size(),
    }))
}

fn validate(input: &PlacementInput, reference: Rect, floating: Size) -> Result<(), PlacementError> {
    let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
    if !finite(&[reference.x0, reference.y0, reference.x1, reference.y1]) {
        return Err(PlacementError::NonFinite { what: "target" });
    }
    if !finite(&[floating.width, floating.height]) {
        return Err(PlacementError::NonFinite { what: "card" });
    }
    if !finite(&[input.viewport.width, input.viewport.height, input.scroll.x, input.scroll.y]) {
        return Err(PlacementError::NonFinite { what: "viewport" });
    }
    if let Some(arrow) = input.arrow
        && !finite(&[arrow.width, arrow.height])
    {
        return Err(PlacementError::NonFinite { what: "arrow" });
    }
    if floating.width < 0.0 || floating.height < 0.0 {
        return Err(PlacementError::NegativeSize { what: "card" });
    }
    if let Some(arrow) = input.arrow
        && (arrow.width < 0.0 || arrow.height < 0.0)
    {
        return Err(PlacementError::NegativeSize { what: "arrow" });
    }
    Ok(())
}

/// Whether the card fits between the target and the viewport edge on `side`
/// without any repositioning.
fn has_space_for(
    reference: Rect,
    floating: Size,
    viewport: Size,
    side: Side,
    offset: f64,
    padding: f64,
) -> bool {
    match side {
        Side::Top => reference.y0 - offset - padding >= floating.height,
        Side::Right => viewport.width - (reference.x1 + offset + padding) >= floating.width,
        Side::Bottom => viewport.height - (reference.y1 + offset + padding) >= floating.height,
        Side::Left => reference.x0 - offset - padding >= floating.width,
    }
}

/// Card origin for a placement, before shifting.
fn place(reference: Rect, floating: Size, placement: Placement, offset: f64) -> Point {
    let center = reference.center();
    let cx = center.x - floating.width / 2.0;
    let cy = center.y - floating.height / 2.0;

    let mut origin = match placement.side {
        Side::Top => Point::new(cx, reference.y0 - floating.height - offset),
        Side::Bottom => Point::new(cx, reference.y1 + offset),
        Side::Right => Point::new(reference.x1 + offset, cy),
        Side::Left => Point::new(reference.x0 - floating.width - offset, cy),
    };

    match (placement.side.axis(), placement.alignment) {
        (_, Alignment::Center) => {}
        (Axis::Y, Alignment::Start) => origin.x = reference.x0,
        (Axis::Y, Alignment::End) => origin.x = reference.x1 - floating.width,
        (Axis::X, Alignment::Start) => origin.y = reference.y0,
        (Axis::X, Alignment::End) => origin.y = reference.y1 - floating.height,
    }
    origin
}

/// How far the card pokes past the padded viewport edge on `side`.
/// Positive means overflow.
fn main_overflow(origin: Point, floating: Size, viewport: Size, side: Side, padding: f64) -> f64 {
    match side {
        Side::Top => padding - origin.y,
        Side::Left => padding - origin.x,
        Side::Bottom => origin.y + floating.height - (viewport.height - padding),
        Side::Right => origin.x + floating.width - (viewport.width - padding),
    }
}

/// Clamp `value` into `[min, max]`, preferring `min` when the range is empty.
fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if max < min { min } else { value.clamp(min, max) }
}

/// Keep the card inside the viewport on both axes. Each axis shift is
/// limited so the card stays attached to the target.
fn shift(
    origin: Point,
    reference: Rect,
    floating: Size,
    viewport: Size,
    side: Side,
    offset: f64,
    padding: f64,
) -> Point {
    // Alignment axis: the one perpendicular to the side.
    let (align, align_len, ref_start, ref_end, view_len) = match side.axis() {
        Axis::Y => (origin.x, floating.width, reference.x0, reference.x1, viewport.width),
        Axis::X => (origin.y, floating.height, reference.y0, reference.y1, viewport.height),
    };
    let align = clamp_range(align, padding, view_len - padding - align_len);
    let align = clamp_range(align, ref_start - align_len + padding, ref_end - padding);

    // Side axis: the one the offset pushes along.
    let (push, push_len, side_start, side_end, view_len) = match side.axis() {
        Axis::Y => (origin.y, floating.height, reference.y0, reference.y1, viewport.height),
        Axis::X => (origin.x, floating.width, reference.x0, reference.x1, viewport.width),
    };
    let applied = offset * side.outward();
    let (limit_min, limit_max) = if side.is_origin() {
        (side_start - push_len + applied, side_end - padding)
    } else {
        (side_start - push_len + padding, side_end + applied)
    };
    let push = clamp_range(push, padding, view_len - padding - push_len);
    let push = clamp_range(push, limit_min, limit_max);

    match side.axis() {
        Axis::Y => Point::new(align, push),
        Axis::X => Point::new(push, align),
    }
}

fn place_arrow(
    arrow: Size,
    reference: Rect,
    floating: Size,
    origin: Point,
    placement: Placement,
    options: &PlacementOptions,
) -> ArrowPlacement {
    let (edge_len, arrow_len, ref_center, card_start) = match placement.side.axis() {
        Axis::Y => (floating.width, arrow.width, reference.center().x, origin.x),
        Axis::X => (floating.height, arrow.height, reference.center().y, origin.y),
    };

    let offset = match placement.alignment {
        Alignment::Center => edge_len / 2.0 - arrow_len / 2.0,
        Alignment::Start => options.arrow_inset,
        Alignment::End => edge_len - options.arrow_inset - arrow_len,
    };

    let anchor_offset = clamp_range(
        ref_center - card_start - arrow_len / 2.0,
        options.arrow_padding,
        edge_len - arrow_len - options.arrow_padding,
    );

    let rotation = match placement.side {
        Side::Top => 90.0,
        Side::Right => 180.0,
        Side::Bottom => 270.0,
        Side::Left => 0.0,
    };

    ArrowPlacement {
        edge: placement.side.opposite(),
        rotation,
        offset,
        anchor_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEW: Size = Size::new(1024.0, 768.0);

    fn input(reference: Rect, preferred: &str) -> PlacementInput {
        PlacementInput {
            reference: Some(reference),
            floating: Some(Size::new(300.0, 150.0)),
            arrow: None,
            preferred: Placement::parse(preferred).unwrap(),
            viewport: VIEW,
            scroll: Vec2::ZERO,
            extra_offset: 0.0,
        }
    }

    fn fixed() -> PlacementOptions {
        PlacementOptions {
            strategy: Strategy::Fixed,
            ..PlacementOptions::default()
        }
    }

    #[test]
    fn missing_elements_yield_none() {
        let mut req = input(Rect::new(0.0, 0.0, 10.0, 10.0), "bottom");
        req.floating = None;
        assert_eq!(compute_placement(&req, &fixed()), Ok(None));
        req.floating = Some(Size::new(10.0, 10.0));
        req.reference = None;
        assert_eq!(compute_placement(&req, &fixed()), Ok(None));
    }

    #[test]
    fn bottom_center_with_room() {
        let target = Rect::new(400.0, 100.0, 500.0, 140.0);
        let result = compute_placement(&input(target, "bottom"), &fixed())
            .unwrap()
            .unwrap();
        assert_eq!(result.effective_side(), "bottom");
        assert!(!result.flipped);
        assert_eq!(result.x, 450.0 - 150.0);
        assert_eq!(result.y, 140.0 + 15.0);
    }

    #[test]
    fn start_and_end_alignments() {
        let target = Rect::new(400.0, 100.0, 500.0, 140.0);
        let start = compute_placement(&input(target, "bottom-left"), &fixed())
            .unwrap()
            .unwrap();
        assert_eq!(start.x, 400.0);

        let end = compute_placement(&input(target, "bottom-right"), &fixed())
            .unwrap()
            .unwrap();
        assert_eq!(end.x, 500.0 - 300.0);
    }

    #[test]
    fn top_flips_to_bottom_near_viewport_top() {
        let target = Rect::new(400.0, 0.0, 500.0, 40.0);
        let result = compute_placement(&input(target, "top"), &fixed())
            .unwrap()
            .unwrap();
        assert_eq!(result.effective_side(), "bottom");
        assert!(result.flipped);
        assert_eq!(result.y, 55.0);
    }

    #[test]
    fn flip_never_rotates_to_lateral_sides() {
        // Tall target filling the height: neither top nor bottom fits.
        let target = Rect::new(100.0, 10.0, 200.0, 760.0);
        let result = compute_placement(&input(target, "top-left"), &fixed())
            .unwrap()
            .unwrap();
        assert!(matches!(result.placement.side, Side::Top | Side::Bottom));
        assert_eq!(result.placement.alignment, Alignment::Start);
    }

    #[test]
    fn shift_keeps_card_inside_viewport() {
        // Target hugging the left edge: centered card would start at x < 0.
        let target = Rect::new(0.0, 300.0, 40.0, 340.0);
        let result = compute_placement(&input(target, "bottom"), &fixed())
            .unwrap()
            .unwrap();
        assert_eq!(result.x, 8.0);
        assert_eq!(result.effective_side(), "bottom");
    }

    #[test]
    fn shift_is_limited_to_stay_attached() {
        // Target just off the right edge: the card may not slide so far left
        // that it no longer overlaps the target's horizontal span.
        let target = Rect::new(1100.0, 300.0, 1140.0, 340.0);
        let result = compute_placement(&input(target, "bottom"), &fixed())
            .unwrap()
            .unwrap();
        assert_eq!(result.x, 1100.0 - 300.0 + 8.0);
    }

    #[test]
    fn oversized_card_is_constrained() {
        let mut req = input(Rect::new(400.0, 100.0, 500.0, 140.0), "bottom");
        req.floating = Some(Size::new(2000.0, 150.0));
        let result = compute_placement(&req, &fixed()).unwrap().unwrap();
        assert_eq!(result.constraints.max_width, Some(1024.0 - 16.0));
        assert_eq!(result.constraints.max_height, None);
    }

    #[test]
    fn absolute_strategy_adds_scroll() {
        let mut req = input(Rect::new(400.0, 100.0, 500.0, 140.0), "bottom");
        req.scroll = Vec2::new(0.0, 1200.0);
        let result = compute_placement(&req, &PlacementOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(result.strategy, Strategy::Absolute);
        assert_eq!(result.y, 1200.0 + 155.0);
    }

    #[test]
    fn extra_offset_pushes_card_further() {
        let mut req = input(Rect::new(400.0, 100.0, 500.0, 140.0), "bottom");
        req.extra_offset = 10.0;
        let result = compute_placement(&req, &fixed()).unwrap().unwrap();
        assert_eq!(result.y, 165.0);
    }

    #[test]
    fn arrow_offsets_follow_alignment() {
        let target = Rect::new(400.0, 100.0, 500.0, 140.0);
        let mut req = input(target, "bottom");
        req.arrow = Some(Size::new(24.0, 24.0));

        let center = compute_placement(&req, &fixed()).unwrap().unwrap();
        let arrow = center.arrow.unwrap();
        assert_eq!(arrow.edge, Side::Top);
        assert_eq!(arrow.rotation, 270.0);
        assert_eq!(arrow.offset, 150.0 - 12.0);
        assert_eq!(arrow.anchor_offset, 150.0 - 12.0);

        req.preferred = Placement::parse("bottom-left").unwrap();
        let start = compute_placement(&req, &fixed()).unwrap().unwrap();
        assert_eq!(start.arrow.unwrap().offset, 10.0);

        req.preferred = Placement::parse("bottom-right").unwrap();
        let end = compute_placement(&req, &fixed()).unwrap().unwrap();
        assert_eq!(end.arrow.unwrap().offset, 300.0 - 10.0 - 24.0);
    }

    #[test]
    fn non_finite_geometry_is_an_error() {
        let req = input(Rect::new(f64::NAN, 0.0, 10.0, 10.0), "bottom");
        assert_eq!(
            compute_placement(&req, &fixed()),
            Err(PlacementError::NonFinite { what: "target" })
        );
    }

    #[test]
    fn non_finite_arrow_is_an_error() {
        let mut req = input(Rect::new(400.0, 300.0, 500.0, 340.0), "bottom");
        req.arrow = Some(Size::new(f64::NAN, f64::NAN));
        assert_eq!(
            compute_placement(&req, &fixed()),
            Err(PlacementError::NonFinite { what: "arrow" })
        );
    }
}
