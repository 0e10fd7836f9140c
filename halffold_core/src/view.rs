// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layered-view contract and the half-fold flip view.
//!
//! A layered view owns a [`FrameStack`], knows how many logical parts one
//! animation cycle has, and slices a source content rectangle into that many
//! strips. During a flip the delegate calls
//! [`rearrange_layers`](LayeredView::rearrange_layers) at defined progress
//! steps; the view recomputes which physical layer occupies which visual slot
//! so the correct face is always shown.
//!
//! [`FlipView`] is the two-part half-fold specialization: one frame per half,
//! each with a primary layer and a once-created shadow sublayer. Because a
//! layer rotated past 90° must display the *adjacent* frame's content, the
//! midpoint step substitutes content directly instead of relying on the
//! compositor's double-sided rendering (which flickers).

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::delegate::Direction;
use crate::frame::{Frame, FrameStack};
use crate::layer::{Facing, FlipLayer, LayerContent, Rgba, Shadow, SurfaceId};
use crate::transform::{RotationAxis, Transform3d};

/// Which way the view folds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipOrientation {
    /// Fold around the horizontal midline; parts stack top to bottom.
    Vertical,
    /// Fold around the vertical midline; parts sit left to right.
    Horizontal,
}

impl FlipOrientation {
    /// The axis a folding layer rotates around for this orientation.
    #[inline]
    #[must_use]
    pub const fn rotation_axis(self) -> RotationAxis {
        match self {
            Self::Vertical => RotationAxis::X,
            Self::Horizontal => RotationAxis::Y,
        }
    }
}

/// The discrete steps of one flip cycle at which layers are rearranged.
///
/// The positions of [`Midpoint`](Self::Midpoint) and
/// [`Settle`](Self::Settle) within the progress range are configurable on
/// the delegate; the steps themselves are fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlipStep {
    /// The fold starts: fold frame to front, shadows on, content backed up.
    Begin,
    /// The fold crosses the line of sight: facing flips, content is
    /// substituted, stack order reverses.
    Midpoint,
    /// The fold nears rest: shadow fade-out begins.
    Settle,
    /// The cycle is done: content restored, everything back to rest.
    Complete,
}

/// Per-update record of what rearrangement touched, drained by a presenter.
///
/// Part numbers index the view's logical parts, not stack positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlipChanges {
    /// Stack order changed.
    pub order_changed: bool,
    /// Parts whose primary content was substituted or restored.
    pub content: Vec<usize>,
    /// Parts whose primary transform changed.
    pub transforms: Vec<usize>,
    /// Parts whose shadow visibility or opacity changed.
    pub shadows: Vec<usize>,
    /// Everything was reset to rest (completion or interrupt recovery).
    pub reset: bool,
}

impl FlipChanges {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.order_changed
            && !self.reset
            && self.content.is_empty()
            && self.transforms.is_empty()
            && self.shadows.is_empty()
    }
}

/// Slices `bounds` into `parts` equal strips.
///
/// Vertical orientation produces top-to-bottom strips, horizontal produces
/// left-to-right strips. This is the generic `part count` contract; the
/// half-fold view uses exactly two parts.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn slice_regions(orientation: FlipOrientation, bounds: Rect, parts: usize) -> Vec<Rect> {
    assert!(parts > 0, "cannot slice into zero parts");
    let n = parts as f64;
    let mut regions = Vec::with_capacity(parts);
    for i in 0..parts {
        let t0 = i as f64 / n;
        let t1 = (i + 1) as f64 / n;
        let region = match orientation {
            FlipOrientation::Vertical => Rect::new(
                bounds.x0,
                bounds.y0 + bounds.height() * t0,
                bounds.x1,
                bounds.y0 + bounds.height() * t1,
            ),
            FlipOrientation::Horizontal => Rect::new(
                bounds.x0 + bounds.width() * t0,
                bounds.y0,
                bounds.x0 + bounds.width() * t1,
                bounds.y1,
            ),
        };
        regions.push(region);
    }
    regions
}

/// Resolves what a back-facing fold layer must present.
///
/// A layer past 90° shows the adjacent part's content: the next part in
/// stack order for a forward flip, the previous for a backward flip. Pure in
/// `(fold_part, direction, stack contents)`.
///
/// # Panics
///
/// Panics if `direction` is [`Direction::None`] or the adjacent frame is
/// missing from the stack.
#[must_use]
pub fn resolve_content(
    stack: &FrameStack,
    fold_part: usize,
    part_count: usize,
    direction: Direction,
) -> LayerContent {
    let adjacent = match direction {
        Direction::Forward => (fold_part + 1) % part_count,
        Direction::Backward => (fold_part + part_count - 1) % part_count,
        Direction::None => panic!("content resolution requires a direction"),
    };
    stack.frame(adjacent).primary().content
}

/// The contract between an animation delegate and the view it drives.
pub trait LayeredView {
    /// Number of logical parts in one animation cycle.
    fn part_count(&self) -> usize;

    /// The view's bounding rectangle.
    fn bounds(&self) -> Rect;

    /// The axis fold transforms rotate around.
    fn rotation_axis(&self) -> RotationAxis;

    /// The frame stack, back to front.
    fn stack(&self) -> &FrameStack;

    /// Which part folds when traveling in `direction`.
    ///
    /// # Panics
    ///
    /// Implementations panic when `direction` is [`Direction::None`].
    fn fold_part(&self, direction: Direction) -> usize;

    /// Layer factory: builds a layer for `region` with the view's corner
    /// radius and double-sided settings applied.
    fn layer_with_frame(&self, region: Rect, content: LayerContent) -> FlipLayer;

    /// Recomputes the physical arrangement for `step` of a flip traveling in
    /// `direction`. Applying the same `(direction, step)` twice without an
    /// intervening step change is a no-op.
    ///
    /// # Panics
    ///
    /// Panics when `direction` is [`Direction::None`].
    fn rearrange_layers(&mut self, direction: Direction, step: FlipStep);

    /// Applies a transform to the folding layer for `direction`.
    fn set_fold_transform(&mut self, direction: Direction, transform: Transform3d);

    /// Content-replacement hook: re-slices `content` across all parts.
    ///
    /// This is the seam where a ticker prints its next face; rendering text
    /// into a surface is outside the core.
    fn replace_content(&mut self, content: LayerContent);

    /// Restores the rest arrangement after an interrupted gesture: backed-up
    /// content, facings, transforms, shadows, and canonical stack order.
    fn restore_interrupted(&mut self);

    /// Whether shadow sublayers are animated during a flip.
    fn set_shadow_animation(&mut self, enabled: bool);
}

/// The two-part half-fold flip view.
#[derive(Clone, Debug)]
pub struct FlipView {
    orientation: FlipOrientation,
    bounds: Rect,
    corner_radius: f64,
    animate_shadows: bool,
    stack: FrameStack,
    overlay: Option<FlipLayer>,
    backup: Option<LayerContent>,
    last_step: Option<(Direction, FlipStep)>,
    changes: FlipChanges,
}

impl FlipView {
    /// Number of logical parts in a half fold.
    pub const PART_COUNT: usize = 2;

    /// Stacking position of an overlay layer, above every animation layer.
    pub const OVERLAY_Z: f64 = 1000.0;

    /// Solid fill used when no source surface exists.
    pub const FALLBACK_COLOR: Rgba = Rgba::rgb(0.33, 0.33, 0.33);

    /// Creates a half-fold view over `bounds`, slicing `content` into two
    /// half frames.
    #[must_use]
    pub fn new(
        orientation: FlipOrientation,
        bounds: Rect,
        content: LayerContent,
        corner_radius: f64,
    ) -> Self {
        let mut view = Self {
            orientation,
            bounds,
            corner_radius,
            animate_shadows: true,
            stack: FrameStack::new(),
            overlay: None,
            backup: None,
            last_step: None,
            changes: FlipChanges::default(),
        };
        for (part, region) in slice_regions(orientation, bounds, Self::PART_COUNT)
            .into_iter()
            .enumerate()
        {
            let layer = view.layer_with_frame(region, content.restricted_to(region));
            view.stack.push(Frame::new(part, vec![layer]));
        }
        view
    }

    /// Creates a half-fold view from an optional source surface, falling
    /// back to [`FALLBACK_COLOR`](Self::FALLBACK_COLOR) when absent.
    #[must_use]
    pub fn from_surface(
        orientation: FlipOrientation,
        bounds: Rect,
        surface: Option<SurfaceId>,
        corner_radius: f64,
    ) -> Self {
        let content = match surface {
            Some(surface) => LayerContent::Slice {
                surface,
                region: bounds,
            },
            None => LayerContent::Solid(Self::FALLBACK_COLOR),
        };
        Self::new(orientation, bounds, content, corner_radius)
    }

    /// The view's orientation.
    #[must_use]
    pub const fn orientation(&self) -> FlipOrientation {
        self.orientation
    }

    /// Installs a static layer above all animation layers.
    ///
    /// The overlay has a fixed stacking position and is never touched by
    /// rearrangement.
    pub fn add_overlay(&mut self, content: LayerContent) {
        let mut layer = self.layer_with_frame(self.bounds, content);
        layer.double_sided = false;
        layer.z_position = Self::OVERLAY_Z;
        self.overlay = Some(layer);
    }

    /// The overlay layer, if one was added.
    #[must_use]
    pub fn overlay(&self) -> Option<&FlipLayer> {
        self.overlay.as_ref()
    }

    /// Drains the accumulated change record.
    pub fn take_changes(&mut self) -> FlipChanges {
        core::mem::take(&mut self.changes)
    }

    fn other_part(fold: usize) -> usize {
        (fold + 1) % Self::PART_COUNT
    }

    /// Returns every part's shadow to `visible` with the given opacity.
    fn set_shadows(&mut self, visible: bool, opacity: f64) {
        for part in 0..Self::PART_COUNT {
            let shadow = &mut self.stack.frame_mut(part).primary_mut().shadow;
            shadow.visible = visible;
            shadow.opacity = opacity;
            self.changes.shadows.push(part);
        }
    }

    /// Rest arrangement: backed-up content restored, layers at rest,
    /// canonical back-to-front order `[0, 1]`.
    fn settle_to_rest(&mut self, fold: usize) {
        if let Some(content) = self.backup.take() {
            self.stack.frame_mut(fold).primary_mut().content = content;
            self.changes.content.push(fold);
        }
        for part in 0..Self::PART_COUNT {
            self.stack.frame_mut(part).primary_mut().reset_to_rest();
        }
        self.stack.send_to_front(Self::PART_COUNT - 1);
        self.last_step = None;
        self.changes.order_changed = true;
        self.changes.reset = true;
    }
}

impl LayeredView for FlipView {
    fn part_count(&self) -> usize {
        Self::PART_COUNT
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn rotation_axis(&self) -> RotationAxis {
        self.orientation.rotation_axis()
    }

    fn stack(&self) -> &FrameStack {
        &self.stack
    }

    fn fold_part(&self, direction: Direction) -> usize {
        match direction {
            // Forward folds the first part (top or left) over the second;
            // backward folds the second part back over the first.
            Direction::Forward => 0,
            Direction::Backward => 1,
            Direction::None => panic!("fold requires a direction"),
        }
    }

    fn layer_with_frame(&self, region: Rect, content: LayerContent) -> FlipLayer {
        FlipLayer::new(region, self.corner_radius, true, content)
    }

    fn rearrange_layers(&mut self, direction: Direction, step: FlipStep) {
        assert!(
            direction != Direction::None,
            "rearrangement requires a direction"
        );
        if self.last_step == Some((direction, step)) {
            return;
        }
        let fold = self.fold_part(direction);
        match step {
            FlipStep::Begin => {
                self.backup = Some(self.stack.frame(fold).primary().content);
                self.stack.frame_mut(fold).primary_mut().facing = Facing::Front;
                self.stack.send_to_front(fold);
                self.changes.order_changed = true;
                if self.animate_shadows {
                    self.set_shadows(true, Shadow::BASE_OPACITY);
                }
                self.last_step = Some((direction, step));
            }
            FlipStep::Midpoint => {
                if self.backup.is_none() {
                    self.backup = Some(self.stack.frame(fold).primary().content);
                }
                let substituted =
                    resolve_content(&self.stack, fold, Self::PART_COUNT, direction);
                let layer = self.stack.frame_mut(fold).primary_mut();
                layer.facing = Facing::Back;
                layer.content = substituted;
                self.changes.content.push(fold);
                self.stack.send_to_front(Self::other_part(fold));
                self.changes.order_changed = true;
                self.last_step = Some((direction, step));
            }
            FlipStep::Settle => {
                if self.animate_shadows {
                    self.set_shadows(true, 0.0);
                }
                self.last_step = Some((direction, step));
            }
            FlipStep::Complete => {
                self.settle_to_rest(fold);
            }
        }
    }

    fn set_fold_transform(&mut self, direction: Direction, transform: Transform3d) {
        let fold = self.fold_part(direction);
        self.stack.frame_mut(fold).primary_mut().transform = transform;
        self.changes.transforms.push(fold);
    }

    fn replace_content(&mut self, content: LayerContent) {
        for (part, region) in slice_regions(self.orientation, self.bounds, Self::PART_COUNT)
            .into_iter()
            .enumerate()
        {
            self.stack.frame_mut(part).primary_mut().content = content.restricted_to(region);
            self.changes.content.push(part);
        }
    }

    fn restore_interrupted(&mut self) {
        // Without a recorded step there is nothing to undo.
        let Some((direction, _)) = self.last_step else {
            return;
        };
        let fold = self.fold_part(direction);
        self.settle_to_rest(fold);
    }

    fn set_shadow_animation(&mut self, enabled: bool) {
        self.animate_shadows = enabled;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn view() -> FlipView {
        FlipView::from_surface(
            FlipOrientation::Vertical,
            Rect::new(0.0, 0.0, 100.0, 200.0),
            Some(SurfaceId(1)),
            4.0,
        )
    }

    #[test]
    fn slicing_produces_equal_strips() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 200.0);
        let vertical = slice_regions(FlipOrientation::Vertical, bounds, 2);
        assert_eq!(vertical, vec![
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(0.0, 100.0, 100.0, 200.0),
        ]);

        let horizontal = slice_regions(FlipOrientation::Horizontal, bounds, 4);
        assert_eq!(horizontal.len(), 4);
        assert_eq!(horizontal[0], Rect::new(0.0, 0.0, 25.0, 200.0));
        assert_eq!(horizontal[3], Rect::new(75.0, 0.0, 100.0, 200.0));
    }

    #[test]
    #[should_panic(expected = "cannot slice into zero parts")]
    fn zero_parts_panics() {
        let _ = slice_regions(
            FlipOrientation::Vertical,
            Rect::new(0.0, 0.0, 1.0, 1.0),
            0,
        );
    }

    #[test]
    fn construction_slices_source_into_two_frames() {
        let v = view();
        assert_eq!(v.stack().len(), 2);
        assert_eq!(v.stack().order(), vec![0, 1]);
        let top = v.stack().frame(0).primary();
        assert_eq!(top.content, LayerContent::Slice {
            surface: SurfaceId(1),
            region: Rect::new(0.0, 0.0, 100.0, 100.0),
        });
        assert!(!top.shadow.visible, "shadows start hidden");
    }

    #[test]
    fn missing_surface_falls_back_to_solid() {
        let v = FlipView::from_surface(
            FlipOrientation::Horizontal,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            None,
            0.0,
        );
        assert_eq!(
            v.stack().frame(0).primary().content,
            LayerContent::Solid(FlipView::FALLBACK_COLOR)
        );
    }

    #[test]
    fn begin_brings_fold_to_front_and_shows_shadows() {
        let mut v = view();
        v.rearrange_layers(Direction::Forward, FlipStep::Begin);
        assert_eq!(v.stack().order(), vec![1, 0], "fold part 0 in front");
        assert!(v.stack().frame(0).primary().shadow.visible);
        assert!(v.stack().frame(1).primary().shadow.visible);
    }

    #[test]
    fn midpoint_swaps_facing_content_and_order() {
        let mut v = view();
        v.rearrange_layers(Direction::Forward, FlipStep::Begin);
        v.rearrange_layers(Direction::Forward, FlipStep::Midpoint);

        let fold = v.stack().frame(0).primary();
        assert_eq!(fold.facing, Facing::Back);
        assert_eq!(
            fold.content,
            v.stack().frame(1).primary().content,
            "back face presents the adjacent part's content"
        );
        assert_eq!(v.stack().order(), vec![0, 1], "order reversed at midpoint");
    }

    #[test]
    fn midpoint_is_idempotent() {
        let mut v = view();
        v.rearrange_layers(Direction::Forward, FlipStep::Begin);
        v.rearrange_layers(Direction::Forward, FlipStep::Midpoint);
        let order = v.stack().order();
        let content = v.stack().frame(0).primary().content;

        v.rearrange_layers(Direction::Forward, FlipStep::Midpoint);
        assert_eq!(v.stack().order(), order);
        assert_eq!(v.stack().frame(0).primary().content, content);
    }

    #[test]
    fn rearrangement_is_deterministic() {
        let run = || {
            let mut v = view();
            v.rearrange_layers(Direction::Forward, FlipStep::Begin);
            v.rearrange_layers(Direction::Forward, FlipStep::Midpoint);
            v.rearrange_layers(Direction::Forward, FlipStep::Settle);
            (
                v.stack().order(),
                v.stack().frame(0).primary().content,
                v.stack().frame(0).primary().facing,
            )
        };
        assert_eq!(run(), run(), "identical inputs, identical arrangement");
    }

    #[test]
    fn complete_restores_content_and_canonical_order() {
        let mut v = view();
        let original = v.stack().frame(0).primary().content;
        v.rearrange_layers(Direction::Forward, FlipStep::Begin);
        v.rearrange_layers(Direction::Forward, FlipStep::Midpoint);
        v.rearrange_layers(Direction::Forward, FlipStep::Settle);
        v.rearrange_layers(Direction::Forward, FlipStep::Complete);

        assert_eq!(v.stack().order(), vec![0, 1]);
        let fold = v.stack().frame(0).primary();
        assert_eq!(fold.content, original);
        assert_eq!(fold.facing, Facing::Front);
        assert!(!fold.shadow.visible);
    }

    #[test]
    fn forward_then_backward_round_trip() {
        let mut v = view();
        let snapshot: Vec<_> = v
            .stack()
            .iter()
            .map(|f| (f.part, f.primary().content))
            .collect();

        for direction in [Direction::Forward, Direction::Backward] {
            v.rearrange_layers(direction, FlipStep::Begin);
            v.rearrange_layers(direction, FlipStep::Midpoint);
            v.rearrange_layers(direction, FlipStep::Settle);
            v.rearrange_layers(direction, FlipStep::Complete);
        }

        let after: Vec<_> = v
            .stack()
            .iter()
            .map(|f| (f.part, f.primary().content))
            .collect();
        assert_eq!(after, snapshot, "full cycle pair restores the stack");
    }

    #[test]
    fn overlay_is_never_rearranged() {
        let mut v = view();
        v.add_overlay(LayerContent::Solid(Rgba::rgb(1.0, 1.0, 1.0)));
        let overlay_before = v.overlay().cloned();

        v.rearrange_layers(Direction::Forward, FlipStep::Begin);
        v.rearrange_layers(Direction::Forward, FlipStep::Midpoint);
        v.rearrange_layers(Direction::Forward, FlipStep::Complete);

        assert_eq!(v.overlay().cloned(), overlay_before);
        assert_eq!(v.overlay().unwrap().z_position, FlipView::OVERLAY_Z);
    }

    #[test]
    fn shadow_animation_can_be_disabled() {
        let mut v = view();
        v.set_shadow_animation(false);
        v.rearrange_layers(Direction::Backward, FlipStep::Begin);
        assert!(!v.stack().frame(0).primary().shadow.visible);
        assert!(!v.stack().frame(1).primary().shadow.visible);
    }

    #[test]
    fn restore_interrupted_undoes_a_half_finished_gesture() {
        let mut v = view();
        let original = v.stack().frame(0).primary().content;
        v.rearrange_layers(Direction::Forward, FlipStep::Begin);
        v.rearrange_layers(Direction::Forward, FlipStep::Midpoint);

        v.restore_interrupted();
        assert_eq!(v.stack().order(), vec![0, 1]);
        assert_eq!(v.stack().frame(0).primary().content, original);
        assert_eq!(v.stack().frame(0).primary().facing, Facing::Front);
    }

    #[test]
    #[should_panic(expected = "rearrangement requires a direction")]
    fn rearrange_without_direction_panics() {
        let mut v = view();
        v.rearrange_layers(Direction::None, FlipStep::Begin);
    }

    #[test]
    fn replace_content_reslices_every_part() {
        let mut v = view();
        v.replace_content(LayerContent::Slice {
            surface: SurfaceId(9),
            region: Rect::new(0.0, 0.0, 100.0, 200.0),
        });
        assert_eq!(v.stack().frame(1).primary().content, LayerContent::Slice {
            surface: SurfaceId(9),
            region: Rect::new(0.0, 100.0, 100.0, 200.0),
        });
    }

    #[test]
    fn changes_record_rearrangement_activity() {
        let mut v = view();
        assert!(v.take_changes().is_empty());

        v.rearrange_layers(Direction::Forward, FlipStep::Begin);
        let changes = v.take_changes();
        assert!(changes.order_changed);
        assert_eq!(changes.shadows, vec![0, 1]);
        assert!(v.take_changes().is_empty(), "drained");
    }
}
