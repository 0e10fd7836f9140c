// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between arrangement state and a display backend.
//!
//! The core never draws. A [`Presenter`] is handed the view together with
//! the change record drained since the last presentation and mirrors the
//! affected layers into whatever actually renders them (a compositor layer
//! tree, a test recorder, a debug dump). [`present`] is the drain-and-apply
//! step a driving loop calls once per update.

use crate::view::{FlipChanges, FlipView};

/// Mirrors arrangement changes into a display backend.
pub trait Presenter {
    /// Applies the drained `changes` against the current state of `view`.
    ///
    /// `changes` only says *which* layers were touched; the authoritative
    /// values are read from `view`.
    fn apply(&mut self, view: &FlipView, changes: &FlipChanges);
}

/// A [`Presenter`] that discards all changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn apply(&mut self, _view: &FlipView, _changes: &FlipChanges) {}
}

/// Drains the view's accumulated changes and hands them to `presenter`.
///
/// Empty change records are not delivered.
pub fn present(view: &mut FlipView, presenter: &mut dyn Presenter) {
    let changes = view.take_changes();
    if changes.is_empty() {
        return;
    }
    presenter.apply(view, &changes);
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Rect;

    use super::*;
    use crate::delegate::Direction;
    use crate::layer::SurfaceId;
    use crate::view::{FlipOrientation, FlipStep, LayeredView};

    #[derive(Default)]
    struct CountingPresenter {
        applications: usize,
        touched_parts: Vec<usize>,
    }

    impl Presenter for CountingPresenter {
        fn apply(&mut self, _view: &FlipView, changes: &FlipChanges) {
            self.applications += 1;
            self.touched_parts.extend(changes.content.iter().copied());
        }
    }

    fn view() -> FlipView {
        FlipView::from_surface(
            FlipOrientation::Vertical,
            Rect::new(0.0, 0.0, 100.0, 200.0),
            Some(SurfaceId(1)),
            0.0,
        )
    }

    #[test]
    fn empty_changes_are_not_delivered() {
        let mut view = view();
        view.take_changes();
        let mut presenter = CountingPresenter::default();
        present(&mut view, &mut presenter);
        assert_eq!(presenter.applications, 0);
    }

    #[test]
    fn rearrangement_reaches_the_presenter_once() {
        let mut view = view();
        view.take_changes();
        view.rearrange_layers(Direction::Forward, FlipStep::Begin);
        view.rearrange_layers(Direction::Forward, FlipStep::Midpoint);

        let mut presenter = CountingPresenter::default();
        present(&mut view, &mut presenter);
        assert_eq!(presenter.applications, 1);
        assert!(
            presenter.touched_parts.contains(&0),
            "midpoint substituted the fold part's content"
        );

        // Drained: a second presentation has nothing to deliver.
        present(&mut view, &mut presenter);
        assert_eq!(presenter.applications, 1);
    }
}
