// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture routing and dual-view control for flip demos.
//!
//! A [`FlipController`] owns one vertically and one horizontally folding
//! view, each behind its own animation delegate. Pan gestures are routed to
//! exactly one of them by dominant axis, chosen once per gesture and locked
//! until the gesture ends. Tick driving, completion collection, direction
//! alternation, and trace-sink emission all live here, outside the core
//! state machines.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use halffold_core::delegate::{
    AnimationDelegate, AnimationObserver, DelegateConfig, Direction, TickOutcome,
};
use halffold_core::present::{self, Presenter};
use halffold_core::time::HostTime;
use halffold_core::trace::{
    CycleCompleteEvent, CycleStartEvent, StepEvent, Tracer, TransformUpdateEvent,
};
use halffold_core::view::{FlipOrientation, FlipView, LayeredView};

/// One phase of a pan gesture, in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GesturePhase {
    /// Finger down; accumulation restarts.
    Began,
    /// Finger moved by the given delta since the previous event.
    Moved {
        /// Horizontal delta in points.
        dx: f64,
        /// Vertical delta in points.
        dy: f64,
    },
    /// Finger lifted with the given release velocity in points per second.
    Ended {
        /// Horizontal velocity.
        vx: f64,
        /// Vertical velocity.
        vy: f64,
    },
}

/// Accumulated state of the gesture in progress.
#[derive(Clone, Copy, Debug)]
struct Gesture {
    accum_x: f64,
    accum_y: f64,
    /// Chosen once the accumulated movement clears the slop, then locked.
    routed: Option<(FlipOrientation, Direction)>,
}

/// What one controller tick did across both delegates.
#[derive(Clone, Debug, Default)]
pub struct ControllerOutcome {
    /// Tick outcome of the vertical delegate.
    pub vertical: TickOutcome,
    /// Tick outcome of the horizontal delegate.
    pub horizontal: TickOutcome,
    /// Cycles that reached rest this tick, in delegate order.
    pub completed: Vec<(FlipOrientation, Direction)>,
}

/// Collects completion callbacks during one tick.
#[derive(Default)]
struct Completions(Vec<Direction>);

impl AnimationObserver for Completions {
    fn animation_did_finish(&mut self, direction: Direction) {
        self.0.push(direction);
    }
}

/// Routes gestures and ticks to a vertical and a horizontal flip view.
#[derive(Debug)]
pub struct FlipController {
    vertical: AnimationDelegate<FlipView>,
    horizontal: AnimationDelegate<FlipView>,
    gesture: Option<Gesture>,
    alternate: bool,
}

impl FlipController {
    /// Accumulated movement required before a gesture commits to an axis.
    pub const DIRECTION_SLOP: f64 = 4.0;

    /// Creates a controller over the two views, both configured with
    /// `config`.
    #[must_use]
    pub fn new(vertical: FlipView, horizontal: FlipView, config: DelegateConfig) -> Self {
        Self {
            vertical: AnimationDelegate::new(config, vertical),
            horizontal: AnimationDelegate::new(config, horizontal),
            gesture: None,
            alternate: false,
        }
    }

    /// Enables direction alternation: each completed cycle primes the next
    /// one on the same axis to travel the opposite way.
    pub const fn set_alternate(&mut self, alternate: bool) {
        self.alternate = alternate;
    }

    /// The vertical delegate.
    #[must_use]
    pub const fn vertical(&self) -> &AnimationDelegate<FlipView> {
        &self.vertical
    }

    /// The horizontal delegate.
    #[must_use]
    pub const fn horizontal(&self) -> &AnimationDelegate<FlipView> {
        &self.horizontal
    }

    /// Mutable access to the delegate for `orientation`.
    pub const fn delegate_mut(
        &mut self,
        orientation: FlipOrientation,
    ) -> &mut AnimationDelegate<FlipView> {
        match orientation {
            FlipOrientation::Vertical => &mut self.vertical,
            FlipOrientation::Horizontal => &mut self.horizontal,
        }
    }

    /// Starts a discrete flip on the given axis.
    ///
    /// Returns `false` when that delegate is locked or `direction` is
    /// [`Direction::None`]; rejected requests are not queued.
    pub fn flip(&mut self, orientation: FlipOrientation, direction: Direction) -> bool {
        self.delegate_mut(orientation).start_animation(direction)
    }

    /// Feeds one pan gesture phase into the controller.
    ///
    /// Returns the axis the event was routed to, or `None` while the gesture
    /// has not yet cleared [`DIRECTION_SLOP`](Self::DIRECTION_SLOP) (or when
    /// no gesture is in progress).
    pub fn handle_gesture(&mut self, phase: GesturePhase) -> Option<FlipOrientation> {
        match phase {
            GesturePhase::Began => {
                self.gesture = Some(Gesture {
                    accum_x: 0.0,
                    accum_y: 0.0,
                    routed: None,
                });
                None
            }
            GesturePhase::Moved { dx, dy } => {
                let mut gesture = self.gesture?;
                gesture.accum_x += dx;
                gesture.accum_y += dy;
                if gesture.routed.is_none() {
                    gesture.routed = Self::route(gesture.accum_x, gesture.accum_y);
                }
                self.gesture = Some(gesture);

                let (orientation, direction) = gesture.routed?;
                let value = self.gesture_value(gesture, orientation, direction);
                self.delegate_mut(orientation).set_next_direction(direction);
                self.delegate_mut(orientation).set_transform_value(value, true);
                Some(orientation)
            }
            GesturePhase::Ended { vx, vy } => {
                let gesture = self.gesture.take()?;
                let (orientation, direction) = gesture.routed?;
                let raw = match orientation {
                    FlipOrientation::Vertical => vy,
                    FlipOrientation::Horizontal => vx,
                };
                let span = self.span(orientation);
                let gain = self.gain(orientation);
                let velocity = Self::travel_sign(direction) * raw * gain / span;
                let _ = self.delegate_mut(orientation).end_state_with_speed(velocity);
                Some(orientation)
            }
        }
    }

    /// Advances both delegates to `now` and collects completions.
    ///
    /// With alternation enabled, a completed cycle primes its delegate's
    /// next self-started cycle to travel the opposite way.
    pub fn tick(&mut self, now: HostTime) -> ControllerOutcome {
        let mut outcome = ControllerOutcome::default();
        for orientation in [FlipOrientation::Vertical, FlipOrientation::Horizontal] {
            let alternate = self.alternate;
            let delegate = self.delegate_mut(orientation);
            let mut completions = Completions::default();
            let tick = delegate.tick(now, &mut completions);
            for direction in completions.0 {
                if alternate && direction != Direction::None {
                    delegate.set_next_direction(direction.reversed());
                }
                outcome.completed.push((orientation, direction));
            }
            match orientation {
                FlipOrientation::Vertical => outcome.vertical = tick,
                FlipOrientation::Horizontal => outcome.horizontal = tick,
            }
        }
        outcome
    }

    /// Like [`tick`](Self::tick), additionally emitting trace events for
    /// everything the tick did.
    pub fn tick_traced(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> ControllerOutcome {
        let outcome = self.tick(now);
        for (orientation, tick) in [
            (FlipOrientation::Vertical, outcome.vertical),
            (FlipOrientation::Horizontal, outcome.horizontal),
        ] {
            let delegate = match orientation {
                FlipOrientation::Vertical => &self.vertical,
                FlipOrientation::Horizontal => &self.horizontal,
            };
            let cycle_index = delegate.cycle_count();
            if tick.restarted {
                tracer.cycle_start(&CycleStartEvent {
                    cycle_index,
                    direction: delegate.direction(),
                    at: Some(now),
                });
            }
            if delegate.is_locked() {
                tracer.transform_update(&TransformUpdateEvent {
                    cycle_index,
                    value: tick.value,
                    at: Some(now),
                });
            }
            if let Some(step) = tick.step {
                tracer.step(&StepEvent {
                    cycle_index,
                    step,
                    value: tick.value,
                });
            }
            if let Some(direction) = tick.finished {
                tracer.cycle_complete(&CycleCompleteEvent {
                    cycle_index: cycle_index.saturating_sub(1),
                    direction,
                    at: now,
                });
            }
        }
        outcome
    }

    /// Drains both views' accumulated changes into `presenter`.
    pub fn present_all(&mut self, presenter: &mut dyn Presenter) {
        present::present(self.vertical.view_mut(), presenter);
        present::present(self.horizontal.view_mut(), presenter);
    }

    fn route(accum_x: f64, accum_y: f64) -> Option<(FlipOrientation, Direction)> {
        if accum_x.abs() < Self::DIRECTION_SLOP && accum_y.abs() < Self::DIRECTION_SLOP {
            return None;
        }
        // Dominant axis wins; ties go to vertical.
        if accum_y.abs() >= accum_x.abs() {
            let direction = if accum_y < 0.0 {
                Direction::Forward
            } else {
                Direction::Backward
            };
            Some((FlipOrientation::Vertical, direction))
        } else {
            let direction = if accum_x < 0.0 {
                Direction::Forward
            } else {
                Direction::Backward
            };
            Some((FlipOrientation::Horizontal, direction))
        }
    }

    /// Movement in the travel direction counts positive.
    fn travel_sign(direction: Direction) -> f64 {
        match direction {
            Direction::Forward => -1.0,
            _ => 1.0,
        }
    }

    fn span(&self, orientation: FlipOrientation) -> f64 {
        let bounds = match orientation {
            FlipOrientation::Vertical => self.vertical.view().bounds(),
            FlipOrientation::Horizontal => self.horizontal.view().bounds(),
        };
        match orientation {
            FlipOrientation::Vertical => bounds.height(),
            FlipOrientation::Horizontal => bounds.width(),
        }
    }

    fn gain(&self, orientation: FlipOrientation) -> f64 {
        let config = match orientation {
            FlipOrientation::Vertical => self.vertical.config(),
            FlipOrientation::Horizontal => self.horizontal.config(),
        };
        f64::from(config.sensitivity) / 10.0
    }

    fn gesture_value(
        &self,
        gesture: Gesture,
        orientation: FlipOrientation,
        direction: Direction,
    ) -> f64 {
        let accum = match orientation {
            FlipOrientation::Vertical => gesture.accum_y,
            FlipOrientation::Horizontal => gesture.accum_x,
        };
        let span = self.span(orientation);
        let gain = self.gain(orientation);
        (Self::travel_sign(direction) * accum * gain / span).clamp(0.0, 1.0)
    }
}
