// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The animation state machine.
//!
//! An [`AnimationDelegate`] drives exactly one [`LayeredView`] through flip
//! cycles. It owns the current progress value, travel direction, duration,
//! and sequence mode; translates ticks or live gesture input into fold
//! transforms; calls back into the view for rearrangement at configured
//! progress thresholds; and notifies an [`AnimationObserver`] when a cycle
//! reaches rest.
//!
//! The legacy boolean animation lock is an explicit state machine here:
//!
//! ```text
//!   Idle ──start_animation──► Animating ──target reached──► Completing
//!    ▲                                                          │
//!    │                    (auto mode: Resting, repeat delay)    │
//!    └──────────────────────────────────────────────────────────┘
//! ```
//!
//! While `Animating` or `Completing`, the delegate is locked: a second
//! `start_animation` is rejected synchronously, never queued. The lock is
//! released only by the completion path, which also fires the observer
//! callback exactly once per cycle.

use core::f64::consts::PI;

use crate::time::{Duration, HostTime};
use crate::timeline::{Easing, Timeline};
use crate::transform::Transform3d;
use crate::view::{FlipStep, LayeredView};

/// Travel direction of a flip cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// No travel; rejected by every operation that starts motion.
    #[default]
    None,
    /// The first part folds over the second.
    Forward,
    /// The second part folds back over the first.
    Backward,
}

impl Direction {
    /// The opposite travel direction; [`None`](Self::None) stays `None`.
    #[inline]
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// How external input maps to animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceMode {
    /// Self-looping; input during playback is ignored and each completed
    /// cycle schedules the next after the repeat delay.
    Auto,
    /// One discrete cycle per external trigger; triggers mid-flight are
    /// ignored.
    Triggered,
    /// Continuous, input-proportional; settles to the nearer rest state when
    /// input ends.
    Controlled,
}

/// Progress positions at which rearrangement fires during a cycle.
///
/// The original effect triggered these at angles tuned by inspection; they
/// are explicit configuration here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RearrangeThresholds {
    /// Progress at which the fold crosses the line of sight.
    pub midpoint: f64,
    /// Progress at which shadow fade-out begins.
    pub settle: f64,
}

impl RearrangeThresholds {
    /// Creates a threshold pair.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < midpoint < settle < 1`.
    #[must_use]
    pub const fn new(midpoint: f64, settle: f64) -> Self {
        assert!(
            0.0 < midpoint && midpoint < settle && settle < 1.0,
            "thresholds must satisfy 0 < midpoint < settle < 1"
        );
        Self { midpoint, settle }
    }
}

impl Default for RearrangeThresholds {
    fn default() -> Self {
        Self {
            midpoint: 0.5,
            settle: 0.9,
        }
    }
}

/// Constructor-time configuration of a delegate. Immutable per instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelegateConfig {
    /// How input maps to progress.
    pub sequence: SequenceMode,
    /// Default travel direction for self-started cycles.
    pub direction: Direction,
    /// Duration of one full cycle (also the settle-time base in controlled
    /// mode).
    pub duration: Duration,
    /// Perspective depth applied to fold transforms. Lower values exaggerate
    /// depth; 200–2000 is the useful range.
    pub perspective_depth: f64,
    /// Input gain for controlled mode; 10 is an average value.
    pub sensitivity: u32,
    /// Settle speed for controlled mode, gravity pulling the fold to rest;
    /// 3 is an average value.
    pub gravity: u32,
    /// Whether shadow sublayers are animated.
    pub shadow: bool,
    /// Auto mode: whether completed cycles schedule another.
    pub repeat: bool,
    /// Auto mode: pause between a completed cycle and the next.
    pub repeat_delay: Duration,
    /// Progress thresholds for rearrangement.
    pub thresholds: RearrangeThresholds,
    /// Easing applied to self-driven progression.
    pub easing: Easing,
}

impl DelegateConfig {
    /// Self-looping ticker: forward cycles repeating after a one-second
    /// pause.
    #[must_use]
    pub const fn ticker() -> Self {
        Self {
            sequence: SequenceMode::Auto,
            direction: Direction::Forward,
            duration: Duration::from_millis(600),
            perspective_depth: 800.0,
            sensitivity: 10,
            gravity: 3,
            shadow: true,
            repeat: true,
            repeat_delay: Duration::from_millis(1000),
            thresholds: RearrangeThresholds {
                midpoint: 0.5,
                settle: 0.9,
            },
            easing: Easing::EaseInOut,
        }
    }

    /// One flip per trigger, card-turn pacing.
    #[must_use]
    pub const fn card() -> Self {
        Self {
            sequence: SequenceMode::Triggered,
            direction: Direction::Forward,
            duration: Duration::from_millis(350),
            perspective_depth: 500.0,
            sensitivity: 10,
            gravity: 3,
            shadow: true,
            repeat: false,
            repeat_delay: Duration::ZERO,
            thresholds: RearrangeThresholds {
                midpoint: 0.5,
                settle: 0.9,
            },
            easing: Easing::EaseOut,
        }
    }

    /// Gesture-driven flipping with average feel.
    #[must_use]
    pub const fn drag() -> Self {
        Self {
            sequence: SequenceMode::Controlled,
            direction: Direction::Forward,
            duration: Duration::from_millis(400),
            perspective_depth: 500.0,
            sensitivity: 10,
            gravity: 3,
            shadow: true,
            repeat: false,
            repeat_delay: Duration::ZERO,
            thresholds: RearrangeThresholds {
                midpoint: 0.5,
                settle: 0.9,
            },
            easing: Easing::EaseOut,
        }
    }
}

/// The delegate's lifecycle state. Locked while `Animating` or `Completing`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationState {
    /// At rest; ready to start a cycle.
    Idle,
    /// A cycle (or live gesture) is in flight in the given direction.
    Animating(Direction),
    /// The cycle reached its target and completion work is running.
    Completing(Direction),
    /// Auto mode: a completed cycle is waiting out the repeat delay.
    Resting {
        /// When the next cycle self-starts.
        restart_at: HostTime,
    },
}

/// Receives the completion callback, exactly once per cycle reaching rest.
///
/// A cancelled controlled gesture (settled back to its start) reports
/// [`Direction::None`].
pub trait AnimationObserver {
    /// A cycle reached a rest state.
    fn animation_did_finish(&mut self, direction: Direction);
}

/// An observer that ignores completions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl AnimationObserver for NoopObserver {
    fn animation_did_finish(&mut self, _direction: Direction) {}
}

/// What one [`tick`](AnimationDelegate::tick) did, for loop-level
/// instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickOutcome {
    /// Progress value after the tick.
    pub value: f64,
    /// Rearrangement step applied during the tick, if any.
    pub step: Option<FlipStep>,
    /// Direction reported to the observer, if the cycle reached rest.
    pub finished: Option<Direction>,
    /// Auto mode self-started a new cycle this tick.
    pub restarted: bool,
}

/// The animation state machine driving one layered view.
#[derive(Debug)]
pub struct AnimationDelegate<V: LayeredView> {
    config: DelegateConfig,
    view: V,
    state: AnimationState,
    value: f64,
    current_direction: Direction,
    next_direction: Direction,
    timeline: Option<Timeline>,
    pending: Option<(f64, Duration)>,
    applied: Option<FlipStep>,
    cycle_count: u64,
}

impl<V: LayeredView> AnimationDelegate<V> {
    /// Creates a delegate owning `view`, configured once for its lifetime.
    #[must_use]
    pub fn new(config: DelegateConfig, mut view: V) -> Self {
        view.set_shadow_animation(config.shadow);
        Self {
            config,
            view,
            state: AnimationState::Idle,
            value: 0.0,
            current_direction: Direction::None,
            next_direction: config.direction,
            timeline: None,
            pending: None,
            applied: None,
            cycle_count: 0,
        }
    }

    /// The immutable configuration.
    #[must_use]
    pub const fn config(&self) -> &DelegateConfig {
        &self.config
    }

    /// The driven view.
    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the driven view.
    pub const fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> AnimationState {
        self.state
    }

    /// Current progress value in [0, 1].
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Direction of the cycle in flight, or `None` at rest.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.current_direction
    }

    /// Completed cycles since construction.
    #[must_use]
    pub const fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Whether a transform is in flight. Locked delegates reject
    /// [`start_animation`](Self::start_animation).
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        matches!(
            self.state,
            AnimationState::Animating(_) | AnimationState::Completing(_)
        )
    }

    /// Overrides the travel direction of the next self-started cycle.
    ///
    /// Auto mode reads this when restarting after the repeat delay, which is
    /// how a controller alternates directions between cycles.
    pub const fn set_next_direction(&mut self, direction: Direction) {
        self.next_direction = direction;
    }

    /// Starts a cycle traveling in `direction`.
    ///
    /// Returns `false` — leaving all state unchanged — when the delegate is
    /// locked or `direction` is [`Direction::None`]. Rejection is a hard
    /// exclusion: the request is not queued.
    pub fn start_animation(&mut self, direction: Direction) -> bool {
        if direction == Direction::None || self.is_locked() {
            return false;
        }
        self.current_direction = direction;
        self.value = 0.0;
        self.applied = None;
        self.timeline = None;
        self.pending = Some((1.0, self.config.duration));
        self.view.rearrange_layers(direction, FlipStep::Begin);
        self.applied = Some(FlipStep::Begin);
        self.apply_fold_transform();
        self.state = AnimationState::Animating(direction);
        true
    }

    /// Continuous update for a live controlled gesture.
    ///
    /// Clamps `value` to [0, 1], applies the fold transform immediately, and
    /// — when `delegating` is true — performs threshold-crossing
    /// rearrangement. Crossings are idempotent: however the input is
    /// quantized, each step is applied at most once per cycle.
    ///
    /// Updates are ignored (returning `None`) while a self-driven timeline
    /// is in flight, and in non-controlled modes when no cycle is active.
    pub fn set_transform_value(&mut self, value: f64, delegating: bool) -> Option<FlipStep> {
        if self.timeline.is_some() || self.pending.is_some() {
            return None;
        }
        if self.state == AnimationState::Idle {
            if self.config.sequence != SequenceMode::Controlled {
                return None;
            }
            // First movement of a gesture opens the cycle.
            let direction = self.next_direction;
            if direction == Direction::None {
                return None;
            }
            self.current_direction = direction;
            self.applied = None;
            self.view.rearrange_layers(direction, FlipStep::Begin);
            self.applied = Some(FlipStep::Begin);
            self.state = AnimationState::Animating(direction);
        }
        if !matches!(self.state, AnimationState::Animating(_)) {
            return None;
        }
        self.value = value.clamp(0.0, 1.0);
        self.apply_fold_transform();
        if delegating {
            self.check_thresholds()
        } else {
            None
        }
    }

    /// Settles a live controlled gesture to a rest state, biased by
    /// `velocity` (progress units per second, positive in the travel
    /// direction).
    ///
    /// Velocity at or beyond the sensitivity/gravity-derived
    /// [`flick_cutoff`](Self::flick_cutoff) selects the far rest state even
    /// below the midpoint (and the near state when strongly negative);
    /// otherwise the nearer rest state wins. Returns the chosen rest: the
    /// travel direction for the far state, [`Direction::None`] for the near
    /// state. No-op unless a gesture is live.
    pub fn end_state_with_speed(&mut self, velocity: f64) -> Direction {
        if self.timeline.is_some() || self.pending.is_some() {
            return Direction::None;
        }
        let AnimationState::Animating(direction) = self.state else {
            return Direction::None;
        };
        let cutoff = self.flick_cutoff();
        let target = if velocity >= cutoff {
            1.0
        } else if velocity <= -cutoff {
            0.0
        } else if self.value >= 0.5 {
            1.0
        } else {
            0.0
        };

        let distance = (target - self.value).abs();
        let nanos = self.config.duration.nanos() as f64 * distance * 3.0
            / f64::from(self.config.gravity.max(1));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "settle durations are nonnegative and far below u64 range"
        )]
        let settle = Duration(nanos as u64);
        self.pending = Some((target, settle));
        if target >= 1.0 { direction } else { Direction::None }
    }

    /// The velocity (progress units per second) above which a gesture flicks
    /// through to the far rest state regardless of current progress.
    ///
    /// Average sensitivity (10) and gravity (3) give a cutoff of 2.0; more
    /// of either lowers it.
    #[must_use]
    pub fn flick_cutoff(&self) -> f64 {
        60.0 / f64::from(self.config.sensitivity.max(1) * self.config.gravity.max(1))
    }

    /// Restores rest state after an interrupted gesture: backed-up content,
    /// baseline transform and opacity, lock released.
    pub fn reset_transform_values(&mut self) {
        self.view.restore_interrupted();
        self.value = 0.0;
        self.current_direction = Direction::None;
        self.timeline = None;
        self.pending = None;
        self.applied = None;
        self.state = AnimationState::Idle;
    }

    /// Advances the delegate to `now`.
    ///
    /// Materializes any pending timeline, samples it, applies the fold
    /// transform and threshold rearrangements, and runs the completion
    /// sequence when the target is reached: `Complete` rearrangement, state
    /// reset, lock release, and exactly one
    /// [`animation_did_finish`](AnimationObserver::animation_did_finish)
    /// call. Auto mode then rests for the repeat delay and self-restarts
    /// (unless `repeat` is off).
    pub fn tick(&mut self, now: HostTime, observer: &mut dyn AnimationObserver) -> TickOutcome {
        let mut outcome = TickOutcome {
            value: self.value,
            ..TickOutcome::default()
        };

        if let AnimationState::Resting { restart_at } = self.state
            && now >= restart_at
        {
            self.state = AnimationState::Idle;
            if self.config.repeat && self.start_animation(self.next_direction) {
                outcome.restarted = true;
            }
        }

        let AnimationState::Animating(direction) = self.state else {
            return outcome;
        };
        if let Some((to, duration)) = self.pending.take() {
            self.timeline = Some(Timeline::new(
                self.value,
                to,
                now,
                duration,
                self.config.easing,
            ));
        }
        let Some(timeline) = self.timeline else {
            // A live gesture owns the value; nothing to advance.
            return outcome;
        };

        self.value = timeline.value_at(now);
        self.apply_fold_transform();
        if timeline.to >= 1.0 {
            outcome.step = self.check_thresholds();
        }
        outcome.value = self.value;

        if timeline.is_complete(now) {
            self.state = AnimationState::Completing(direction);
            if timeline.to >= 1.0 {
                self.view.rearrange_layers(direction, FlipStep::Complete);
                self.cycle_count += 1;
                self.value = 0.0;
                self.current_direction = Direction::None;
                self.timeline = None;
                self.applied = None;
                observer.animation_did_finish(direction);
                outcome.finished = Some(direction);
                outcome.value = self.value;
                self.state = match self.config.sequence {
                    SequenceMode::Auto if self.config.repeat => AnimationState::Resting {
                        restart_at: now + self.config.repeat_delay,
                    },
                    _ => AnimationState::Idle,
                };
            } else {
                // Gesture settled back to its start: undo, report no travel.
                self.reset_transform_values();
                observer.animation_did_finish(Direction::None);
                outcome.finished = Some(Direction::None);
                outcome.value = self.value;
            }
        }
        outcome
    }

    fn check_thresholds(&mut self) -> Option<FlipStep> {
        let direction = self.current_direction;
        if direction == Direction::None {
            return None;
        }
        let mut applied_now = None;
        if self.value >= self.config.thresholds.midpoint && self.applied < Some(FlipStep::Midpoint)
        {
            self.view.rearrange_layers(direction, FlipStep::Midpoint);
            self.applied = Some(FlipStep::Midpoint);
            applied_now = Some(FlipStep::Midpoint);
        }
        if self.value >= self.config.thresholds.settle && self.applied < Some(FlipStep::Settle) {
            self.view.rearrange_layers(direction, FlipStep::Settle);
            self.applied = Some(FlipStep::Settle);
            applied_now = Some(FlipStep::Settle);
        }
        applied_now
    }

    fn apply_fold_transform(&mut self) {
        let direction = self.current_direction;
        if direction == Direction::None {
            return;
        }
        let sign = match direction {
            Direction::Forward => -1.0,
            Direction::Backward => 1.0,
            Direction::None => unreachable!(),
        };
        let angle = sign * self.value * PI;
        let pivot = self.view.bounds().center();
        // Rotate around the fold line through the view center.
        let transform = Transform3d::from_translation(pivot.x, pivot.y, 0.0)
            * Transform3d::flip(
                self.view.rotation_axis(),
                angle,
                self.config.perspective_depth,
            )
            * Transform3d::from_translation(-pivot.x, -pivot.y, 0.0);
        self.view.set_fold_transform(direction, transform);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Rect;

    use super::*;
    use crate::layer::{Facing, SurfaceId};
    use crate::view::{FlipOrientation, FlipView};

    #[derive(Default)]
    struct Completions(Vec<Direction>);

    impl AnimationObserver for Completions {
        fn animation_did_finish(&mut self, direction: Direction) {
            self.0.push(direction);
        }
    }

    fn linear(sequence: SequenceMode) -> DelegateConfig {
        DelegateConfig {
            sequence,
            duration: Duration(1_000),
            repeat_delay: Duration(500),
            easing: Easing::Linear,
            ..DelegateConfig::ticker()
        }
    }

    fn delegate(sequence: SequenceMode) -> AnimationDelegate<FlipView> {
        let view = FlipView::from_surface(
            FlipOrientation::Vertical,
            Rect::new(0.0, 0.0, 100.0, 200.0),
            Some(SurfaceId(1)),
            0.0,
        );
        AnimationDelegate::new(linear(sequence), view)
    }

    #[test]
    fn start_rejects_none_direction() {
        let mut d = delegate(SequenceMode::Triggered);
        assert!(!d.start_animation(Direction::None));
        assert_eq!(d.state(), AnimationState::Idle);
    }

    #[test]
    fn at_most_one_in_flight() {
        let mut d = delegate(SequenceMode::Triggered);
        assert!(d.start_animation(Direction::Forward));
        assert!(d.is_locked());
        let order = d.view().stack().order();

        assert!(!d.start_animation(Direction::Backward), "second start rejected");
        assert_eq!(d.state(), AnimationState::Animating(Direction::Forward));
        assert_eq!(d.view().stack().order(), order, "rejection changes nothing");
    }

    #[test]
    fn full_cycle_fires_observer_once_and_unlocks() {
        let mut d = delegate(SequenceMode::Triggered);
        let mut obs = Completions::default();
        assert!(d.start_animation(Direction::Forward));
        assert!(d.is_locked());

        // Midpoint: stack order reverses relative to the begin arrangement.
        let out = d.tick(HostTime(500), &mut obs);
        assert_eq!(out.step, Some(FlipStep::Midpoint));
        assert_eq!(d.view().stack().order(), vec![0, 1]);
        assert_eq!(
            d.view().stack().frame(0).primary().facing,
            Facing::Back
        );

        let out = d.tick(HostTime(1_000), &mut obs);
        assert_eq!(out.finished, Some(Direction::Forward));
        assert!(!d.is_locked());
        assert_eq!(d.state(), AnimationState::Idle);
        assert_eq!(obs.0, vec![Direction::Forward], "exactly one callback");
        assert_eq!(d.cycle_count(), 1);
        assert_eq!(d.view().stack().order(), vec![0, 1], "post-flip order");
        assert_eq!(d.value(), 0.0, "progress reset to baseline");
    }

    #[test]
    fn ticks_after_completion_do_not_refire() {
        let mut d = delegate(SequenceMode::Triggered);
        let mut obs = Completions::default();
        d.start_animation(Direction::Forward);
        d.tick(HostTime(1_000), &mut obs);
        d.tick(HostTime(2_000), &mut obs);
        d.tick(HostTime(3_000), &mut obs);
        assert_eq!(obs.0.len(), 1);
    }

    #[test]
    fn threshold_crossing_is_idempotent_under_fine_input() {
        let mut d = delegate(SequenceMode::Controlled);
        let mut steps = Vec::new();
        let mut value = 0.0;
        while value < 1.0 {
            value += 0.01;
            if let Some(step) = d.set_transform_value(value, true) {
                steps.push(step);
            }
        }
        assert_eq!(
            steps,
            vec![FlipStep::Midpoint, FlipStep::Settle],
            "each threshold fires exactly once"
        );
    }

    #[test]
    fn coarse_input_applies_both_thresholds_in_one_update() {
        let mut d = delegate(SequenceMode::Controlled);
        d.set_transform_value(0.05, true);
        let step = d.set_transform_value(0.95, true);
        assert_eq!(step, Some(FlipStep::Settle), "highest step reported");
        assert_eq!(
            d.view().stack().frame(0).primary().facing,
            Facing::Back,
            "midpoint swap was not skipped"
        );
    }

    #[test]
    fn non_delegating_updates_skip_rearrangement() {
        let mut d = delegate(SequenceMode::Controlled);
        assert_eq!(d.set_transform_value(0.7, false), None);
        assert_eq!(
            d.view().stack().frame(0).primary().facing,
            Facing::Front,
            "no midpoint swap without delegation"
        );
    }

    #[test]
    fn gesture_updates_ignored_while_settling() {
        let mut d = delegate(SequenceMode::Controlled);
        let mut obs = Completions::default();
        d.set_transform_value(0.6, true);
        assert_eq!(d.end_state_with_speed(0.0), Direction::Forward);
        d.tick(HostTime(0), &mut obs);
        assert_eq!(d.set_transform_value(0.2, true), None, "settle owns the value");
    }

    #[test]
    fn flick_selects_far_rest_below_midpoint() {
        let mut d = delegate(SequenceMode::Controlled);
        let mut obs = Completions::default();
        d.set_transform_value(0.3, true);

        let cutoff = d.flick_cutoff();
        assert_eq!(d.end_state_with_speed(cutoff + 0.1), Direction::Forward);

        d.tick(HostTime(0), &mut obs);
        let mut now = 0;
        while d.is_locked() {
            now += 100;
            d.tick(HostTime(now), &mut obs);
        }
        assert_eq!(obs.0, vec![Direction::Forward]);
        assert_eq!(d.cycle_count(), 1);
    }

    #[test]
    fn slow_release_below_midpoint_returns_to_start() {
        let mut d = delegate(SequenceMode::Controlled);
        let mut obs = Completions::default();
        d.set_transform_value(0.6, true);
        d.set_transform_value(0.3, true);
        assert_eq!(d.end_state_with_speed(0.1), Direction::None);

        d.tick(HostTime(0), &mut obs);
        let mut now = 0;
        while d.is_locked() {
            now += 100;
            d.tick(HostTime(now), &mut obs);
        }
        assert_eq!(obs.0, vec![Direction::None], "no travel reported");
        assert_eq!(d.view().stack().order(), vec![0, 1]);
        assert_eq!(
            d.view().stack().frame(0).primary().facing,
            Facing::Front,
            "midpoint swap undone"
        );
        assert_eq!(d.cycle_count(), 0, "a cancelled gesture is not a cycle");
    }

    #[test]
    fn slow_release_past_midpoint_settles_forward() {
        let mut d = delegate(SequenceMode::Controlled);
        let mut obs = Completions::default();
        d.set_transform_value(0.7, true);
        assert_eq!(d.end_state_with_speed(0.0), Direction::Forward);
        d.tick(HostTime(0), &mut obs);
        let mut now = 0;
        while d.is_locked() {
            now += 100;
            d.tick(HostTime(now), &mut obs);
        }
        assert_eq!(obs.0, vec![Direction::Forward]);
    }

    #[test]
    fn auto_mode_rests_then_restarts() {
        let mut d = delegate(SequenceMode::Auto);
        let mut obs = Completions::default();
        assert!(d.start_animation(Direction::Forward));

        let out = d.tick(HostTime(1_000), &mut obs);
        assert_eq!(out.finished, Some(Direction::Forward));
        assert_eq!(
            d.state(),
            AnimationState::Resting {
                restart_at: HostTime(1_500)
            }
        );
        assert!(!d.is_locked(), "resting is not locked");

        let out = d.tick(HostTime(1_400), &mut obs);
        assert!(!out.restarted, "repeat delay not yet elapsed");

        let out = d.tick(HostTime(1_500), &mut obs);
        assert!(out.restarted);
        assert!(d.is_locked());
    }

    #[test]
    fn auto_mode_without_repeat_goes_idle() {
        let mut config = linear(SequenceMode::Auto);
        config.repeat = false;
        let view = FlipView::from_surface(
            FlipOrientation::Vertical,
            Rect::new(0.0, 0.0, 100.0, 200.0),
            None,
            0.0,
        );
        let mut d = AnimationDelegate::new(config, view);
        let mut obs = Completions::default();
        d.start_animation(Direction::Forward);
        d.tick(HostTime(1_000), &mut obs);
        assert_eq!(d.state(), AnimationState::Idle);
    }

    #[test]
    fn auto_restart_honors_next_direction() {
        let mut d = delegate(SequenceMode::Auto);
        let mut obs = Completions::default();
        d.start_animation(Direction::Forward);
        d.tick(HostTime(1_000), &mut obs);
        d.set_next_direction(Direction::Backward);
        d.tick(HostTime(1_500), &mut obs);
        assert_eq!(d.state(), AnimationState::Animating(Direction::Backward));
    }

    #[test]
    fn reset_recovers_from_interrupted_gesture() {
        let mut d = delegate(SequenceMode::Controlled);
        d.set_transform_value(0.8, true);
        assert!(d.is_locked());
        d.reset_transform_values();
        assert_eq!(d.state(), AnimationState::Idle);
        assert_eq!(d.value(), 0.0);
        assert_eq!(d.view().stack().order(), vec![0, 1]);
    }

    #[test]
    fn fold_transform_carries_perspective() {
        let mut d = delegate(SequenceMode::Controlled);
        d.set_transform_value(0.25, true);
        let transform = d.view().stack().frame(0).primary().transform;
        assert!(transform.is_finite());
        assert_ne!(transform, Transform3d::IDENTITY);
    }

    #[test]
    fn non_controlled_modes_ignore_stray_gesture_values() {
        let mut d = delegate(SequenceMode::Triggered);
        assert_eq!(d.set_transform_value(0.5, true), None);
        assert_eq!(d.state(), AnimationState::Idle);
    }

    #[test]
    #[should_panic(expected = "thresholds must satisfy")]
    fn inverted_thresholds_panic() {
        let _ = RearrangeThresholds::new(0.9, 0.5);
    }
}
