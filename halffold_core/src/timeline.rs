// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned timed interpolation.
//!
//! The original flip effect handed declarative animations to the platform
//! compositor and waited for its completion callback. Here progression is an
//! explicit [`Timeline`] sampled on each tick: non-blocking, deterministic,
//! and independent of any rendering framework. The delegate owns at most one
//! timeline at a time and detects completion itself.

use crate::time::{Duration, HostTime};

/// How interpolation accelerates over its duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Cubic deceleration into the end point.
    #[default]
    EaseOut,
    /// Cubic acceleration and deceleration.
    EaseInOut,
}

impl Easing {
    /// Applies the easing curve to a normalized phase `t` in [0, 1].
    ///
    /// Inputs outside the range are clamped.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// A bounded interpolation from one progress value to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    /// Progress value at `start`.
    pub from: f64,
    /// Progress value reached once `duration` has elapsed.
    pub to: f64,
    /// Host time the interpolation began.
    pub start: HostTime,
    /// Total running time. A zero duration completes on the first sample.
    pub duration: Duration,
    /// Easing curve applied to the phase.
    pub easing: Easing,
}

impl Timeline {
    /// Creates a timeline running from `from` to `to` over `duration`,
    /// starting at `start`.
    #[must_use]
    pub const fn new(from: f64, to: f64, start: HostTime, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// Returns the normalized phase in [0, 1] at `now`, before easing.
    #[must_use]
    pub fn phase_at(&self, now: HostTime) -> f64 {
        if self.duration == Duration::ZERO {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration {
            1.0
        } else {
            elapsed.nanos() as f64 / self.duration.nanos() as f64
        }
    }

    /// Samples the interpolated value at `now`.
    ///
    /// Before `start` this is `from`; at or after `start + duration` it is
    /// exactly `to` (no easing residue).
    #[must_use]
    pub fn value_at(&self, now: HostTime) -> f64 {
        let phase = self.phase_at(now);
        if phase >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(phase)
    }

    /// Whether the timeline has reached its target at `now`.
    #[must_use]
    pub fn is_complete(&self, now: HostTime) -> bool {
        self.phase_at(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_are_exact() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn easing_clamps_out_of_range_input() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseOut.apply(1.5), 1.0);
    }

    #[test]
    fn ease_in_out_is_symmetric_at_midpoint() {
        let v = Easing::EaseInOut.apply(0.5);
        assert!((v - 0.5).abs() < 1e-12, "midpoint should be 0.5, got {v}");
    }

    #[test]
    fn linear_interpolation() {
        let tl = Timeline::new(
            0.0,
            1.0,
            HostTime(1000),
            Duration(1000),
            Easing::Linear,
        );
        assert_eq!(tl.value_at(HostTime(500)), 0.0, "before start");
        assert_eq!(tl.value_at(HostTime(1500)), 0.5);
        assert_eq!(tl.value_at(HostTime(2000)), 1.0);
        assert_eq!(tl.value_at(HostTime(9999)), 1.0, "after end stays at target");
    }

    #[test]
    fn descending_interpolation() {
        let tl = Timeline::new(
            0.8,
            0.0,
            HostTime(0),
            Duration(100),
            Easing::Linear,
        );
        assert_eq!(tl.value_at(HostTime(50)), 0.4);
        assert_eq!(tl.value_at(HostTime(100)), 0.0);
    }

    #[test]
    fn completion_detection() {
        let tl = Timeline::new(0.0, 1.0, HostTime(10), Duration(20), Easing::EaseOut);
        assert!(!tl.is_complete(HostTime(10)));
        assert!(!tl.is_complete(HostTime(29)));
        assert!(tl.is_complete(HostTime(30)));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let tl = Timeline::new(0.2, 1.0, HostTime(100), Duration::ZERO, Easing::Linear);
        assert!(tl.is_complete(HostTime(100)));
        assert_eq!(tl.value_at(HostTime(100)), 1.0);
    }
}
