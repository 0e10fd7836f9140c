// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the animation loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! loop-level instrumentation calls as a flip cycle progresses. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! The delegate and view never emit events themselves; the loop that drives
//! them does, from the returned tick outcomes and drained change records.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`LayerUpdate`] and stack-order
//!   events plus the corresponding `TraceSink` methods.

use crate::delegate::Direction;
use crate::time::HostTime;
use crate::view::FlipStep;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which property of a layer changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerField {
    /// Fold transform.
    Transform,
    /// Content (surface slice or solid fill).
    Content,
    /// Shadow visibility or opacity.
    Shadow,
    /// Which side faces the viewer.
    Facing,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a flip cycle starts.
#[derive(Clone, Copy, Debug)]
pub struct CycleStartEvent {
    /// Monotonic cycle counter (completed cycles before this one).
    pub cycle_index: u64,
    /// Travel direction of the cycle.
    pub direction: Direction,
    /// Host time the cycle started, if driven by a tick.
    pub at: Option<HostTime>,
}

/// Emitted on every progress update, ticked or gesture-driven.
#[derive(Clone, Copy, Debug)]
pub struct TransformUpdateEvent {
    /// Cycle counter.
    pub cycle_index: u64,
    /// Progress value after the update.
    pub value: f64,
    /// Host time of the update, if driven by a tick.
    pub at: Option<HostTime>,
}

/// Emitted when progress crosses a rearrangement threshold.
#[derive(Clone, Copy, Debug)]
pub struct StepEvent {
    /// Cycle counter.
    pub cycle_index: u64,
    /// The rearrangement step that was applied.
    pub step: FlipStep,
    /// Progress value at the crossing.
    pub value: f64,
}

/// Emitted when a released gesture chooses its rest state.
#[derive(Clone, Copy, Debug)]
pub struct RestChoiceEvent {
    /// Cycle counter.
    pub cycle_index: u64,
    /// Progress value at release.
    pub value: f64,
    /// Release velocity in progress units per second.
    pub velocity: f64,
    /// The flick cutoff in effect.
    pub cutoff: f64,
    /// Chosen rest: the travel direction for the far state,
    /// [`Direction::None`] for the near state.
    pub chosen: Direction,
}

/// Emitted when a cycle reaches rest and the observer has been notified.
#[derive(Clone, Copy, Debug)]
pub struct CycleCompleteEvent {
    /// Cycle counter.
    pub cycle_index: u64,
    /// Direction reported to the observer.
    pub direction: Direction,
    /// Host time of completion.
    pub at: HostTime,
}

/// A per-update layer change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct LayerUpdate {
    /// Part number of the layer that changed.
    pub part: usize,
    /// Which field changed.
    pub field: LayerField,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the animation loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a flip cycle starts.
    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        _ = e;
    }

    /// Called on every progress update.
    fn on_transform_update(&mut self, e: &TransformUpdateEvent) {
        _ = e;
    }

    /// Called when a rearrangement threshold is crossed.
    fn on_step(&mut self, e: &StepEvent) {
        _ = e;
    }

    /// Called when a released gesture chooses its rest state.
    fn on_rest_choice(&mut self, e: &RestChoiceEvent) {
        _ = e;
    }

    /// Called when a cycle reaches rest.
    fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
        _ = e;
    }

    /// Called with the back-to-front part order after a rearrangement
    /// (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_stack_order(&mut self, cycle_index: u64, order: &[usize]) {
        _ = (cycle_index, order);
    }

    /// Called with per-update layer changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_layer_updates(&mut self, cycle_index: u64, updates: &[LayerUpdate]) {
        _ = (cycle_index, updates);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`CycleStartEvent`].
    #[inline]
    pub fn cycle_start(&mut self, e: &CycleStartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_start(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransformUpdateEvent`].
    #[inline]
    pub fn transform_update(&mut self, e: &TransformUpdateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transform_update(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StepEvent`].
    #[inline]
    pub fn step(&mut self, e: &StepEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_step(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RestChoiceEvent`].
    #[inline]
    pub fn rest_choice(&mut self, e: &RestChoiceEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rest_choice(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CycleCompleteEvent`].
    #[inline]
    pub fn cycle_complete(&mut self, e: &CycleCompleteEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_complete(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits the back-to-front part order (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn stack_order(&mut self, cycle_index: u64, order: &[usize]) {
        if let Some(s) = &mut self.sink {
            s.on_stack_order(cycle_index, order);
        }
    }

    /// Emits layer updates (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_updates(&mut self, cycle_index: u64, updates: &[LayerUpdate]) {
        if let Some(s) = &mut self.sink {
            s.on_layer_updates(cycle_index, updates);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_start() -> CycleStartEvent {
        CycleStartEvent {
            cycle_index: 3,
            direction: Direction::Forward,
            at: Some(HostTime(1_000_000)),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_cycle_start(&sample_start());
        sink.on_step(&StepEvent {
            cycle_index: 3,
            step: FlipStep::Midpoint,
            value: 0.5,
        });
        sink.on_cycle_complete(&CycleCompleteEvent {
            cycle_index: 3,
            direction: Direction::Forward,
            at: HostTime(2_000_000),
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.cycle_start(&sample_start());
        tracer.transform_update(&TransformUpdateEvent {
            cycle_index: 3,
            value: 0.25,
            at: None,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            cycles: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_cycle_start(&mut self, e: &CycleStartEvent) {
                self.cycles.push(e.cycle_index);
            }
        }

        let mut sink = RecordingSink { cycles: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.cycle_start(&sample_start());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.cycles, &[3]);
    }
}
