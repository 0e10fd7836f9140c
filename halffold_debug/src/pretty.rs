// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).
//! Timestamps are printed in milliseconds.

use std::io::Write;

use halffold_core::delegate::Direction;
use halffold_core::time::HostTime;
use halffold_core::trace::{
    CycleCompleteEvent, CycleStartEvent, RestChoiceEvent, StepEvent, TraceSink,
    TransformUpdateEvent,
};
use halffold_core::view::FlipStep;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn host_ms(t: HostTime) -> f64 {
    t.nanos() as f64 / 1_000_000.0
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::None => "none",
        Direction::Forward => "forward",
        Direction::Backward => "backward",
    }
}

fn step_name(step: FlipStep) -> &'static str {
    match step {
        FlipStep::Begin => "begin",
        FlipStep::Midpoint => "midpoint",
        FlipStep::Settle => "settle",
        FlipStep::Complete => "complete",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        match e.at {
            Some(at) => {
                let _ = writeln!(
                    self.writer,
                    "[cycle:start] cycle={} direction={} at {:.1}ms",
                    e.cycle_index,
                    direction_name(e.direction),
                    host_ms(at),
                );
            }
            None => {
                let _ = writeln!(
                    self.writer,
                    "[cycle:start] cycle={} direction={}",
                    e.cycle_index,
                    direction_name(e.direction),
                );
            }
        }
    }

    fn on_transform_update(&mut self, e: &TransformUpdateEvent) {
        let _ = writeln!(
            self.writer,
            "[transform] cycle={} value={:.3}",
            e.cycle_index, e.value,
        );
    }

    fn on_step(&mut self, e: &StepEvent) {
        let _ = writeln!(
            self.writer,
            "[step] cycle={} {} at value={:.3}",
            e.cycle_index,
            step_name(e.step),
            e.value,
        );
    }

    fn on_rest_choice(&mut self, e: &RestChoiceEvent) {
        let _ = writeln!(
            self.writer,
            "[rest] cycle={} value={:.3} velocity={:.2} cutoff={:.2} chose={}",
            e.cycle_index,
            e.value,
            e.velocity,
            e.cutoff,
            direction_name(e.chosen),
        );
    }

    fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
        let _ = writeln!(
            self.writer,
            "[cycle:complete] cycle={} direction={} at {:.1}ms",
            e.cycle_index,
            direction_name(e.direction),
            host_ms(e.at),
        );
    }

    fn on_stack_order(&mut self, cycle_index: u64, order: &[usize]) {
        let _ = writeln!(self.writer, "[stack] cycle={cycle_index} order={order:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_event() {
        let mut out = Vec::new();
        {
            let mut sink = PrettyPrintSink::with_writer(&mut out);
            sink.on_cycle_start(&CycleStartEvent {
                cycle_index: 0,
                direction: Direction::Forward,
                at: Some(HostTime(1_500_000)),
            });
            sink.on_step(&StepEvent {
                cycle_index: 0,
                step: FlipStep::Midpoint,
                value: 0.52,
            });
            sink.on_cycle_complete(&CycleCompleteEvent {
                cycle_index: 0,
                direction: Direction::Forward,
                at: HostTime(400_000_000),
            });
        }
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "[cycle:start] cycle=0 direction=forward at 1.5ms");
        assert_eq!(lines[1], "[step] cycle=0 midpoint at value=0.520");
        assert_eq!(lines[2], "[cycle:complete] cycle=0 direction=forward at 400.0ms");
    }

    #[test]
    fn stack_order_line() {
        let mut out = Vec::new();
        {
            let mut sink = PrettyPrintSink::with_writer(&mut out);
            sink.on_stack_order(3, &[1, 0]);
        }
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "[stack] cycle=3 order=[1, 0]\n");
    }
}
