// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! The rich layer-update event
//! ([`on_layer_updates`](TraceSink::on_layer_updates)) stores only the
//! count; stack-order events store the full order, which is tiny.

use halffold_core::delegate::Direction;
use halffold_core::time::HostTime;
use halffold_core::trace::{
    CycleCompleteEvent, CycleStartEvent, LayerUpdate, RestChoiceEvent, StepEvent, TraceSink,
    TransformUpdateEvent,
};
use halffold_core::view::FlipStep;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_CYCLE_START: u8 = 1;
const TAG_TRANSFORM_UPDATE: u8 = 2;
const TAG_STEP: u8 = 3;
const TAG_REST_CHOICE: u8 = 4;
const TAG_CYCLE_COMPLETE: u8 = 5;
const TAG_STACK_ORDER: u8 = 6;
const TAG_LAYER_UPDATES_COUNT: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_u64(&mut self, v: Option<u64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u64(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_direction(&mut self, d: Direction) {
        self.write_u8(match d {
            Direction::None => 0,
            Direction::Forward => 1,
            Direction::Backward => 2,
        });
    }

    fn write_step(&mut self, s: FlipStep) {
        self.write_u8(match s {
            FlipStep::Begin => 0,
            FlipStep::Midpoint => 1,
            FlipStep::Settle => 2,
            FlipStep::Complete => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        self.write_u8(TAG_CYCLE_START);
        self.write_u64(e.cycle_index);
        self.write_direction(e.direction);
        self.write_option_u64(e.at.map(HostTime::nanos));
    }

    fn on_transform_update(&mut self, e: &TransformUpdateEvent) {
        self.write_u8(TAG_TRANSFORM_UPDATE);
        self.write_u64(e.cycle_index);
        self.write_f64(e.value);
        self.write_option_u64(e.at.map(HostTime::nanos));
    }

    fn on_step(&mut self, e: &StepEvent) {
        self.write_u8(TAG_STEP);
        self.write_u64(e.cycle_index);
        self.write_step(e.step);
        self.write_f64(e.value);
    }

    fn on_rest_choice(&mut self, e: &RestChoiceEvent) {
        self.write_u8(TAG_REST_CHOICE);
        self.write_u64(e.cycle_index);
        self.write_f64(e.value);
        self.write_f64(e.velocity);
        self.write_f64(e.cutoff);
        self.write_direction(e.chosen);
    }

    fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
        self.write_u8(TAG_CYCLE_COMPLETE);
        self.write_u64(e.cycle_index);
        self.write_direction(e.direction);
        self.write_u64(e.at.nanos());
    }

    fn on_stack_order(&mut self, cycle_index: u64, order: &[usize]) {
        self.write_u8(TAG_STACK_ORDER);
        self.write_u64(cycle_index);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "part count capped at u32::MAX for recording"
        )]
        self.write_u32(order.len().min(u32::MAX as usize) as u32);
        for &part in order {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "part numbers are small by construction"
            )]
            self.write_u8(part.min(u8::MAX as usize) as u8);
        }
    }

    fn on_layer_updates(&mut self, cycle_index: u64, updates: &[LayerUpdate]) {
        self.write_u8(TAG_LAYER_UPDATES_COUNT);
        self.write_u64(cycle_index);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "layer update count capped at u32::MAX for recording"
        )]
        self.write_u32(updates.len().min(u32::MAX as usize) as u32);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`CycleStartEvent`].
    CycleStart(CycleStartEvent),
    /// A [`TransformUpdateEvent`].
    TransformUpdate(TransformUpdateEvent),
    /// A [`StepEvent`].
    Step(StepEvent),
    /// A [`RestChoiceEvent`].
    RestChoice(RestChoiceEvent),
    /// A [`CycleCompleteEvent`].
    CycleComplete(CycleCompleteEvent),
    /// Back-to-front part order after a rearrangement.
    StackOrder {
        /// Cycle counter.
        cycle_index: u64,
        /// Back-to-front part numbers.
        order: Vec<usize>,
    },
    /// Layer-update count for a cycle.
    LayerUpdatesCount {
        /// Cycle counter.
        cycle_index: u64,
        /// Number of layer updates.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = f64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_option_u64(&mut self) -> Option<Option<u64>> {
        let present = self.read_u8()?;
        let val = self.read_u64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_direction(&mut self) -> Option<Direction> {
        Some(match self.read_u8()? {
            0 => Direction::None,
            1 => Direction::Forward,
            _ => Direction::Backward,
        })
    }

    fn read_step(&mut self) -> Option<FlipStep> {
        Some(match self.read_u8()? {
            0 => FlipStep::Begin,
            1 => FlipStep::Midpoint,
            2 => FlipStep::Settle,
            _ => FlipStep::Complete,
        })
    }

    fn decode_cycle_start(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CycleStart(CycleStartEvent {
            cycle_index: self.read_u64()?,
            direction: self.read_direction()?,
            at: self.read_option_u64()?.map(HostTime),
        }))
    }

    fn decode_transform_update(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransformUpdate(TransformUpdateEvent {
            cycle_index: self.read_u64()?,
            value: self.read_f64()?,
            at: self.read_option_u64()?.map(HostTime),
        }))
    }

    fn decode_step(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Step(StepEvent {
            cycle_index: self.read_u64()?,
            step: self.read_step()?,
            value: self.read_f64()?,
        }))
    }

    fn decode_rest_choice(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RestChoice(RestChoiceEvent {
            cycle_index: self.read_u64()?,
            value: self.read_f64()?,
            velocity: self.read_f64()?,
            cutoff: self.read_f64()?,
            chosen: self.read_direction()?,
        }))
    }

    fn decode_cycle_complete(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CycleComplete(CycleCompleteEvent {
            cycle_index: self.read_u64()?,
            direction: self.read_direction()?,
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_stack_order(&mut self) -> Option<RecordedEvent> {
        let cycle_index = self.read_u64()?;
        let count = self.read_u32()?;
        let mut order = Vec::with_capacity(count as usize);
        for _ in 0..count {
            order.push(usize::from(self.read_u8()?));
        }
        Some(RecordedEvent::StackOrder { cycle_index, order })
    }

    fn decode_layer_updates_count(&mut self) -> Option<RecordedEvent> {
        let cycle_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::LayerUpdatesCount { cycle_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_CYCLE_START => self.decode_cycle_start(),
            TAG_TRANSFORM_UPDATE => self.decode_transform_update(),
            TAG_STEP => self.decode_step(),
            TAG_REST_CHOICE => self.decode_rest_choice(),
            TAG_CYCLE_COMPLETE => self.decode_cycle_complete(),
            TAG_STACK_ORDER => self.decode_stack_order(),
            TAG_LAYER_UPDATES_COUNT => self.decode_layer_updates_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
