// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded traces.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes a JSON array
//! of event objects to the given writer, one object per recorded event with
//! millisecond timestamps. The output is self-describing and loads directly
//! into notebook or plotting tooling.

use std::io::{self, Write};

use serde_json::{Value, json};

use halffold_core::time::HostTime;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::CycleStart(e) => {
                events.push(json!({
                    "event": "cycle_start",
                    "cycle": e.cycle_index,
                    "direction": format!("{:?}", e.direction),
                    "ts_ms": e.at.map(nanos_to_ms),
                }));
            }
            RecordedEvent::TransformUpdate(e) => {
                events.push(json!({
                    "event": "transform_update",
                    "cycle": e.cycle_index,
                    "value": e.value,
                    "ts_ms": e.at.map(nanos_to_ms),
                }));
            }
            RecordedEvent::Step(e) => {
                events.push(json!({
                    "event": "step",
                    "cycle": e.cycle_index,
                    "step": format!("{:?}", e.step),
                    "value": e.value,
                }));
            }
            RecordedEvent::RestChoice(e) => {
                events.push(json!({
                    "event": "rest_choice",
                    "cycle": e.cycle_index,
                    "value": e.value,
                    "velocity": e.velocity,
                    "cutoff": e.cutoff,
                    "chosen": format!("{:?}", e.chosen),
                }));
            }
            RecordedEvent::CycleComplete(e) => {
                events.push(json!({
                    "event": "cycle_complete",
                    "cycle": e.cycle_index,
                    "direction": format!("{:?}", e.direction),
                    "ts_ms": nanos_to_ms(e.at),
                }));
            }
            RecordedEvent::StackOrder { cycle_index, order } => {
                events.push(json!({
                    "event": "stack_order",
                    "cycle": cycle_index,
                    "order": order,
                }));
            }
            RecordedEvent::LayerUpdatesCount { cycle_index, count } => {
                events.push(json!({
                    "event": "layer_updates",
                    "cycle": cycle_index,
                    "count": count,
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn nanos_to_ms(t: HostTime) -> f64 {
    t.nanos() as f64 / 1_000_000.0
}
