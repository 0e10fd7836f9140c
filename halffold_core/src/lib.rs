// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flip-animation state machine and half-fold layer arrangement.
//!
//! `halffold_core` drives the classic "split flap" illusion: a view is sliced
//! into two half layers, one half folds around the midline with perspective,
//! and at the instant the folding layer crosses the viewer's line of sight its
//! content is swapped so the correct face is always shown. The crate is
//! `no_std` compatible (with `alloc`) and never renders; presentation is an
//! external concern behind the [`Presenter`](present::Presenter) seam.
//!
//! # Architecture
//!
//! Input and time flow through the delegate into the view's layer stack:
//!
//! ```text
//!   gesture / tick source
//!       │
//!       ▼
//!   AnimationDelegate ──► Timeline::value_at() ──► fold transform
//!       │
//!       │ threshold crossing
//!       ▼
//!   LayeredView::rearrange_layers() ──► FrameStack reorder + content swap
//!       │
//!       ▼
//!   FlipChanges ──► Presenter::apply()
//!       │
//!       ▼ (cycle reaches rest)
//!   AnimationObserver::animation_did_finish()
//! ```
//!
//! **[`frame`]** — Ordered stack of per-part layer groups with
//! send-to-front/back reordering.
//!
//! **[`layer`]** — The drawable unit: region, corner radius, facing,
//! content (surface slice or solid fallback), and a once-created shadow
//! sublayer.
//!
//! **[`view`]** — The layered-view contract, source slicing, and the
//! half-fold rearrangement algorithm.
//!
//! **[`delegate`]** — The animation state machine: sequence modes, the
//! at-most-one-in-flight lock, threshold-driven rearrangement, and rest-state
//! settling.
//!
//! **[`timeline`]** — Owned timed interpolation with easing; completion is
//! detected on tick, never awaited.
//!
//! **[`transform`]** — `CATransform3D`-layout 4×4 matrix with the
//! perspective entry and axis rotations the fold needs.
//!
//! **[`time`]** — Monotonic nanosecond timestamps and durations.
//!
//! **[`present`]** — The render seam; presenters apply drained changes to
//! whatever target exists.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) and event types for
//! loop-level instrumentation, with the zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies.
//! - `trace-rich` (disabled by default, implies `trace`): Gates arrangement
//!   dumps.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod delegate;
pub mod frame;
pub mod layer;
pub mod present;
pub mod time;
pub mod timeline;
pub mod trace;
pub mod transform;
pub mod view;
