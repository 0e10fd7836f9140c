// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frames and the orderable frame stack.
//!
//! A [`Frame`] groups the layers that together display one logical part of an
//! animation cycle. Frames are created once during view construction and only
//! *reordered* afterwards; the stack is the sole owner of every frame and its
//! layers.
//!
//! Reordering a frame that is not in the stack is a caller bug and panics
//! rather than silently doing nothing.

use alloc::vec::Vec;

use crate::layer::FlipLayer;

/// One logical part's layer group.
///
/// `part` is a stable identity assigned at construction (0-based part
/// number); it never changes as the frame moves through the stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Stable part number within the view.
    pub part: usize,
    /// The frame's layers, first is the primary layer.
    pub layers: Vec<FlipLayer>,
}

impl Frame {
    /// Creates a frame for part `part` with the given layers.
    ///
    /// # Panics
    ///
    /// Panics if `layers` is empty; a frame always has a primary layer.
    #[must_use]
    pub fn new(part: usize, layers: Vec<FlipLayer>) -> Self {
        assert!(!layers.is_empty(), "frame must have a primary layer");
        Self { part, layers }
    }

    /// The frame's primary layer.
    #[must_use]
    pub fn primary(&self) -> &FlipLayer {
        &self.layers[0]
    }

    /// Mutable access to the primary layer.
    pub fn primary_mut(&mut self) -> &mut FlipLayer {
        &mut self.layers[0]
    }
}

/// An ordered stack of frames, back to front.
///
/// Position 0 is the backmost frame; the last position renders frontmost.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Appends a frame at the front (top) of the stack.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Back-to-front iteration.
    pub fn iter(&self) -> core::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Returns the stack position of the frame for `part`, if present.
    #[must_use]
    pub fn position_of(&self, part: usize) -> Option<usize> {
        self.frames.iter().position(|f| f.part == part)
    }

    /// Back-to-front part numbers, for order assertions and diagnostics.
    #[must_use]
    pub fn order(&self) -> Vec<usize> {
        self.frames.iter().map(|f| f.part).collect()
    }

    /// The frame for `part`.
    ///
    /// # Panics
    ///
    /// Panics if no frame with that part number is in the stack.
    #[must_use]
    pub fn frame(&self, part: usize) -> &Frame {
        let pos = self.require(part);
        &self.frames[pos]
    }

    /// Mutable access to the frame for `part`.
    ///
    /// # Panics
    ///
    /// Panics if no frame with that part number is in the stack.
    pub fn frame_mut(&mut self, part: usize) -> &mut Frame {
        let pos = self.require(part);
        &mut self.frames[pos]
    }

    /// The frontmost frame.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[must_use]
    pub fn front(&self) -> &Frame {
        self.frames.last().expect("frame stack is empty")
    }

    /// Moves the frame for `part` to the front, preserving the relative
    /// order of all other frames.
    ///
    /// # Panics
    ///
    /// Panics if no frame with that part number is in the stack.
    pub fn send_to_front(&mut self, part: usize) {
        let pos = self.require(part);
        let frame = self.frames.remove(pos);
        self.frames.push(frame);
    }

    /// Moves the frame for `part` to the back, preserving the relative order
    /// of all other frames.
    ///
    /// # Panics
    ///
    /// Panics if no frame with that part number is in the stack.
    pub fn send_to_back(&mut self, part: usize) {
        let pos = self.require(part);
        let frame = self.frames.remove(pos);
        self.frames.insert(0, frame);
    }

    fn require(&self, part: usize) -> usize {
        match self.position_of(part) {
            Some(pos) => pos,
            None => panic!("frame for part {part} is not in the stack"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::layer::{FlipLayer, LayerContent, Rgba};

    fn frame(part: usize) -> Frame {
        let layer = FlipLayer::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            0.0,
            true,
            LayerContent::Solid(Rgba::rgb(0.5, 0.5, 0.5)),
        );
        Frame::new(part, vec![layer])
    }

    fn stack_of(parts: &[usize]) -> FrameStack {
        let mut stack = FrameStack::new();
        for &p in parts {
            stack.push(frame(p));
        }
        stack
    }

    #[test]
    fn send_to_front_moves_only_the_target() {
        let mut stack = stack_of(&[0, 1, 2, 3]);
        stack.send_to_front(1);
        assert_eq!(stack.order(), vec![0, 2, 3, 1]);
    }

    #[test]
    fn send_to_back_moves_only_the_target() {
        let mut stack = stack_of(&[0, 1, 2, 3]);
        stack.send_to_back(2);
        assert_eq!(stack.order(), vec![2, 0, 1, 3]);
    }

    #[test]
    fn reorder_is_stable_for_extremes() {
        let mut stack = stack_of(&[0, 1]);
        stack.send_to_front(1);
        assert_eq!(stack.order(), vec![0, 1], "front frame stays put");
        stack.send_to_back(0);
        assert_eq!(stack.order(), vec![0, 1], "back frame stays put");
    }

    #[test]
    fn front_is_last_position() {
        let mut stack = stack_of(&[0, 1]);
        assert_eq!(stack.front().part, 1);
        stack.send_to_front(0);
        assert_eq!(stack.front().part, 0);
    }

    #[test]
    #[should_panic(expected = "frame for part 9 is not in the stack")]
    fn send_to_front_absent_part_panics() {
        let mut stack = stack_of(&[0, 1]);
        stack.send_to_front(9);
    }

    #[test]
    #[should_panic(expected = "frame for part 9 is not in the stack")]
    fn send_to_back_absent_part_panics() {
        let mut stack = stack_of(&[0, 1]);
        stack.send_to_back(9);
    }

    #[test]
    #[should_panic(expected = "frame must have a primary layer")]
    fn empty_frame_panics() {
        let _ = Frame::new(0, vec![]);
    }
}
