// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawable unit of a flip.
//!
//! A [`FlipLayer`] is one rectangular surface in the fold: a region of the
//! view, content to show there, an explicit [`Facing`] attribute, and a
//! shadow sublayer created once at construction and toggled thereafter.
//!
//! Content is never rendered here. Image-backed content is an opaque
//! [`SurfaceId`] plus a source region, resolved by an external imaging
//! pipeline; a missing source falls back to a solid color. Keeping facing and
//! content explicit (instead of relying on a compositor's double-sided
//! rendering) is what lets the fold present the adjacent frame's content
//! directly, without flicker.

use core::fmt;

use kurbo::Rect;

use crate::transform::Transform3d;

/// An opaque reference to a content surface.
///
/// Surfaces are created and managed externally (e.g. by an imaging pipeline).
/// The core only slices and swaps references to them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// A straight-alpha RGBA color for solid-fill fallback layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Red, 0–1.
    pub r: f32,
    /// Green, 0–1.
    pub g: f32,
    /// Blue, 0–1.
    pub b: f32,
    /// Alpha, 0–1.
    pub a: f32,
}

impl Rgba {
    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// What a layer draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayerContent {
    /// A region of an externally managed surface.
    Slice {
        /// The source surface.
        surface: SurfaceId,
        /// Source region within that surface.
        region: Rect,
    },
    /// A solid fill, used when no source surface exists.
    Solid(Rgba),
}

impl LayerContent {
    /// Restricts this content to `region`.
    ///
    /// For a [`Slice`](Self::Slice) the source region is replaced; a solid
    /// fill is unaffected.
    #[must_use]
    pub fn restricted_to(self, region: Rect) -> Self {
        match self {
            Self::Slice { surface, .. } => Self::Slice { surface, region },
            Self::Solid(color) => Self::Solid(color),
        }
    }
}

/// Which side of a layer currently faces the viewer.
///
/// A layer past 90° of rotation faces [`Back`](Self::Back) and must present
/// the adjacent frame's content rather than its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// The layer's own content faces the viewer.
    #[default]
    Front,
    /// The layer faces away; substituted content is shown.
    Back,
}

/// A shadow sublayer.
///
/// Created exactly once per layer and toggled for the rest of the layer's
/// life; rearrangement never recreates it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Current opacity when visible.
    pub opacity: f64,
    /// Whether the shadow contributes at all.
    pub visible: bool,
}

impl Shadow {
    /// Resting opacity of a visible fold shadow.
    pub const BASE_OPACITY: f64 = 0.5;

    /// A hidden shadow at resting opacity.
    #[inline]
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            opacity: Self::BASE_OPACITY,
            visible: false,
        }
    }
}

/// One rectangular drawable region of the fold.
#[derive(Clone, Debug, PartialEq)]
pub struct FlipLayer {
    /// The region of the view this layer covers.
    pub region: Rect,
    /// Corner radius, a view-level constant.
    pub corner_radius: f64,
    /// Whether the layer logically has two faces. Content substitution makes
    /// the back face explicit; this flag only records the geometry.
    pub double_sided: bool,
    /// Which side currently faces the viewer.
    pub facing: Facing,
    /// Current content.
    pub content: LayerContent,
    /// Layer opacity.
    pub opacity: f64,
    /// Current transform (identity at rest).
    pub transform: Transform3d,
    /// The once-created shadow sublayer.
    pub shadow: Shadow,
    /// Stacking hint within the overall view; higher renders in front.
    pub z_position: f64,
}

impl FlipLayer {
    /// Creates a layer at rest: front-facing, fully opaque, identity
    /// transform, hidden shadow.
    #[must_use]
    pub fn new(region: Rect, corner_radius: f64, double_sided: bool, content: LayerContent) -> Self {
        Self {
            region,
            corner_radius,
            double_sided,
            facing: Facing::Front,
            content,
            opacity: 1.0,
            transform: Transform3d::IDENTITY,
            shadow: Shadow::hidden(),
            z_position: 0.0,
        }
    }

    /// Resets transform, opacity, facing, and shadow to their rest values.
    /// Content is left alone; restoring it is the caller's decision.
    pub fn reset_to_rest(&mut self) {
        self.facing = Facing::Front;
        self.opacity = 1.0;
        self.transform = Transform3d::IDENTITY;
        self.shadow = Shadow::hidden();
    }
}
