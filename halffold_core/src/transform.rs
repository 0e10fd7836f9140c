// Copyright 2026 the Halffold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 transform for the fold.
//!
//! This type covers the subset of 3-D transforms the flip illusion actually
//! needs (identity, axis rotations, the perspective entry, multiply) without
//! pulling in a full linear-algebra crate.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Which axis a folding layer rotates around.
///
/// A vertical flip (top half folding down) rotates around X; a horizontal
/// flip (page turn) rotates around Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    /// Rotation around the horizontal axis.
    X,
    /// Rotation around the vertical axis.
    Y,
}

/// A column-major 4×4 transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// used by GPU APIs and Core Animation's `CATransform3D`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a rotation around the X axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_x(radians: f64) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Y axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_y(radians: f64) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates an identity transform with the perspective entry set.
    ///
    /// `depth` is the eye distance: the matrix maps z onto w as
    /// `m34 = -1 / depth`, so smaller depths exaggerate the fold. Typical
    /// values range from 200 to 2000.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is not strictly positive.
    #[inline]
    #[must_use]
    pub fn with_perspective(depth: f64) -> Self {
        assert!(depth > 0.0, "perspective depth must be positive");
        let mut t = Self::IDENTITY;
        // Column-major: m34 lives in column 2, row 3.
        t.cols[2][3] = -1.0 / depth;
        t
    }

    /// Builds the transform applied to a folding layer: perspective composed
    /// with a rotation of `radians` around `axis`.
    #[must_use]
    pub fn flip(axis: RotationAxis, radians: f64, depth: f64) -> Self {
        let rotation = match axis {
            RotationAxis::X => Self::from_rotation_x(radians),
            RotationAxis::Y => Self::from_rotation_y(radians),
        };
        Self::with_perspective(depth) * rotation
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Returns the perspective entry (`m34` in `CATransform3D` terms).
    #[inline]
    #[must_use]
    pub const fn perspective_entry(self) -> f64 {
        self.cols[2][3]
    }

    /// Is every element of this transform [finite](f64::is_finite)?
    #[inline]
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        let c = &self.cols;
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                if !c[j][i].is_finite() {
                    return false;
                }
                i += 1;
            }
            j += 1;
        }
        true
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

#[inline]
fn sin_cos(radians: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    {
        radians.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (radians.sin(), radians.cos())
    }
}
