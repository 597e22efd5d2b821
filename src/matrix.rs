//! Affine transformation matrices.
//!
//! Input drivers apply a *calibration matrix* to every device position before reporting it. The
//! matrix is the top two rows of a 3×3 affine transform acting on normalized device coordinates
//! (where `0.0` and `1.0` are the edges of the device's input area):
//!
//! ```text
//! ⎡x'⎤   ⎡a b c⎤ ⎡x⎤
//! ⎢y'⎥ = ⎢d e f⎥ ⎢y⎥
//! ⎣1 ⎦   ⎣0 0 1⎦ ⎣1⎦
//! ```
//!
//! # Serde support
//!
//! With the `serde` feature, [`TransformationMatrix`] serializes as a sequence of its six
//! coefficients in row-major order.

#[cfg(any(test, feature = "serde"))]
mod serde;

use std::{fmt, ops::Mul};

/// A 2×3 affine transformation matrix.
///
/// Matrices are combined with [`TransformationMatrix::compose`] or the `*` operator: `l * r` is
/// the transform that applies `r` first and `l` second. Composition is associative but not
/// commutative.
///
/// Equality compares the six coefficients exactly, without any tolerance.
#[derive(Clone, Copy, PartialEq)]
pub struct TransformationMatrix {
    coefficients: [f32; 6],
}

impl TransformationMatrix {
    /// The identity transform, mapping every point to itself.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0);

    /// Creates a matrix from its coefficients.
    ///
    /// The resulting transform is `x' = a·x + b·y + c`, `y' = d·x + e·y + f`.
    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self {
            coefficients: [a, b, c, d, e, f],
        }
    }

    /// Creates a matrix from its coefficients, in row-major order.
    #[inline]
    pub const fn from_array(coefficients: [f32; 6]) -> Self {
        Self { coefficients }
    }

    /// Returns the coefficients in row-major order.
    #[inline]
    pub const fn as_array(&self) -> &[f32; 6] {
        &self.coefficients
    }

    /// Returns a matrix that scales the X axis by `sx` and the Y axis by `sy`.
    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// Returns a matrix that moves every point by `(tx, ty)`.
    #[inline]
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, tx, 0.0, 1.0, ty)
    }

    /// Returns the transform that applies `rhs` first, then `self`.
    ///
    /// This is the matrix product `self · rhs`, and is also available as `self * rhs`.
    pub fn compose(&self, rhs: &Self) -> Self {
        let [la, lb, lc, ld, le, lf] = self.coefficients;
        let [ra, rb, rc, rd, re, rf] = rhs.coefficients;
        Self::new(
            la * ra + lb * rd,
            la * rb + lb * re,
            la * rc + lb * rf + lc,
            ld * ra + le * rd,
            ld * rb + le * re,
            ld * rc + le * rf + lf,
        )
    }

    /// Applies the transform to the point `(x, y)`.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.coefficients;
        (a * x + b * y + c, d * x + e * y + f)
    }
}

impl Default for TransformationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; 6]> for TransformationMatrix {
    fn from(coefficients: [f32; 6]) -> Self {
        Self::from_array(coefficients)
    }
}

impl From<TransformationMatrix> for [f32; 6] {
    fn from(matrix: TransformationMatrix) -> Self {
        matrix.coefficients
    }
}

impl Mul for TransformationMatrix {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

impl fmt::Debug for TransformationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransformationMatrix")
            .field(&self.coefficients)
            .finish()
    }
}

/// Formats the matrix as `[a b c; d e f]`.
impl fmt::Display for TransformationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.coefficients;
        write!(f, "[{a} {b} {c}; {d} {e} {g}]")
    }
}
