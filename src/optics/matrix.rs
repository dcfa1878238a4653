//! 2×2 complex transformation matrices
//!
//! A `ComponentMatrix` is the linear transformation an optical element
//! applies to a `LightState`. Polarizers are projective (idempotent, may
//! reduce intensity); waveplates and rotators are unitary (intensity
//! preserving).

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::state::LightState;

/// Row-major 2×2 complex matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentMatrix {
    pub m00: Complex<f64>,
    pub m01: Complex<f64>,
    pub m10: Complex<f64>,
    pub m11: Complex<f64>,
}

impl ComponentMatrix {
    pub fn new(
        m00: Complex<f64>,
        m01: Complex<f64>,
        m10: Complex<f64>,
        m11: Complex<f64>,
    ) -> Self {
        Self { m00, m01, m10, m11 }
    }

    pub fn identity() -> Self {
        Self::diagonal(Complex::new(1.0, 0.0), Complex::new(1.0, 0.0))
    }

    pub fn diagonal(a: Complex<f64>, b: Complex<f64>) -> Self {
        let zero = Complex::new(0.0, 0.0);
        Self::new(a, zero, zero, b)
    }

    /// Real active rotation by `angle` radians (counterclockwise looking
    /// into the beam)
    pub fn rotation(angle_rad: f64) -> Self {
        let c = Complex::new(angle_rad.cos(), 0.0);
        let s = Complex::new(angle_rad.sin(), 0.0);
        Self::new(c, -s, s, c)
    }

    /// Apply to a state: returns `self × state` as a new `LightState`
    #[inline]
    pub fn apply(&self, state: &LightState) -> LightState {
        LightState::new(
            self.m00 * state.ex + self.m01 * state.ey,
            self.m10 * state.ex + self.m11 * state.ey,
        )
    }

    /// Matrix product `self × other` (apply `other` first, then `self`)
    pub fn compose(&self, other: &ComponentMatrix) -> Self {
        Self::new(
            self.m00 * other.m00 + self.m01 * other.m10,
            self.m00 * other.m01 + self.m01 * other.m11,
            self.m10 * other.m00 + self.m11 * other.m10,
            self.m10 * other.m01 + self.m11 * other.m11,
        )
    }

    /// Conjugate into a basis rotated by `angle` radians:
    /// R(angle) · self · R(−angle).
    ///
    /// An element whose eigenbasis sits at `angle` is its axis-aligned
    /// matrix conjugated this way.
    pub fn in_rotated_basis(&self, angle_rad: f64) -> Self {
        ComponentMatrix::rotation(angle_rad)
            .compose(self)
            .compose(&ComponentMatrix::rotation(-angle_rad))
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> Self {
        Self::new(
            self.m00.conj(),
            self.m10.conj(),
            self.m01.conj(),
            self.m11.conj(),
        )
    }

    /// M†·M ≈ I within `tol` (intensity-preserving transformation)
    pub fn is_unitary(&self, tol: f64) -> bool {
        self.adjoint().compose(self).approx_eq(&Self::identity(), tol)
    }

    /// M·M ≈ M within `tol` (projective transformation)
    pub fn is_idempotent(&self, tol: f64) -> bool {
        self.compose(self).approx_eq(self, tol)
    }

    /// Entrywise comparison within `tol`
    pub fn approx_eq(&self, other: &ComponentMatrix, tol: f64) -> bool {
        (self.m00 - other.m00).norm() <= tol
            && (self.m01 - other.m01).norm() <= tol
            && (self.m10 - other.m10).norm() <= tol
            && (self.m11 - other.m11).norm() <= tol
    }
}
