//! Light state primitives
//!
//! A `LightState` is a Jones-style vector: two complex transverse field
//! amplitudes (Ex, Ey). Magnitude-squared sum is the beam intensity.

use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Circular polarization handedness, looking into the beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Right,
    Left,
}

/// A coherent, fully polarized light state: complex field amplitudes along
/// the reference x and y axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    pub ex: Complex<f64>,
    pub ey: Complex<f64>,
}

impl LightState {
    pub fn new(ex: Complex<f64>, ey: Complex<f64>) -> Self {
        Self { ex, ey }
    }

    /// Unit-intensity linear polarization at `angle` radians from the x axis
    pub fn linear(angle_rad: f64) -> Self {
        Self {
            ex: Complex::new(angle_rad.cos(), 0.0),
            ey: Complex::new(angle_rad.sin(), 0.0),
        }
    }

    /// Unit-intensity horizontal linear polarization
    pub fn horizontal() -> Self {
        Self::linear(0.0)
    }

    /// Unit-intensity vertical linear polarization
    pub fn vertical() -> Self {
        Self::linear(std::f64::consts::FRAC_PI_2)
    }

    /// Unit-intensity circular polarization.
    ///
    /// Right-handed means Ey leads Ex by a quarter cycle (Ey = +i·Ex);
    /// left-handed means Ey lags. A quarter-wave plate with fast axis at 0°
    /// turns 45° linear input into the left-handed state.
    pub fn circular(handedness: Handedness) -> Self {
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        let ey = match handedness {
            Handedness::Right => Complex::new(0.0, inv_sqrt2),
            Handedness::Left => Complex::new(0.0, -inv_sqrt2),
        };
        Self {
            ex: Complex::new(inv_sqrt2, 0.0),
            ey,
        }
    }

    /// Beam intensity: |Ex|² + |Ey|²
    #[inline]
    pub fn intensity(&self) -> f64 {
        self.ex.norm_sqr() + self.ey.norm_sqr()
    }

    /// Inner product ⟨self|other⟩ = conj(Ex)·ox + conj(Ey)·oy
    #[inline]
    pub fn inner(&self, other: &LightState) -> Complex<f64> {
        self.ex.conj() * other.ex + self.ey.conj() * other.ey
    }

    /// Scale the state so its intensity equals `intensity`.
    ///
    /// Returns `None` for a zero-norm state, which has no direction to scale.
    pub fn scaled_to(&self, intensity: f64) -> Option<Self> {
        let current = self.intensity();
        if current <= 0.0 {
            return None;
        }
        let factor = (intensity / current).sqrt();
        Some(Self {
            ex: self.ex * factor,
            ey: self.ey * factor,
        })
    }

    /// Unit-intensity copy, or `None` for a zero-norm state
    pub fn normalized(&self) -> Option<Self> {
        self.scaled_to(1.0)
    }

    /// Both amplitudes are finite (no NaN/inf leaked in)
    pub fn is_finite(&self) -> bool {
        self.ex.re.is_finite()
            && self.ex.im.is_finite()
            && self.ey.re.is_finite()
            && self.ey.im.is_finite()
    }

    /// Componentwise comparison within `tol`
    pub fn approx_eq(&self, other: &LightState, tol: f64) -> bool {
        (self.ex - other.ex).norm() <= tol && (self.ey - other.ey).norm() <= tol
    }
}

/// The light state at the start of the chain, plus its declared total
/// intensity. Created once per puzzle instance, read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitterState {
    /// Emitter output, already scaled to `intensity`
    pub state: LightState,
    /// Declared total intensity
    pub intensity: f64,
}

impl EmitterState {
    /// Build an emitter from a unit-direction state and a total intensity.
    ///
    /// Callers validate the inputs (see the adapter); this only does the
    /// scaling.
    pub(crate) fn from_direction(direction: LightState, intensity: f64) -> Option<Self> {
        let state = direction.scaled_to(intensity)?;
        Some(Self { state, intensity })
    }
}
