//! Stokes-parameter descriptors
//!
//! Conversions from Jones states to Stokes parameters, used for the
//! alternate fidelity metric and for naming what a beam actually is in
//! victory feedback. Jones states are fully polarized, so the degree of
//! polarization is always 1 up to floating error.

use serde::{Deserialize, Serialize};

use super::state::LightState;
use crate::normalize_axis_angle_deg;

/// Stokes parameters (S0, S1, S2, S3) of a light state.
///
/// S0: total intensity; S1: horizontal−vertical difference;
/// S2: ±45° difference; S3: circular component (positive when Ey lags Ex,
/// i.e. left-handed in this engine's convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StokesVector {
    pub s0: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

impl StokesVector {
    /// Compute Stokes parameters from a Jones state:
    /// S0 = |Ex|²+|Ey|², S1 = |Ex|²−|Ey|²,
    /// S2 = 2·Re(Ex·conj(Ey)), S3 = 2·Im(Ex·conj(Ey))
    pub fn from_state(state: &LightState) -> Self {
        let cross = state.ex * state.ey.conj();
        Self {
            s0: state.intensity(),
            s1: state.ex.norm_sqr() - state.ey.norm_sqr(),
            s2: 2.0 * cross.re,
            s3: 2.0 * cross.im,
        }
    }

    /// Degree of polarization: √(S1²+S2²+S3²)/S0, 1 for any Jones state
    pub fn degree_of_polarization(&self) -> f64 {
        if self.s0 <= 0.0 {
            return 0.0;
        }
        (self.s1 * self.s1 + self.s2 * self.s2 + self.s3 * self.s3).sqrt() / self.s0
    }

    /// Intensity-normalized (s1, s2, s3), or `None` for a dark beam
    pub fn normalized(&self) -> Option<(f64, f64, f64)> {
        if self.s0 <= 0.0 {
            return None;
        }
        Some((self.s1 / self.s0, self.s2 / self.s0, self.s3 / self.s0))
    }

    /// Polarization ellipse orientation ψ = ½·atan2(s2, s1), folded to
    /// [0, 180) degrees
    pub fn ellipse_orientation_deg(&self) -> f64 {
        if self.s1.abs() < f64::EPSILON && self.s2.abs() < f64::EPSILON {
            return 0.0;
        }
        normalize_axis_angle_deg((0.5 * self.s2.atan2(self.s1)).to_degrees())
    }

    /// Ellipticity angle χ = ½·asin(s3/s0) in degrees; 0 for linear,
    /// ±45° for circular
    pub fn ellipticity_angle_deg(&self) -> f64 {
        if self.s0 <= 0.0 {
            return 0.0;
        }
        (0.5 * (self.s3 / self.s0).clamp(-1.0, 1.0).asin()).to_degrees()
    }
}

/// What kind of polarization a beam carries, in puzzle-feedback terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PolarizationKind {
    Linear { angle_deg: f64 },
    CircularRight,
    CircularLeft,
    Elliptical { angle_deg: f64 },
}

impl PolarizationKind {
    /// Short human-readable label for victory feedback
    pub fn describe(&self) -> String {
        match self {
            PolarizationKind::Linear { angle_deg } => {
                format!("linear at {angle_deg:.1}°")
            }
            PolarizationKind::CircularRight => "right circular".to_string(),
            PolarizationKind::CircularLeft => "left circular".to_string(),
            PolarizationKind::Elliptical { angle_deg } => {
                format!("elliptical at {angle_deg:.1}°")
            }
        }
    }
}

/// Classify a state's polarization shape.
///
/// Phase difference near 0 or π means linear; equal magnitudes with phase
/// near ±π/2 means circular (sign picks handedness, positive = Ey leads =
/// right); anything else is elliptical with the ellipse orientation.
pub fn classify(state: &LightState, tolerance: f64) -> Option<PolarizationKind> {
    use std::f64::consts::{FRAC_PI_2, PI};

    let normalized = state.normalized()?;
    let ex = normalized.ex;
    let ey = normalized.ey;

    // Degenerate axes: all the light on one axis is linear by definition
    if ey.norm() < tolerance {
        return Some(PolarizationKind::Linear { angle_deg: 0.0 });
    }
    if ex.norm() < tolerance {
        return Some(PolarizationKind::Linear { angle_deg: 90.0 });
    }

    let mut phase_diff = ey.arg() - ex.arg();
    phase_diff = (phase_diff + PI).rem_euclid(2.0 * PI) - PI;

    if phase_diff.abs() < tolerance || (phase_diff.abs() - PI).abs() < tolerance {
        // Re-signed components give the orientation directly
        let sign = if phase_diff.abs() < tolerance { 1.0 } else { -1.0 };
        let angle = (sign * ey.norm()).atan2(ex.norm()).to_degrees();
        return Some(PolarizationKind::Linear {
            angle_deg: normalize_axis_angle_deg(angle),
        });
    }

    let magnitude_ratio = ey.norm() / ex.norm();
    if (magnitude_ratio - 1.0).abs() < tolerance
        && (phase_diff.abs() - FRAC_PI_2).abs() < tolerance
    {
        return Some(if phase_diff > 0.0 {
            PolarizationKind::CircularRight
        } else {
            PolarizationKind::CircularLeft
        });
    }

    let stokes = StokesVector::from_state(&normalized);
    Some(PolarizationKind::Elliptical {
        angle_deg: stokes.ellipse_orientation_deg(),
    })
}
