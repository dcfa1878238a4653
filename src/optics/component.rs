//! Optical component variants and their Jones matrices
//!
//! Each puzzle component maps to one matrix:
//! - Polarizer: projection onto the transmission axis (Malus's law)
//! - Waveplate: relative phase shift between fast and slow axes
//! - Rotator: rotation of the polarization plane
//!
//! Angles are degrees at this surface and converted to radians before any
//! trigonometric use. Retardance is radians.

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::matrix::ComponentMatrix;
use super::state::LightState;
use crate::error::EngineError;
use crate::{consts, normalize_axis_angle_deg};

/// An optical element placed in the puzzle chain.
///
/// Immutable once placed; the player replaces components wholesale when
/// editing the chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OpticalComponent {
    /// Linear polarizer with its transmission axis at `angle_deg`
    Polarizer { angle_deg: f64 },
    /// Waveplate imposing `retardance_rad` between the fast axis (at
    /// `fast_axis_deg`) and the slow axis 90° away
    Waveplate {
        retardance_rad: f64,
        fast_axis_deg: f64,
    },
    /// Polarization rotator by `angle_deg`
    Rotator { angle_deg: f64 },
}

impl OpticalComponent {
    /// Short name for error messages and logs
    pub fn kind(&self) -> &'static str {
        match self {
            OpticalComponent::Polarizer { .. } => "polarizer",
            OpticalComponent::Waveplate { .. } => "waveplate",
            OpticalComponent::Rotator { .. } => "rotator",
        }
    }

    /// Check all parameters are finite and in domain.
    ///
    /// Callers validate puzzle data before building matrices; a failure
    /// here means the level definition is malformed.
    pub fn validate(&self) -> Result<(), EngineError> {
        match *self {
            OpticalComponent::Polarizer { angle_deg }
            | OpticalComponent::Rotator { angle_deg } => {
                if !angle_deg.is_finite() {
                    return Err(EngineError::component(
                        self.kind(),
                        format!("angle must be finite, got {angle_deg}"),
                    ));
                }
            }
            OpticalComponent::Waveplate {
                retardance_rad,
                fast_axis_deg,
            } => {
                if !fast_axis_deg.is_finite() {
                    return Err(EngineError::component(
                        self.kind(),
                        format!("fast axis angle must be finite, got {fast_axis_deg}"),
                    ));
                }
                if !retardance_rad.is_finite()
                    || retardance_rad < 0.0
                    || retardance_rad > consts::MAX_RETARDANCE
                {
                    return Err(EngineError::component(
                        self.kind(),
                        format!("retardance must be in [0, 2π] radians, got {retardance_rad}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Projection matrix onto the axis at `angle_deg`.
///
/// The axis is normalized to [0, 180) first, so `angle` and `angle + 180°`
/// yield identical matrices. For a linear input at Δ from the axis the
/// transmitted intensity is the incident intensity times cos²(Δ).
pub fn polarizer_matrix(angle_deg: f64) -> ComponentMatrix {
    let theta = normalize_axis_angle_deg(angle_deg).to_radians();
    let c = theta.cos();
    let s = theta.sin();
    ComponentMatrix::new(
        Complex::new(c * c, 0.0),
        Complex::new(c * s, 0.0),
        Complex::new(c * s, 0.0),
        Complex::new(s * s, 0.0),
    )
}

/// Unitary waveplate matrix: retards the slow axis by `retardance_rad`
/// relative to the fast axis at `fast_axis_deg`.
///
/// In the fast-axis basis the matrix is diag(1, e^(−iδ)); a quarter wave
/// (δ = π/2) gives diag(1, −i), a half wave (δ = π) gives diag(1, −1).
pub fn waveplate_matrix(retardance_rad: f64, fast_axis_deg: f64) -> ComponentMatrix {
    let axis = normalize_axis_angle_deg(fast_axis_deg).to_radians();
    let slow_phase = Complex::new(0.0, -retardance_rad).exp();
    ComponentMatrix::diagonal(Complex::new(1.0, 0.0), slow_phase).in_rotated_basis(axis)
}

/// Real rotation of the polarization plane by `angle_deg`
/// (counterclockwise looking into the beam).
pub fn rotator_matrix(angle_deg: f64) -> ComponentMatrix {
    ComponentMatrix::rotation(angle_deg.to_radians())
}

/// Build a rotator from an optically active solution: α = [α] · c · l,
/// with specific rotation in deg·mL/(g·dm), concentration in g/mL and path
/// length in dm.
pub fn rotator_from_solution(
    specific_rotation: f64,
    concentration: f64,
    path_length_dm: f64,
) -> Result<OpticalComponent, EngineError> {
    if !specific_rotation.is_finite() {
        return Err(EngineError::component(
            "rotator",
            format!("specific rotation must be finite, got {specific_rotation}"),
        ));
    }
    if !concentration.is_finite() || concentration < 0.0 {
        return Err(EngineError::component(
            "rotator",
            format!("concentration must be finite and non-negative, got {concentration}"),
        ));
    }
    if !path_length_dm.is_finite() || path_length_dm < 0.0 {
        return Err(EngineError::component(
            "rotator",
            format!("path length must be finite and non-negative, got {path_length_dm}"),
        ));
    }
    let component = OpticalComponent::Rotator {
        angle_deg: specific_rotation * concentration * path_length_dm,
    };
    component.validate()?;
    Ok(component)
}

/// Build the matrix for a component (validates first).
pub fn component_matrix(component: &OpticalComponent) -> Result<ComponentMatrix, EngineError> {
    component.validate()?;
    Ok(match *component {
        OpticalComponent::Polarizer { angle_deg } => polarizer_matrix(angle_deg),
        OpticalComponent::Waveplate {
            retardance_rad,
            fast_axis_deg,
        } => waveplate_matrix(retardance_rad, fast_axis_deg),
        OpticalComponent::Rotator { angle_deg } => rotator_matrix(angle_deg),
    })
}

/// Apply a component to a state, returning the transformed state.
/// Inputs are never mutated.
pub fn apply_component_effect(
    state: &LightState,
    component: &OpticalComponent,
) -> Result<LightState, EngineError> {
    Ok(component_matrix(component)?.apply(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HALF_WAVE, QUARTER_WAVE};
    use crate::optics::state::Handedness;
    use proptest::prelude::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_polarizer_axis_symmetry() {
        for angle in [0.0, 27.0, 90.0, 133.7] {
            let a = polarizer_matrix(angle);
            let b = polarizer_matrix(angle + 180.0);
            assert!(a.approx_eq(&b, TOL), "polarizer at {angle} != {angle}+180");
        }
    }

    #[test]
    fn test_polarizer_is_idempotent() {
        for angle in [0.0, 30.0, 45.0, 112.0] {
            assert!(polarizer_matrix(angle).is_idempotent(TOL));
        }
    }

    #[test]
    fn test_polarizer_passes_aligned_blocks_crossed() {
        let aligned = polarizer_matrix(30.0).apply(&LightState::linear(30f64.to_radians()));
        assert!((aligned.intensity() - 1.0).abs() < TOL);

        let crossed = polarizer_matrix(120.0).apply(&LightState::linear(30f64.to_radians()));
        assert!(crossed.intensity() < TOL);
    }

    #[test]
    fn test_quarter_wave_circularizes_45_degree_input() {
        let input = LightState::linear(45f64.to_radians());
        let out = waveplate_matrix(QUARTER_WAVE, 0.0).apply(&input);

        // Equal magnitudes, quarter-cycle phase offset
        assert!((out.ex.norm() - out.ey.norm()).abs() < TOL);
        let phase = (out.ey * out.ex.conj()).arg();
        assert!((phase.abs() - QUARTER_WAVE).abs() < TOL);
        // Intensity preserved
        assert!((out.intensity() - 1.0).abs() < TOL);
    }

    #[test]
    fn test_half_wave_reflects_orientation_about_fast_axis() {
        // θ_out = 2·θ_fast − θ_in
        let input_deg: f64 = 20.0;
        let fast_deg = 45.0;
        let out = waveplate_matrix(HALF_WAVE, fast_deg)
            .apply(&LightState::linear(input_deg.to_radians()));
        let expected = LightState::linear((2.0 * fast_deg - input_deg).to_radians());

        // Same ray up to a global phase: overlap magnitude is 1
        let overlap = expected.inner(&out).norm();
        assert!((overlap - 1.0).abs() < TOL);
    }

    #[test]
    fn test_quarter_wave_output_matches_circular_constructor() {
        let out = waveplate_matrix(QUARTER_WAVE, 0.0).apply(&LightState::linear(45f64.to_radians()));
        let target = LightState::circular(Handedness::Left);
        let overlap = target.inner(&out).norm();
        assert!((overlap - 1.0).abs() < TOL);
    }

    #[test]
    fn test_rotator_preserves_intensity_and_moves_orientation() {
        let input = LightState::linear(10f64.to_radians());
        let out = rotator_matrix(35.0).apply(&input);
        assert!((out.intensity() - 1.0).abs() < TOL);
        assert!(out.approx_eq(&LightState::linear(45f64.to_radians()), TOL));
    }

    #[test]
    fn test_apply_component_effect_dispatch() {
        let state = LightState::horizontal();

        let projected = apply_component_effect(
            &state,
            &OpticalComponent::Polarizer { angle_deg: 60.0 },
        )
        .unwrap();
        assert!((projected.intensity() - 0.25).abs() < TOL);

        let rotated = apply_component_effect(
            &state,
            &OpticalComponent::Rotator { angle_deg: 45.0 },
        )
        .unwrap();
        assert!(rotated.approx_eq(&LightState::linear(45f64.to_radians()), TOL));

        // Input state is untouched
        assert!(state.approx_eq(&LightState::horizontal(), TOL));
    }

    #[test]
    fn test_rotator_from_solution() {
        // Sucrose-like: 66.5 deg·mL/(g·dm) at 0.5 g/mL over 2 dm
        let component = rotator_from_solution(66.5, 0.5, 2.0).unwrap();
        match component {
            OpticalComponent::Rotator { angle_deg } => {
                assert!((angle_deg - 66.5).abs() < TOL);
            }
            _ => panic!("expected a rotator"),
        }

        assert!(rotator_from_solution(f64::NAN, 0.5, 2.0).is_err());
        assert!(rotator_from_solution(66.5, -0.1, 2.0).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_configs() {
        let bad = [
            OpticalComponent::Polarizer {
                angle_deg: f64::NAN,
            },
            OpticalComponent::Polarizer {
                angle_deg: f64::INFINITY,
            },
            OpticalComponent::Waveplate {
                retardance_rad: -0.1,
                fast_axis_deg: 0.0,
            },
            OpticalComponent::Waveplate {
                retardance_rad: 7.0,
                fast_axis_deg: 0.0,
            },
            OpticalComponent::Waveplate {
                retardance_rad: QUARTER_WAVE,
                fast_axis_deg: f64::NAN,
            },
            OpticalComponent::Rotator {
                angle_deg: f64::NEG_INFINITY,
            },
        ];
        for component in bad {
            let err = component.validate().unwrap_err();
            assert!(matches!(
                err,
                crate::error::EngineError::InvalidComponentConfig { .. }
            ));
            assert!(component_matrix(&component).is_err());
        }
    }

    proptest! {
        /// Malus's law: linear input at 0°, polarizer at θ, output
        /// intensity is cos²(θ)
        #[test]
        fn prop_malus_law(theta in 0.0..360.0f64) {
            let out = polarizer_matrix(theta).apply(&LightState::horizontal());
            let expected = theta.to_radians().cos().powi(2);
            prop_assert!((out.intensity() - expected).abs() < 1e-9);
        }

        /// Waveplates never change intensity
        #[test]
        fn prop_waveplate_is_unitary(
            retardance in 0.0..std::f64::consts::TAU,
            axis in -360.0..360.0f64,
        ) {
            prop_assert!(waveplate_matrix(retardance, axis).is_unitary(1e-9));
        }

        /// Rotators never change intensity
        #[test]
        fn prop_rotator_is_unitary(angle in -720.0..720.0f64) {
            prop_assert!(rotator_matrix(angle).is_unitary(1e-9));
        }

        /// Polarizers are projections for every axis
        #[test]
        fn prop_polarizer_is_idempotent(angle in -360.0..360.0f64) {
            prop_assert!(polarizer_matrix(angle).is_idempotent(1e-9));
        }
    }
}
