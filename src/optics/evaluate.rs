//! Sensor evaluation and victory derivation
//!
//! Computes signal strength (intensity at the sensor) and fidelity
//! (similarity to the target polarization), then derives a pass/fail
//! victory result from the target's thresholds. Everything here is
//! recomputed fresh on every call; nothing is cached across chains.

use serde::{Deserialize, Serialize};

use super::state::LightState;
use super::stokes::{classify, StokesVector};
use crate::error::EngineError;

/// Loose classification tolerance for feedback wording; nearly-circular
/// beams should still read as "circular" to the player
const FEEDBACK_CLASSIFY_TOLERANCE: f64 = 0.05;

/// Which similarity formula scores the propagated state against the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FidelityMetric {
    /// Squared Jones overlap |⟨t|s⟩|² / (‖t‖²·‖s‖²)
    #[default]
    JonesOverlap,
    /// Normalized Stokes-vector alignment (1 + ŝ·t̂)/2; agrees with the
    /// overlap metric for fully polarized light
    StokesAlignment,
}

impl FidelityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            FidelityMetric::JonesOverlap => "jones_overlap",
            FidelityMetric::StokesAlignment => "stokes_alignment",
        }
    }
}

/// Intensity actually reaching the sensor: |Ex|² + |Ey|².
///
/// Non-negative for any valid state; zero only when the beam is fully
/// blocked.
#[inline]
pub fn signal_strength(state: &LightState) -> f64 {
    state.intensity()
}

/// Normalized similarity in [0, 1] between a propagated state and a target
/// state. Invariant to overall intensity and global phase; 1 means the
/// polarization ellipse matches exactly, 0 means orthogonal states.
pub fn fidelity(
    state: &LightState,
    target: &LightState,
    metric: FidelityMetric,
) -> Result<f64, EngineError> {
    let state_norm = state.intensity();
    let target_norm = target.intensity();
    if state_norm <= 0.0 {
        return Err(EngineError::DegenerateState {
            context: "fidelity of a zero-norm state",
        });
    }
    if target_norm <= 0.0 {
        return Err(EngineError::DegenerateState {
            context: "fidelity against a zero-norm target",
        });
    }

    let value = match metric {
        FidelityMetric::JonesOverlap => {
            target.inner(state).norm_sqr() / (target_norm * state_norm)
        }
        FidelityMetric::StokesAlignment => {
            // s0 > 0 was checked above, normalized() cannot fail here
            let (s1, s2, s3) = StokesVector::from_state(state)
                .normalized()
                .unwrap_or((0.0, 0.0, 0.0));
            let (t1, t2, t3) = StokesVector::from_state(target)
                .normalized()
                .unwrap_or((0.0, 0.0, 0.0));
            (1.0 + s1 * t1 + s2 * t2 + s3 * t3) / 2.0
        }
    };
    Ok(value.clamp(0.0, 1.0))
}

/// What a correct solution must reproduce at the chain's end, plus the
/// thresholds defining "good enough". Created from level data, read-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorTarget {
    /// Target polarization state (unit intensity)
    pub state: LightState,
    /// Minimum fidelity to pass, in [0, 1]
    pub min_fidelity: f64,
    /// Minimum absolute signal strength to pass
    pub min_signal: f64,
}

impl SensorTarget {
    /// Validate and build a target. The state is normalized to unit
    /// intensity; thresholds outside their domain are rejected.
    pub fn new(state: LightState, min_fidelity: f64, min_signal: f64) -> Result<Self, EngineError> {
        if !state.is_finite() {
            return Err(EngineError::target("target state has non-finite amplitudes"));
        }
        let state = state.normalized().ok_or_else(|| {
            EngineError::target("target state has zero norm and defines no polarization")
        })?;
        if !min_fidelity.is_finite() || !(0.0..=1.0).contains(&min_fidelity) {
            return Err(EngineError::target(format!(
                "min_fidelity {min_fidelity} outside [0, 1]"
            )));
        }
        if !min_signal.is_finite() || min_signal < 0.0 {
            return Err(EngineError::target(format!(
                "min_signal {min_signal} must be finite and non-negative"
            )));
        }
        Ok(Self {
            state,
            min_fidelity,
            min_signal,
        })
    }
}

/// Computed sensor output for one propagated state against one target.
/// Recomputed fresh on every evaluation; never cached across chains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorEvaluation {
    /// State at the sensor
    pub state: LightState,
    /// Absolute signal strength
    pub signal: f64,
    /// Fidelity against the target state
    pub fidelity: f64,
    /// signal ≥ target.min_signal
    pub signal_passed: bool,
    /// fidelity ≥ target.min_fidelity
    pub fidelity_passed: bool,
}

/// Score a propagated state against a target.
///
/// A fully blocked beam (signal within `tolerance` of zero) scores
/// fidelity 0 instead of raising a degenerate-state error: no light means
/// no polarization to match.
pub fn evaluate_sensor(
    state: &LightState,
    target: &SensorTarget,
    metric: FidelityMetric,
    tolerance: f64,
) -> SensorEvaluation {
    let signal = signal_strength(state);
    let fidelity_score = if signal <= tolerance {
        0.0
    } else {
        // Target norm was validated at construction and signal > 0
        fidelity(state, &target.state, metric).unwrap_or(0.0)
    };

    SensorEvaluation {
        state: *state,
        signal,
        fidelity: fidelity_score,
        signal_passed: signal >= target.min_signal,
        fidelity_passed: fidelity_score >= target.min_fidelity,
    }
}

/// Pass/fail with per-threshold detail and human-readable reasons, so the
/// UI can tell "wrong polarization" apart from "too dim".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictoryResult {
    /// Both thresholds met
    pub passed: bool,
    pub fidelity_passed: bool,
    pub signal_passed: bool,
    pub fidelity: f64,
    pub signal: f64,
    /// Failure explanations; empty when passed
    pub reasons: Vec<String>,
}

/// Derive the victory record from an evaluation and the target thresholds.
pub fn derive_victory(evaluation: &SensorEvaluation, target: &SensorTarget) -> VictoryResult {
    let mut reasons = Vec::new();

    if !evaluation.fidelity_passed {
        let beam = classify(&evaluation.state, FEEDBACK_CLASSIFY_TOLERANCE);
        let description = match beam {
            Some(kind) => format!("beam is {}", kind.describe()),
            None => "beam is blocked".to_string(),
        };
        reasons.push(format!(
            "polarization mismatch: fidelity {:.3} below required {:.3} ({description})",
            evaluation.fidelity, target.min_fidelity
        ));
    }
    if !evaluation.signal_passed {
        reasons.push(format!(
            "signal too dim: {:.3} below required {:.3}",
            evaluation.signal, target.min_signal
        ));
    }

    VictoryResult {
        passed: evaluation.fidelity_passed && evaluation.signal_passed,
        fidelity_passed: evaluation.fidelity_passed,
        signal_passed: evaluation.signal_passed,
        fidelity: evaluation.fidelity,
        signal: evaluation.signal,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::component::waveplate_matrix;
    use crate::optics::state::Handedness;
    use num_complex::Complex;
    use proptest::prelude::*;

    const TOL: f64 = 1e-9;

    fn zero_state() -> LightState {
        LightState::new(Complex::new(0.0, 0.0), Complex::new(0.0, 0.0))
    }

    #[test]
    fn test_fidelity_of_identical_states_is_one() {
        let state = LightState::linear(0.6);
        let f = fidelity(&state, &state, FidelityMetric::JonesOverlap).unwrap();
        assert!((f - 1.0).abs() < TOL);
    }

    #[test]
    fn test_fidelity_of_orthogonal_states_is_zero() {
        let f = fidelity(
            &LightState::horizontal(),
            &LightState::vertical(),
            FidelityMetric::JonesOverlap,
        )
        .unwrap();
        assert!(f < TOL);

        let f = fidelity(
            &LightState::circular(Handedness::Right),
            &LightState::circular(Handedness::Left),
            FidelityMetric::JonesOverlap,
        )
        .unwrap();
        assert!(f < TOL);
    }

    #[test]
    fn test_fidelity_ignores_intensity_and_global_phase() {
        let target = LightState::linear(0.4);
        let scaled = target.scaled_to(3.7).unwrap();
        let phased = LightState::new(
            target.ex * Complex::from_polar(1.0, 1.3),
            target.ey * Complex::from_polar(1.0, 1.3),
        );

        for state in [scaled, phased] {
            let f = fidelity(&state, &target, FidelityMetric::JonesOverlap).unwrap();
            assert!((f - 1.0).abs() < TOL);
        }
    }

    #[test]
    fn test_fidelity_rejects_zero_norm_inputs() {
        let good = LightState::horizontal();
        assert!(matches!(
            fidelity(&zero_state(), &good, FidelityMetric::JonesOverlap),
            Err(EngineError::DegenerateState { .. })
        ));
        assert!(matches!(
            fidelity(&good, &zero_state(), FidelityMetric::JonesOverlap),
            Err(EngineError::DegenerateState { .. })
        ));
    }

    #[test]
    fn test_target_validation() {
        let state = LightState::horizontal();
        assert!(SensorTarget::new(state, 0.95, 0.4).is_ok());
        assert!(SensorTarget::new(state, 1.5, 0.4).is_err());
        assert!(SensorTarget::new(state, -0.1, 0.4).is_err());
        assert!(SensorTarget::new(state, 0.9, -1.0).is_err());
        assert!(SensorTarget::new(state, 0.9, f64::NAN).is_err());
        assert!(SensorTarget::new(zero_state(), 0.9, 0.4).is_err());
    }

    #[test]
    fn test_target_state_is_normalized() {
        let target =
            SensorTarget::new(LightState::linear(0.3).scaled_to(5.0).unwrap(), 0.9, 0.1).unwrap();
        assert!((target.state.intensity() - 1.0).abs() < TOL);
    }

    #[test]
    fn test_blocked_beam_evaluates_to_zero_fidelity() {
        let target = SensorTarget::new(LightState::horizontal(), 0.9, 0.1).unwrap();
        let evaluation = evaluate_sensor(&zero_state(), &target, FidelityMetric::JonesOverlap, TOL);
        assert!(evaluation.signal < TOL);
        assert!((evaluation.fidelity - 0.0).abs() < TOL);
        assert!(!evaluation.signal_passed);
        assert!(!evaluation.fidelity_passed);
    }

    #[test]
    fn test_victory_differentiates_dim_from_mismatched() {
        let target = SensorTarget::new(LightState::linear(45f64.to_radians()), 0.95, 0.4).unwrap();

        // Right polarization, too dim
        let dim = LightState::linear(45f64.to_radians()).scaled_to(0.1).unwrap();
        let evaluation = evaluate_sensor(&dim, &target, FidelityMetric::JonesOverlap, TOL);
        let victory = derive_victory(&evaluation, &target);
        assert!(!victory.passed);
        assert!(victory.fidelity_passed);
        assert!(!victory.signal_passed);
        assert_eq!(victory.reasons.len(), 1);
        assert!(victory.reasons[0].contains("too dim"));

        // Bright enough, wrong polarization
        let wrong = LightState::vertical();
        let evaluation = evaluate_sensor(&wrong, &target, FidelityMetric::JonesOverlap, TOL);
        let victory = derive_victory(&evaluation, &target);
        assert!(!victory.passed);
        assert!(!victory.fidelity_passed);
        assert!(victory.signal_passed);
        assert!(victory.reasons[0].contains("polarization mismatch"));
        assert!(victory.reasons[0].contains("linear"));
    }

    #[test]
    fn test_victory_passes_with_empty_reasons() {
        let target = SensorTarget::new(LightState::horizontal(), 0.95, 0.4).unwrap();
        let evaluation = evaluate_sensor(
            &LightState::horizontal(),
            &target,
            FidelityMetric::JonesOverlap,
            TOL,
        );
        let victory = derive_victory(&evaluation, &target);
        assert!(victory.passed);
        assert!(victory.reasons.is_empty());
    }

    proptest! {
        /// Both metrics agree on fully polarized light
        #[test]
        fn prop_metrics_agree(
            state_angle in 0.0..180.0f64,
            target_angle in 0.0..180.0f64,
            retardance in 0.0..std::f64::consts::TAU,
            axis in 0.0..180.0f64,
        ) {
            let state = waveplate_matrix(retardance, axis)
                .apply(&LightState::linear(state_angle.to_radians()));
            let target = LightState::linear(target_angle.to_radians());

            let overlap = fidelity(&state, &target, FidelityMetric::JonesOverlap).unwrap();
            let stokes = fidelity(&state, &target, FidelityMetric::StokesAlignment).unwrap();
            prop_assert!((overlap - stokes).abs() < 1e-9);
        }

        /// Fidelity is symmetric and stays in [0, 1]
        #[test]
        fn prop_fidelity_symmetric_and_bounded(
            a in 0.0..180.0f64,
            b in 0.0..180.0f64,
        ) {
            let state_a = LightState::linear(a.to_radians());
            let state_b = LightState::linear(b.to_radians());
            let ab = fidelity(&state_a, &state_b, FidelityMetric::JonesOverlap).unwrap();
            let ba = fidelity(&state_b, &state_a, FidelityMetric::JonesOverlap).unwrap();
            prop_assert!((ab - ba).abs() < 1e-12);
            prop_assert!((0.0..=1.0).contains(&ab));
        }
    }
}
