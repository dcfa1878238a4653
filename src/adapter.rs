//! Game adapter - the orchestration façade the puzzle UI calls
//!
//! Turns level-authoring data into typed engine entities, drives
//! propagation and evaluation, and formats the signal for display. Holds
//! nothing but the immutable physics configuration; every evaluation is a
//! full, deterministic recomputation, cheap enough to run on every chain
//! edit.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::EngineError;
use crate::optics::{
    derive_victory, evaluate_sensor, propagate, EmitterState, Handedness, LightState,
    OpticalComponent, SensorEvaluation, SensorTarget, VictoryResult,
};

pub use crate::optics::FidelityMetric;

/// Tunable engine behavior. Set once per adapter instance; engine output
/// is fully determined by this config plus the evaluation inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GamePhysicsConfig {
    /// Numerical equality tolerance (blocked-beam cutoff, unitarity checks)
    pub tolerance_epsilon: f64,
    /// Similarity formula used as the win condition
    pub fidelity_metric: FidelityMetric,
    /// Normalization baseline for the display-ready signal value
    pub intensity_reference: f64,
}

impl Default for GamePhysicsConfig {
    fn default() -> Self {
        Self {
            tolerance_epsilon: consts::DEFAULT_TOLERANCE,
            fidelity_metric: FidelityMetric::default(),
            intensity_reference: consts::REFERENCE_INTENSITY,
        }
    }
}

impl GamePhysicsConfig {
    fn validate(&self) -> Result<(), EngineError> {
        if !self.tolerance_epsilon.is_finite() || self.tolerance_epsilon < 0.0 {
            return Err(EngineError::physics_config(format!(
                "tolerance_epsilon {} must be finite and non-negative",
                self.tolerance_epsilon
            )));
        }
        if !self.intensity_reference.is_finite() || self.intensity_reference <= 0.0 {
            return Err(EngineError::physics_config(format!(
                "intensity_reference {} must be finite and positive",
                self.intensity_reference
            )));
        }
        Ok(())
    }
}

/// Level-authoring polarization descriptor, reducible to a `LightState`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PolarizationSpec {
    /// Linear polarization at `angle_deg` from the reference axis
    Linear { angle_deg: f64 },
    /// Circular polarization of the given handedness
    Circular { handedness: Handedness },
    /// Raw Jones components for fully general states
    Jones {
        ex_re: f64,
        ex_im: f64,
        ey_re: f64,
        ey_im: f64,
    },
}

impl PolarizationSpec {
    /// Reduce to a unit-intensity state; the reason string names what was
    /// wrong with a malformed descriptor.
    fn to_state(self) -> Result<LightState, String> {
        match self {
            PolarizationSpec::Linear { angle_deg } => {
                if !angle_deg.is_finite() {
                    return Err(format!("linear angle must be finite, got {angle_deg}"));
                }
                Ok(LightState::linear(angle_deg.to_radians()))
            }
            PolarizationSpec::Circular { handedness } => Ok(LightState::circular(handedness)),
            PolarizationSpec::Jones {
                ex_re,
                ex_im,
                ey_re,
                ey_im,
            } => {
                let components = [ex_re, ex_im, ey_re, ey_im];
                if components.iter().any(|c| !c.is_finite()) {
                    return Err("Jones components must all be finite".to_string());
                }
                let state = LightState::new(
                    num_complex::Complex::new(ex_re, ex_im),
                    num_complex::Complex::new(ey_re, ey_im),
                );
                state
                    .normalized()
                    .ok_or_else(|| "Jones components must not all be zero".to_string())
            }
        }
    }
}

/// Level-authoring emitter description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitterSpec {
    pub polarization: PolarizationSpec,
    /// Total emitted intensity, in engine units
    pub intensity: f64,
}

/// Level-authoring sensor description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub polarization: PolarizationSpec,
    pub min_fidelity: f64,
    pub min_signal: f64,
}

/// A complete level payload: emitter, player-editable chain, sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub emitter: EmitterSpec,
    pub components: Vec<OpticalComponent>,
    pub target: TargetSpec,
}

/// The single integration point the puzzle UI depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamePhysicsAdapter {
    config: GamePhysicsConfig,
}

impl GamePhysicsAdapter {
    /// Build an adapter bound to a validated configuration. Holds no
    /// puzzle-specific state.
    pub fn new(config: GamePhysicsConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GamePhysicsConfig {
        &self.config
    }

    /// Turn an emitter spec into the immutable per-puzzle emitter state
    pub fn create_emitter_state(&self, spec: &EmitterSpec) -> Result<EmitterState, EngineError> {
        if !spec.intensity.is_finite() || spec.intensity < 0.0 {
            return Err(EngineError::emitter(format!(
                "intensity {} must be finite and non-negative",
                spec.intensity
            )));
        }
        let direction = spec
            .polarization
            .to_state()
            .map_err(|reason| EngineError::emitter(reason))?;
        EmitterState::from_direction(direction, spec.intensity)
            .ok_or_else(|| EngineError::emitter("polarization descriptor has zero norm"))
    }

    /// Turn a target spec into the immutable per-puzzle sensor target
    pub fn create_sensor_target(&self, spec: &TargetSpec) -> Result<SensorTarget, EngineError> {
        let state = spec
            .polarization
            .to_state()
            .map_err(|reason| EngineError::target(reason))?;
        SensorTarget::new(state, spec.min_fidelity, spec.min_signal)
    }

    /// Propagate the emitter through the chain and score the result.
    ///
    /// Recomputed in full on every call; there is no cached state to
    /// invalidate when the player edits the chain.
    pub fn evaluate(
        &self,
        emitter: &EmitterState,
        components: &[OpticalComponent],
        target: &SensorTarget,
    ) -> Result<SensorEvaluation, EngineError> {
        let state = propagate(emitter, components)?;
        let evaluation = evaluate_sensor(
            &state,
            target,
            self.config.fidelity_metric,
            self.config.tolerance_epsilon,
        );
        log::debug!(
            "evaluated chain of {} ({}): signal {:.4}, fidelity {:.4}",
            components.len(),
            self.config.fidelity_metric.as_str(),
            evaluation.signal,
            evaluation.fidelity
        );
        Ok(evaluation)
    }

    /// Derive the pass/fail record for an evaluation
    pub fn victory(&self, evaluation: &SensorEvaluation, target: &SensorTarget) -> VictoryResult {
        derive_victory(evaluation, target)
    }

    /// Map a raw signal to a display percentage of the reference
    /// intensity, clamped to [0, 100]. Formatting only, no physics.
    pub fn signal_display(&self, signal: f64) -> f64 {
        (signal / self.config.intensity_reference * 100.0).clamp(0.0, 100.0)
    }

    /// Parse a JSON level payload into a `LevelSpec`
    pub fn parse_level(&self, json: &str) -> Result<LevelSpec, EngineError> {
        serde_json::from_str(json).map_err(|err| EngineError::level(err.to_string()))
    }

    /// One-call path per chain edit: build entities, evaluate, derive
    /// victory.
    pub fn solve(
        &self,
        level: &LevelSpec,
    ) -> Result<(SensorEvaluation, VictoryResult), EngineError> {
        let emitter = self.create_emitter_state(&level.emitter)?;
        let target = self.create_sensor_target(&level.target)?;
        let evaluation = self.evaluate(&emitter, &level.components, &target)?;
        let victory = self.victory(&evaluation, &target);
        log::info!(
            "level solved={} (fidelity {:.3}, signal {:.3})",
            victory.passed,
            victory.fidelity,
            victory.signal
        );
        Ok((evaluation, victory))
    }
}
