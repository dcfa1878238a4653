//! Deterministic polarization engine
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Jones calculus only (fully polarized, coherent light)
//! - No I/O, no randomness, no shared mutable state
//! - Identical inputs always produce identical outputs
//! - No UI or level-format dependencies

pub mod component;
pub mod evaluate;
pub mod matrix;
pub mod propagate;
pub mod state;
pub mod stokes;

pub use component::{
    apply_component_effect, component_matrix, polarizer_matrix, rotator_from_solution,
    rotator_matrix, waveplate_matrix, OpticalComponent,
};
pub use evaluate::{
    derive_victory, evaluate_sensor, fidelity, signal_strength, FidelityMetric, SensorEvaluation,
    SensorTarget, VictoryResult,
};
pub use matrix::ComponentMatrix;
pub use propagate::{chain_matrix, propagate};
pub use state::{EmitterState, Handedness, LightState};
pub use stokes::{classify, PolarizationKind, StokesVector};
