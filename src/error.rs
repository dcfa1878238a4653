//! Engine error taxonomy
//!
//! Every failure is a configuration error detected at construction time
//! (`create_*` / `validate`) so a malformed puzzle definition fails fast
//! with an attributable message instead of propagating NaNs through the
//! chain. There are no retryable failures.

use thiserror::Error;

/// Errors surfaced by the polarization engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Non-finite or out-of-domain component parameter.
    #[error("invalid {component} configuration: {reason}")]
    InvalidComponentConfig { component: &'static str, reason: String },

    /// Malformed emitter descriptor (non-finite or negative intensity,
    /// unusable polarization spec).
    #[error("invalid emitter configuration: {reason}")]
    InvalidEmitterConfig { reason: String },

    /// Malformed sensor target (bad descriptor or thresholds outside their
    /// domain).
    #[error("invalid sensor target configuration: {reason}")]
    InvalidTargetConfig { reason: String },

    /// Malformed engine configuration (non-finite tolerance or reference
    /// intensity).
    #[error("invalid physics configuration: {reason}")]
    InvalidPhysicsConfig { reason: String },

    /// Level payload that does not parse into a level spec.
    #[error("invalid level data: {reason}")]
    InvalidLevelData { reason: String },

    /// Fidelity requested against a zero-norm state or target.
    #[error("degenerate light state: {context}")]
    DegenerateState { context: &'static str },
}

impl EngineError {
    pub(crate) fn component(component: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidComponentConfig {
            component,
            reason: reason.into(),
        }
    }

    pub(crate) fn emitter(reason: impl Into<String>) -> Self {
        Self::InvalidEmitterConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn target(reason: impl Into<String>) -> Self {
        Self::InvalidTargetConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn physics_config(reason: impl Into<String>) -> Self {
        Self::InvalidPhysicsConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn level(reason: impl Into<String>) -> Self {
        Self::InvalidLevelData {
            reason: reason.into(),
        }
    }
}
