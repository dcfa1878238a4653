//! Beam propagation through a component chain
//!
//! Folds component matrices over the emitter state in emitter-to-sensor
//! order. Order is significant: optical transformations do not commute and
//! the chain is never reordered.

use super::component::{component_matrix, OpticalComponent};
use super::matrix::ComponentMatrix;
use super::state::{EmitterState, LightState};
use crate::error::EngineError;

/// Validate every component up front, attributing failures to their chain
/// position.
fn validate_chain(components: &[OpticalComponent]) -> Result<(), EngineError> {
    for (index, component) in components.iter().enumerate() {
        component.validate().map_err(|err| match err {
            EngineError::InvalidComponentConfig { component, reason } => {
                EngineError::InvalidComponentConfig {
                    component,
                    reason: format!("at chain position {index}: {reason}"),
                }
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Propagate the emitter state through the chain and return the state at
/// the sensor.
///
/// Pure function: no I/O, no randomness, no mutation of inputs. An empty
/// chain returns the emitter state unchanged.
pub fn propagate(
    emitter: &EmitterState,
    components: &[OpticalComponent],
) -> Result<LightState, EngineError> {
    validate_chain(components)?;

    let mut state = emitter.state;
    for component in components {
        // Chain already validated; matrix construction cannot fail here
        state = component_matrix(component)?.apply(&state);
    }
    Ok(state)
}

/// Compose the whole chain into a single system matrix (product in
/// application order).
///
/// Useful when one fixed chain is probed with many emitters; agrees with
/// step-by-step propagation.
pub fn chain_matrix(components: &[OpticalComponent]) -> Result<ComponentMatrix, EngineError> {
    validate_chain(components)?;

    let mut matrix = ComponentMatrix::identity();
    for component in components {
        // Left-multiply: later components apply after earlier ones
        matrix = component_matrix(component)?.compose(&matrix);
    }
    Ok(matrix)
}
