//! Errores específicos del core.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Causa de fallo de un step: mensaje legible más el error subyacente
/// opcional (texto del colaborador que falló).
///
/// Se muestra como `"<message>: <cause>"`, que es exactamente lo que viaja
/// en la notificación de fallo y en el error terminal del run.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct StepError {
    pub step: String,
    pub message: String,
    pub cause: Option<String>,
}

impl StepError {
    pub fn new(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self { step: step.into(),
               message: message.into(),
               cause: None }
    }

    /// Adjunta el error subyacente (por ejemplo un `ClientError`).
    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}", self.message, cause),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for StepError {}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("flow definition has no steps")] EmptyDefinition,
    #[error("step '{}' failed: {}", .0.step, .0)] StepFailed(StepError),
    #[error("internal: {0}")] Internal(String),
}

impl CoreEngineError {
    /// El `StepError` que terminó el run, si lo hubo.
    pub fn step_error(&self) -> Option<&StepError> {
        match self {
            CoreEngineError::StepFailed(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_display_appends_cause() {
        let e = StepError::new("create_group", "Error creating group acme").with_cause("HTTP 500");
        assert_eq!(e.to_string(), "Error creating group acme: HTTP 500");
        let bare = StepError::new("invite_members", "Failed to look up user IDs");
        assert_eq!(bare.to_string(), "Failed to look up user IDs");
    }

    #[test]
    fn engine_error_names_failed_step() {
        let err = CoreEngineError::StepFailed(StepError::new("create_org", "Error creating org").with_cause("boom"));
        assert_eq!(err.to_string(), "step 'create_org' failed: Error creating org: boom");
        assert_eq!(err.step_error().map(|e| e.step.as_str()), Some("create_org"));
        assert!(CoreEngineError::EmptyDefinition.step_error().is_none());
    }
}
