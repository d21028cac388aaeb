//! Errores de los playbooks.

use ops_core::CoreEngineError;
use thiserror::Error;

use crate::clients::ClientError;

#[derive(Debug, Error)]
pub enum PlaybookError {
    /// Entrada inválida: se detecta antes de cualquier llamada externa.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("could not resolve secret '{name}': {source}")]
    Secret { name: String, source: ClientError },
    #[error("could not build client: {0}")]
    Client(#[from] ClientError),
    #[error(transparent)]
    Engine(#[from] CoreEngineError),
}

impl PlaybookError {
    pub fn is_input_error(&self) -> bool {
        matches!(self, PlaybookError::InvalidInput(_))
    }
}
