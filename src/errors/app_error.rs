use ops_adapters::{ClientError, PlaybookError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Playbook(#[from] PlaybookError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl AppError {
    /// Código de salida del binario: 2 para entrada o configuración
    /// inválidas, 1 para fallos durante el run.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Io(_) | AppError::Json(_) => 2,
            AppError::Playbook(e) if e.is_input_error() => 2,
            AppError::Playbook(_) | AppError::Client(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_variant_format() {
        let err = AppError::Config("OPSFLOW_HTTP_TIMEOUT_SECS inválido".into());
        assert_eq!(err.to_string(), "Error de configuración: OPSFLOW_HTTP_TIMEOUT_SECS inválido");
    }

    #[test]
    fn test_io_variant_from() {
        let err: AppError = std::io::Error::other("falló IO").into();
        assert_eq!(err.to_string(), "Error en IO: falló IO");
    }

    #[test]
    fn input_errors_exit_with_two() {
        let input: AppError = PlaybookError::InvalidInput("Invalid org location: mars".into()).into();
        assert_eq!(input.exit_code(), 2);
        let client: AppError = ClientError::Api("boom".into()).into();
        assert_eq!(client.exit_code(), 1);
        let secret: AppError = PlaybookError::Secret { name: "slack-token".into(),
                                                       source: ClientError::Api("secret_not_found".into()) }.into();
        assert_eq!(secret.exit_code(), 1);
    }
}
