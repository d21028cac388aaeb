//! Credenciales de un run, resueltas una vez al inicio y pasadas
//! explícitamente a la fábrica de clientes.
use ops_core::SecretValue;

use crate::error::PlaybookError;

/// Credencial con la que se actúa sobre el backend de organizaciones.
/// Formato del secreto: `"<uid>/<key>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingCredential {
    pub uid: String,
    key: SecretValue,
}

impl ActingCredential {
    pub fn parse(secret: &SecretValue) -> Result<Self, PlaybookError> {
        let parts: Vec<&str> = secret.expose().trim().split('/').collect();
        match parts.as_slice() {
            [uid, key] if !uid.is_empty() && !key.is_empty() => {
                Ok(Self { uid: uid.to_string(),
                          key: SecretValue::new(*key) })
            }
            _ => Err(PlaybookError::InvalidInput("acting credential must have the form '<uid>/<key>'".into())),
        }
    }

    pub fn key(&self) -> &SecretValue {
        &self.key
    }
}

#[derive(Debug, Clone)]
pub struct RunCredentials {
    pub acting: ActingCredential,
    pub chat_token: SecretValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uid_and_key() {
        let cred = ActingCredential::parse(&SecretValue::new("user-1/abc123")).unwrap();
        assert_eq!(cred.uid, "user-1");
        assert_eq!(cred.key().expose(), "abc123");
        assert!(!format!("{cred:?}").contains("abc123"));
    }

    #[test]
    fn rejects_malformed_credentials() {
        for raw in ["no-slash", "a/b/c", "/key", "uid/", ""] {
            let err = ActingCredential::parse(&SecretValue::new(raw)).unwrap_err();
            assert!(err.is_input_error(), "{raw} should be rejected");
        }
    }
}
