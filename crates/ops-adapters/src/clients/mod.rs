//! Interfaces de los colaboradores externos.
//!
//! Los playbooks sólo hablan con estos traits. Las implementaciones HTTP
//! (`http`, `chat`, `org`, `store`) se consideran clientes ya autenticados
//! y fiables; sus timeouts son los del cliente `reqwest`, este crate no
//! añade reintentos.

pub mod chat;
pub mod http;
pub mod org;
pub mod store;

use std::sync::Arc;

use ops_core::{IdentityLookup, LookupError, SecretValue};
use serde_json::Value;
use thiserror::Error;

use crate::credentials::ActingCredential;

pub use chat::{ChatApiClient, WebhookClient};
pub use http::{HttpClientFactory, HttpSettings};
pub use org::OrgApiClient;
pub use store::{HttpPayloadStore, HttpSecretStore, HttpTemplateFetcher};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("transport error calling {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },
    #[error("HTTP {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },
    /// El servicio respondió con un error de aplicación (p.ej. `ok: false`).
    #[error("{0}")]
    Api(String),
    #[error("invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// Store clave/valor de secretos.
pub trait SecretStore: Send + Sync {
    fn get(&self, name: &str) -> Result<SecretValue, ClientError>;
}

/// Store de payloads con nombre (plantillas subidas previamente).
pub trait PayloadStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Vec<u8>, ClientError>;
}

/// Descarga de una URL `https://` a bytes.
pub trait TemplateFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ClientError>;
}

/// Backend de gestión de organizaciones.
pub trait OrgManager: Send + Sync {
    fn create_org(&self, name: &str, location: &str, template: Option<&str>) -> Result<String, ClientError>;
    fn create_group(&self, name: &str) -> Result<String, ClientError>;
    fn add_group_owner(&self, group_id: &str, owner_email: &str) -> Result<(), ClientError>;
    fn add_group_to_org(&self, group_id: &str, org_id: &str) -> Result<(), ClientError>;
    fn set_group_permissions(&self, group_id: &str, permissions: &[String]) -> Result<(), ClientError>;
}

/// Plataforma de chat.
pub trait ChatPlatform: Send + Sync {
    fn post_message(&self, channel: &str, text: &str) -> Result<(), ClientError>;
    fn lookup_user_by_email(&self, email: &str) -> Result<String, ClientError>;
    /// Email del perfil de un usuario.
    fn get_user_profile(&self, user_id: &str) -> Result<String, ClientError>;
    fn create_channel(&self, name: &str, is_private: bool) -> Result<String, ClientError>;
    fn invite_members(&self, channel_id: &str, user_ids: &[String]) -> Result<(), ClientError>;
}

/// Respuesta estilo webhook a la `response_url` del disparador. No necesita
/// token, así que está disponible aunque el cliente del chat no lo esté.
pub trait ResponseHook: Send + Sync {
    /// Devuelve el cuerpo de la respuesta.
    fn reply(&self, response_url: &str, payload: &Value) -> Result<String, ClientError>;
}

/// Construye clientes autenticados con las credenciales de un run. Cada run
/// obtiene sus propios clientes; no se comparten entre runs.
pub trait ClientFactory: Send + Sync {
    fn org_manager(&self, credential: &ActingCredential) -> Result<Arc<dyn OrgManager>, ClientError>;
    fn chat_platform(&self, token: &SecretValue) -> Result<Arc<dyn ChatPlatform>, ClientError>;
    fn response_hook(&self) -> Result<Arc<dyn ResponseHook>, ClientError>;
}

/// Resolución email -> id de usuario sobre la plataforma de chat.
pub struct EmailLookup<'a> {
    chat: &'a dyn ChatPlatform,
}

impl<'a> EmailLookup<'a> {
    pub fn new(chat: &'a dyn ChatPlatform) -> Self {
        Self { chat }
    }
}

impl IdentityLookup for EmailLookup<'_> {
    fn lookup(&self, identifier: &str) -> Result<String, LookupError> {
        self.chat.lookup_user_by_email(identifier).map_err(|e| match e {
                                                     ClientError::Api(reason) => LookupError::NotFound(reason),
                                                     other => LookupError::Transport(other.to_string()),
                                                 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_messages() {
        let e = ClientError::Status { endpoint: "groups".into(), status: 503 };
        assert_eq!(e.to_string(), "HTTP 503 from groups");
        assert_eq!(ClientError::Api("name_taken".into()).to_string(), "name_taken");
    }
}
