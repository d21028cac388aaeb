//! Piezas HTTP compartidas: ajustes, cliente `reqwest` bloqueante,
//! intercambio de JWT y la fábrica de clientes por run.
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use ops_core::SecretValue;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{Client, Response};
use serde_json::Value;

use super::{ChatApiClient, ChatPlatform, ClientError, ClientFactory, OrgApiClient, OrgManager, ResponseHook, WebhookClient};
use crate::credentials::ActingCredential;

/// Endpoints y timeout de los colaboradores HTTP.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub org_api_url: String,
    pub jwt_url: String,
    pub chat_api_url: String,
    pub secrets_url: String,
    pub timeout_secs: u64,
}

// Unreserved de RFC 3986; todo lo demás se codifica.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Codifica un valor para usarlo como un único segmento de path.
pub(crate) fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, ClientError> {
    Client::builder().timeout(Duration::from_secs(timeout_secs))
                     .build()
                     .map_err(|e| ClientError::Transport { endpoint: "client".into(),
                                                           reason: format!("failed to create HTTP client: {e}") })
}

pub(crate) fn send_error(endpoint: &str, e: reqwest::Error) -> ClientError {
    let reason = if e.is_timeout() { "request timed out".to_string() } else { e.to_string() };
    ClientError::Transport { endpoint: endpoint.to_string(),
                             reason }
}

/// Falla con `ClientError::Status` si la respuesta no es 2xx.
pub(crate) fn check_status(endpoint: &str, response: Response) -> Result<Response, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::Status { endpoint: endpoint.to_string(),
                                         status: response.status().as_u16() });
    }
    Ok(response)
}

pub(crate) fn read_json(endpoint: &str, response: Response) -> Result<Value, ClientError> {
    check_status(endpoint, response)?.json::<Value>()
                                     .map_err(|e| ClientError::Decode { endpoint: endpoint.to_string(),
                                                                        reason: e.to_string() })
}

/// Extrae un string en `pointer` (sintaxis JSON pointer) o falla con `Decode`.
pub(crate) fn pointer_str(endpoint: &str, body: &Value, pointer: &str) -> Result<String, ClientError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::Decode { endpoint: endpoint.to_string(),
                                             reason: format!("missing '{pointer}' in response") })
}

/// Token bearer obtenido del servicio de JWT en la primera llamada y
/// reutilizado durante el resto del run.
pub(crate) struct JwtAuth {
    url: String,
    form: Vec<(String, SecretValue)>,
    token: OnceCell<SecretValue>,
}

impl JwtAuth {
    pub(crate) fn new(url: impl Into<String>, form: Vec<(String, SecretValue)>) -> Self {
        Self { url: url.into(),
               form,
               token: OnceCell::new() }
    }

    pub(crate) fn bearer(&self, client: &Client) -> Result<&str, ClientError> {
        let token = self.token.get_or_try_init(|| self.exchange(client))?;
        Ok(token.expose())
    }

    fn exchange(&self, client: &Client) -> Result<SecretValue, ClientError> {
        let form: Vec<(&str, &str)> = self.form.iter().map(|(k, v)| (k.as_str(), v.expose())).collect();
        let response = client.post(&self.url)
                             .form(&form)
                             .send()
                             .map_err(|e| send_error("jwt", e))?;
        let body = read_json("jwt", response)?;
        pointer_str("jwt", &body, "/jwt").map(SecretValue::new)
    }
}

/// Fábrica de clientes HTTP reales. Un `reqwest::blocking::Client` se
/// comparte (pool de conexiones); las credenciales son de cada run.
pub struct HttpClientFactory {
    settings: HttpSettings,
    client: Client,
}

impl HttpClientFactory {
    pub fn new(settings: HttpSettings) -> Result<Self, ClientError> {
        let client = build_client(settings.timeout_secs)?;
        Ok(Self { settings, client })
    }

    /// Cliente compartido, para construir stores con el mismo pool.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }
}

impl ClientFactory for HttpClientFactory {
    fn org_manager(&self, credential: &ActingCredential) -> Result<Arc<dyn OrgManager>, ClientError> {
        Ok(Arc::new(OrgApiClient::new(self.client.clone(),
                                      &self.settings.org_api_url,
                                      &self.settings.jwt_url,
                                      credential)))
    }

    fn chat_platform(&self, token: &SecretValue) -> Result<Arc<dyn ChatPlatform>, ClientError> {
        Ok(Arc::new(ChatApiClient::new(self.client.clone(), &self.settings.chat_api_url, token.clone())))
    }

    fn response_hook(&self) -> Result<Arc<dyn ResponseHook>, ClientError> {
        Ok(Arc::new(WebhookClient::new(self.client.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_str_reports_missing_path() {
        let body = json!({"data": {"oid": "o-1"}});
        assert_eq!(pointer_str("orgs/new", &body, "/data/oid"), Ok("o-1".to_string()));
        let err = pointer_str("orgs/new", &body, "/data/gid").unwrap_err();
        assert!(matches!(err, ClientError::Decode { ref reason, .. } if reason.contains("/data/gid")));
    }

    #[test]
    fn path_segment_keeps_names_inside_one_segment() {
        assert_eq!(path_segment("group-perms_v2.txt~1"), "group-perms_v2.txt~1");
        assert_eq!(path_segment("team/perms?x=1#frag"), "team%2Fperms%3Fx%3D1%23frag");
        assert_eq!(path_segment("a b"), "a%20b");
    }
}
