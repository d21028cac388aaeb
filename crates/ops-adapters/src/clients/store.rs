//! Secret store, payload store y descarga de plantillas por HTTP.
use ops_core::SecretValue;
use reqwest::blocking::Client;

use super::http::{check_status, path_segment, pointer_str, read_json, send_error, JwtAuth};
use super::{ClientError, PayloadStore, SecretStore, TemplateFetcher};

/// Secretos guardados en el hive `secret` de la organización de servicio.
pub struct HttpSecretStore {
    client: Client,
    base_url: String,
    oid: String,
    auth: JwtAuth,
}

impl HttpSecretStore {
    pub fn new(client: Client, base_url: &str, jwt_url: &str, oid: &str, api_key: SecretValue) -> Self {
        let form = vec![("oid".to_string(), SecretValue::new(oid)), ("secret".to_string(), api_key)];
        Self { client,
               base_url: base_url.trim_end_matches('/').to_string(),
               oid: oid.to_string(),
               auth: JwtAuth::new(jwt_url, form) }
    }
}

impl SecretStore for HttpSecretStore {
    fn get(&self, name: &str) -> Result<SecretValue, ClientError> {
        let bearer = self.auth.bearer(&self.client)?;
        let url = format!("{}/hive/secret/{}/{}/data",
                          self.base_url,
                          path_segment(&self.oid),
                          path_segment(name));
        let response = self.client
                           .get(&url)
                           .bearer_auth(bearer)
                           .send()
                           .map_err(|e| send_error("hive/secret", e))?;
        let body = read_json("hive/secret", response)?;
        pointer_str("hive/secret", &body, "/data/secret").map(SecretValue::new)
    }
}

/// Payloads con nombre: el API devuelve una URL firmada que se descarga
/// en una segunda llamada.
pub struct HttpPayloadStore {
    client: Client,
    base_url: String,
    oid: String,
    auth: JwtAuth,
}

impl HttpPayloadStore {
    pub fn new(client: Client, base_url: &str, jwt_url: &str, oid: &str, api_key: SecretValue) -> Self {
        let form = vec![("oid".to_string(), SecretValue::new(oid)), ("secret".to_string(), api_key)];
        Self { client,
               base_url: base_url.trim_end_matches('/').to_string(),
               oid: oid.to_string(),
               auth: JwtAuth::new(jwt_url, form) }
    }
}

impl PayloadStore for HttpPayloadStore {
    fn get(&self, name: &str) -> Result<Vec<u8>, ClientError> {
        let bearer = self.auth.bearer(&self.client)?;
        let url = format!("{}/payload/{}/{}", self.base_url, path_segment(&self.oid), path_segment(name));
        let response = self.client
                           .get(&url)
                           .bearer_auth(bearer)
                           .send()
                           .map_err(|e| send_error("payload", e))?;
        let body = read_json("payload", response)?;
        let signed = pointer_str("payload", &body, "/get_url")?;
        download(&self.client, "payload download", &signed)
    }
}

pub struct HttpTemplateFetcher {
    client: Client,
}

impl HttpTemplateFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl TemplateFetcher for HttpTemplateFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        download(&self.client, "template", url)
    }
}

fn download(client: &Client, endpoint: &str, url: &str) -> Result<Vec<u8>, ClientError> {
    let response = client.get(url).send().map_err(|e| send_error(endpoint, e))?;
    let bytes = check_status(endpoint, response)?.bytes()
                                                 .map_err(|e| ClientError::Decode { endpoint: endpoint.to_string(),
                                                                                    reason: e.to_string() })?;
    Ok(bytes.to_vec())
}
