//! Cliente de la plataforma de chat (API web estilo Slack).
//!
//! Todas las llamadas son POST form-encoded contra `<base>/<method>` con el
//! token en el cuerpo. La API responde siempre 200 con `{"ok": bool,
//! "error": "..."}`; un `ok: false` se mapea a `ClientError::Api`. La
//! respuesta a `response_url` va aparte en `WebhookClient`, sin token.
use ops_core::SecretValue;
use reqwest::blocking::Client;
use serde_json::Value;

use super::http::{check_status, pointer_str, read_json, send_error};
use super::{ChatPlatform, ClientError, ResponseHook};

pub struct ChatApiClient {
    client: Client,
    base_url: String,
    token: SecretValue,
}

impl ChatApiClient {
    pub fn new(client: Client, base_url: &str, token: SecretValue) -> Self {
        Self { client,
               base_url: base_url.trim_end_matches('/').to_string(),
               token }
    }

    fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value, ClientError> {
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        form.push(("token", self.token.expose()));
        form.extend_from_slice(params);

        let url = format!("{}/{}", self.base_url, method);
        log::debug!("chat api call: {method}");
        let response = self.client
                           .post(&url)
                           .form(&form)
                           .send()
                           .map_err(|e| send_error(method, e))?;
        let body = read_json(method, response)?;
        check_ok(body)
    }
}

/// Convierte un cuerpo `{"ok": false, "error": ...}` en `ClientError::Api`.
pub(crate) fn check_ok(body: Value) -> Result<Value, ClientError> {
    if body.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(body);
    }
    let reason = body.get("error")
                     .and_then(Value::as_str)
                     .unwrap_or("unknown_error")
                     .to_string();
    Err(ClientError::Api(reason))
}

impl ChatPlatform for ChatApiClient {
    fn post_message(&self, channel: &str, text: &str) -> Result<(), ClientError> {
        self.call("chat.postMessage", &[("channel", channel), ("text", text)])
            .map(|_| ())
    }

    fn lookup_user_by_email(&self, email: &str) -> Result<String, ClientError> {
        let body = self.call("users.lookupByEmail", &[("email", email)])?;
        pointer_str("users.lookupByEmail", &body, "/user/id")
    }

    fn get_user_profile(&self, user_id: &str) -> Result<String, ClientError> {
        let body = self.call("users.info", &[("user", user_id)])?;
        pointer_str("users.info", &body, "/user/profile/email")
    }

    fn create_channel(&self, name: &str, is_private: bool) -> Result<String, ClientError> {
        let private = if is_private { "true" } else { "false" };
        let body = self.call("conversations.create", &[("name", name), ("is_private", private)])?;
        pointer_str("conversations.create", &body, "/channel/id")
    }

    fn invite_members(&self, channel_id: &str, user_ids: &[String]) -> Result<(), ClientError> {
        let users = user_ids.join(",");
        self.call("conversations.invite", &[("channel", channel_id), ("users", users.as_str())])
            .map(|_| ())
    }
}

/// Cliente de `response_url`: POST JSON sin autenticación.
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResponseHook for WebhookClient {
    fn reply(&self, response_url: &str, payload: &Value) -> Result<String, ClientError> {
        let response = self.client
                           .post(response_url)
                           .json(payload)
                           .send()
                           .map_err(|e| send_error("response_url", e))?;
        check_status("response_url", response)?.text()
                                               .map_err(|e| ClientError::Decode { endpoint: "response_url".into(),
                                                                                  reason: e.to_string() })
    }
}
