//! Payloads de disparo de los playbooks.
//!
//! El disparador entrega un objeto JSON, a veces envuelto como
//! `{"data": {...}}`. Los campos obligatorios ausentes hacen fallar la
//! deserialización; `validate` añade las comprobaciones de contenido. Todo
//! esto ocurre antes de cualquier llamada externa.
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlaybookError;
use crate::region::Region;
use crate::template::TemplateRef;

/// Lista de miembros: acepta un array JSON o un string separado por comas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UsersField")]
pub struct UserList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum UsersField {
    List(Vec<String>),
    Csv(String),
}

impl From<UsersField> for UserList {
    fn from(field: UsersField) -> Self {
        let items = match field {
            UsersField::List(v) => v,
            UsersField::Csv(s) => s.split(',').map(str::to_string).collect(),
        };
        UserList(items.into_iter()
                      .map(|u| u.trim().to_string())
                      .filter(|u| !u.is_empty())
                      .collect())
    }
}

impl UserList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entradas URL-decodificadas (el disparador de chat las codifica).
    pub fn decoded(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|u| percent_decode_str(u).decode_utf8_lossy().into_owned())
            .collect()
    }
}

impl From<Vec<&str>> for UserList {
    fn from(v: Vec<&str>) -> Self {
        UserList::from(UsersField::List(v.into_iter().map(str::to_string).collect()))
    }
}

/// Deserializa un request aceptando el sobre `{"data": {...}}`.
pub fn from_trigger<T: DeserializeOwned>(mut value: Value) -> Result<T, PlaybookError> {
    let inner = value.get_mut("data").filter(|d| d.is_object()).map(Value::take);
    serde_json::from_value(inner.unwrap_or(value)).map_err(|e| PlaybookError::InvalidInput(e.to_string()))
}

fn require(field: &str, value: &str) -> Result<(), PlaybookError> {
    if value.trim().is_empty() {
        return Err(PlaybookError::InvalidInput(format!("missing required field '{field}'")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrgRequest {
    pub org_name: String,
    pub org_location: String,
    /// Email del solicitante; queda como owner del grupo.
    pub requestor: String,
    #[serde(default)]
    pub users: UserList,
    /// Referencia al secreto `"<uid>/<key>"` con el que se actúa.
    pub lc_user_secret: String,
    /// Referencia al token del chat.
    pub slack_secret: String,
    pub slack_channel: String,
    /// Referencia al secreto con la lista de permisos del grupo.
    pub group_perm_secret: String,
    #[serde(default)]
    pub iac_url: Option<String>,
}

/// Request de creación de org ya validado.
#[derive(Debug, Clone)]
pub struct ValidatedOrgRequest {
    pub region: Region,
    pub template: Option<TemplateRef>,
}

impl CreateOrgRequest {
    pub fn validate(&self) -> Result<ValidatedOrgRequest, PlaybookError> {
        require("org_name", &self.org_name)?;
        require("requestor", &self.requestor)?;
        require("lc_user_secret", &self.lc_user_secret)?;
        require("slack_secret", &self.slack_secret)?;
        require("slack_channel", &self.slack_channel)?;
        require("group_perm_secret", &self.group_perm_secret)?;
        let region: Region = self.org_location.parse()?;
        let template = self.iac_url.as_deref().and_then(TemplateRef::parse);
        Ok(ValidatedOrgRequest { region, template })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateChannelRequest {
    pub channel_name: String,
    /// `"true"` (sin distinguir mayúsculas) crea un canal privado.
    #[serde(default)]
    pub is_private: String,
    #[serde(default)]
    pub users: UserList,
    pub slack_secret: String,
    pub response_url: String,
    /// Id en el chat de quien pidió el canal.
    pub src_user_id: String,
    /// Canal opcional para los avisos de progreso; sin él van al log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_channel: Option<String>,
}

impl CreateChannelRequest {
    pub fn validate(&self) -> Result<(), PlaybookError> {
        require("channel_name", &self.channel_name)?;
        require("slack_secret", &self.slack_secret)?;
        require("response_url", &self.response_url)?;
        require("src_user_id", &self.src_user_id)
    }

    pub fn private(&self) -> bool {
        self.is_private.trim().eq_ignore_ascii_case("true")
    }

    pub fn member_emails(&self) -> Vec<String> {
        self.users.decoded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn org_json() -> Value {
        json!({
            "org_name": "acme",
            "org_location": "eu",
            "requestor": "owner@acme.io",
            "users": "a@acme.io, b@acme.io",
            "lc_user_secret": "lc-user",
            "slack_secret": "slack-token",
            "slack_channel": "#provisioning",
            "group_perm_secret": "group-perms",
            "iac_url": ""
        })
    }

    #[test]
    fn accepts_data_envelope_and_csv_users() {
        let req: CreateOrgRequest = from_trigger(json!({ "data": org_json() })).unwrap();
        assert_eq!(req.users.as_slice(), ["a@acme.io", "b@acme.io"]);
        let v = req.validate().unwrap();
        assert_eq!(v.region, Region::Eu);
        assert_eq!(v.template, None);
    }

    #[test]
    fn missing_field_is_input_error() {
        let mut raw = org_json();
        raw.as_object_mut().unwrap().remove("requestor");
        let err = from_trigger::<CreateOrgRequest>(raw).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut req: CreateOrgRequest = from_trigger(org_json()).unwrap();
        req.org_name = "  ".into();
        assert!(req.validate().unwrap_err().to_string().contains("org_name"));
    }

    #[test]
    fn channel_request_flags_and_decoding() {
        let req: CreateChannelRequest = from_trigger(json!({
            "channel_name": "incident-42",
            "is_private": "TRUE",
            "users": ["a%40acme.io", "b+ops@acme.io"],
            "slack_secret": "slack-token",
            "response_url": "https://hooks.example/r/1",
            "src_user_id": "U999"
        })).unwrap();
        assert!(req.private());
        assert_eq!(req.member_emails(), vec!["a@acme.io", "b+ops@acme.io"]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_users_string_means_no_members() {
        let list: UserList = serde_json::from_value(json!("")).unwrap();
        assert!(list.is_empty());
        let missing: CreateChannelRequest = from_trigger(json!({
            "channel_name": "c", "slack_secret": "s", "response_url": "u", "src_user_id": "U1"
        })).unwrap();
        assert!(missing.users.is_empty());
        assert!(!missing.private());
    }
}
