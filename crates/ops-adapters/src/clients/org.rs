//! Cliente del backend de gestión de organizaciones.
//!
//! Autenticación: el credencial de actuación (`uid` + api key) se cambia por
//! un JWT en la primera llamada del run.
use ops_core::SecretValue;
use reqwest::blocking::Client;
use serde_json::Value;

use super::http::{path_segment, pointer_str, read_json, send_error, JwtAuth};
use super::{ClientError, OrgManager};
use crate::credentials::ActingCredential;

pub struct OrgApiClient {
    client: Client,
    base_url: String,
    auth: JwtAuth,
}

impl OrgApiClient {
    pub fn new(client: Client, base_url: &str, jwt_url: &str, credential: &ActingCredential) -> Self {
        let form = vec![("uid".to_string(), SecretValue::new(credential.uid.clone())),
                        ("secret".to_string(), credential.key().clone())];
        Self { client,
               base_url: base_url.trim_end_matches('/').to_string(),
               auth: JwtAuth::new(jwt_url, form) }
    }

    fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<Value, ClientError> {
        let bearer = self.auth.bearer(&self.client)?;
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("org api call: POST {path}");
        let response = self.client
                           .post(&url)
                           .bearer_auth(bearer)
                           .form(form)
                           .send()
                           .map_err(|e| send_error(path, e))?;
        let body = read_json(path, response)?;
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Err(ClientError::Api(error.to_string()));
        }
        Ok(body)
    }
}

impl OrgManager for OrgApiClient {
    fn create_org(&self, name: &str, location: &str, template: Option<&str>) -> Result<String, ClientError> {
        let mut form = vec![("name", name), ("loc", location)];
        if let Some(t) = template {
            form.push(("template", t));
        }
        let body = self.post("orgs/new", &form)?;
        pointer_str("orgs/new", &body, "/data/oid")
    }

    fn create_group(&self, name: &str) -> Result<String, ClientError> {
        let body = self.post("groups", &[("name", name)])?;
        pointer_str("groups", &body, "/data/gid")
    }

    fn add_group_owner(&self, group_id: &str, owner_email: &str) -> Result<(), ClientError> {
        self.post(&format!("groups/{}/owners", path_segment(group_id)), &[("member_email", owner_email)])
            .map(|_| ())
    }

    fn add_group_to_org(&self, group_id: &str, org_id: &str) -> Result<(), ClientError> {
        self.post(&format!("groups/{}/orgs", path_segment(group_id)), &[("oid", org_id)])
            .map(|_| ())
    }

    fn set_group_permissions(&self, group_id: &str, permissions: &[String]) -> Result<(), ClientError> {
        let form: Vec<(&str, &str)> = permissions.iter().map(|p| ("perm", p.as_str())).collect();
        self.post(&format!("groups/{}/permissions", path_segment(group_id)), &form)
            .map(|_| ())
    }
}
