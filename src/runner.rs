//! Carga del request de disparo, cableado de clientes HTTP y ejecución de
//! un playbook. La salida se envuelve como `{"data": ...}`.
use std::fs;
use std::io::Read;
use std::sync::Arc;

use ops_adapters::clients::{HttpClientFactory, HttpPayloadStore, HttpSecretStore, HttpTemplateFetcher};
use ops_adapters::{from_trigger, Collaborators, CreateChannelPlaybook, CreateChannelRequest, CreateOrgPlaybook,
                   CreateOrgRequest, EmptyPermissionPolicy};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::errors::AppError;

/// Lee el JSON del request desde un fichero o desde stdin (`-`).
pub fn read_request(source: &str) -> Result<Value, AppError> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(source)?
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Colaboradores HTTP reales compartiendo un único cliente.
pub fn http_collaborators(config: &AppConfig) -> Result<Collaborators, AppError> {
    let factory = HttpClientFactory::new(config.http.clone())?;
    let settings = factory.settings();
    let secrets = HttpSecretStore::new(factory.client().clone(),
                                       &settings.secrets_url,
                                       &settings.jwt_url,
                                       &config.secrets_oid,
                                       config.secrets_api_key.clone());
    let payloads = HttpPayloadStore::new(factory.client().clone(),
                                         &settings.secrets_url,
                                         &settings.jwt_url,
                                         &config.secrets_oid,
                                         config.secrets_api_key.clone());
    let templates = HttpTemplateFetcher::new(factory.client().clone());
    Ok(Collaborators { secrets: Arc::new(secrets),
                       payloads: Arc::new(payloads),
                       templates: Arc::new(templates),
                       factory: Arc::new(factory) })
}

pub fn run_create_org(collaborators: Collaborators,
                      policy: EmptyPermissionPolicy,
                      raw: Value)
                      -> Result<Value, AppError> {
    let request: CreateOrgRequest = from_trigger(raw)?;
    let outcome = CreateOrgPlaybook::new(collaborators).with_policy(policy).run(&request)?;
    log::info!("org '{}' created with id {}", outcome.org_name, outcome.oid);
    Ok(json!({ "data": outcome }))
}

/// Devuelve `(ok, salida)`: el informe existe también cuando el run falla.
pub fn run_create_channel(collaborators: Collaborators, raw: Value) -> Result<(bool, Value), AppError> {
    let request: CreateChannelRequest = from_trigger(raw)?;
    let report = CreateChannelPlaybook::new(collaborators).run(&request)?;
    if let Some(error) = &report.error {
        log::warn!("channel '{}' not fully provisioned: {error}", request.channel_name);
    }
    Ok((report.ok, json!({ "data": report })))
}
