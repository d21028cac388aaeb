//! Entrada inválida en la capa de aplicación: ninguna llamada a colaboradores.

use std::io::Write;
use std::sync::Arc;

use ops_adapters::{ActingCredential, ChatPlatform, ClientError, ClientFactory, Collaborators, EmptyPermissionPolicy,
                   OrgManager, PayloadStore, ResponseHook, SecretStore, TemplateFetcher};
use ops_core::SecretValue;
use opsflow_rust::runner::{read_request, run_create_channel, run_create_org};
use serde_json::json;

/// Colaborador que no debe usarse nunca.
struct Untouchable;

impl SecretStore for Untouchable {
    fn get(&self, name: &str) -> Result<SecretValue, ClientError> {
        panic!("secret store called for '{name}'")
    }
}

impl PayloadStore for Untouchable {
    fn get(&self, name: &str) -> Result<Vec<u8>, ClientError> {
        panic!("payload store called for '{name}'")
    }
}

impl TemplateFetcher for Untouchable {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        panic!("template fetcher called for '{url}'")
    }
}

impl ClientFactory for Untouchable {
    fn org_manager(&self, _credential: &ActingCredential) -> Result<Arc<dyn OrgManager>, ClientError> {
        panic!("org client requested")
    }

    fn chat_platform(&self, _token: &SecretValue) -> Result<Arc<dyn ChatPlatform>, ClientError> {
        panic!("chat client requested")
    }

    fn response_hook(&self) -> Result<Arc<dyn ResponseHook>, ClientError> {
        panic!("response hook requested")
    }
}

fn untouchable() -> Collaborators {
    Collaborators { secrets: Arc::new(Untouchable),
                    payloads: Arc::new(Untouchable),
                    templates: Arc::new(Untouchable),
                    factory: Arc::new(Untouchable) }
}

#[test]
fn unknown_region_exits_with_input_code() {
    let raw = json!({ "data": {
        "org_name": "acme",
        "org_location": "moon",
        "requestor": "owner@acme.io",
        "users": "",
        "lc_user_secret": "lc-user",
        "slack_secret": "slack-token",
        "slack_channel": "#provisioning",
        "group_perm_secret": "group-perms"
    }});

    let err = run_create_org(untouchable(), EmptyPermissionPolicy::Reject, raw).unwrap_err();

    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("Invalid org location: moon"));
}

#[test]
fn channel_request_without_response_url_is_rejected() {
    let raw = json!({
        "channel_name": "incident-42",
        "users": ["a@acme.io"],
        "slack_secret": "slack-token",
        "src_user_id": "U1"
    });

    let err = run_create_channel(untouchable(), raw).unwrap_err();

    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("response_url"));
}

#[test]
fn reads_request_from_file() {
    let path = std::env::temp_dir().join(format!("opsflow-request-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", json!({ "data": { "channel_name": "c" } })).unwrap();

    let value = read_request(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(value["data"]["channel_name"], json!("c"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_request("/definitely/not/here.json").unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().starts_with("Error en IO"));
}
