//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y construye un `AppConfig` inmutable con
//! los endpoints de los colaboradores, la credencial de servicio del secret
//! store y la política de permisos vacíos.
use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use ops_adapters::clients::HttpSettings;
use ops_adapters::EmptyPermissionPolicy;
use ops_core::SecretValue;

use crate::errors::AppError;

pub const DEFAULT_ORG_API_URL: &str = "https://api.limacharlie.io/v1";
pub const DEFAULT_JWT_URL: &str = "https://jwt.limacharlie.io";
pub const DEFAULT_CHAT_API_URL: &str = "https://slack.com/api";
pub const DEFAULT_SECRETS_URL: &str = "https://api.limacharlie.io/v1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpSettings,
    /// Organización de servicio dueña de los secretos y payloads.
    pub secrets_oid: String,
    pub secrets_api_key: SecretValue,
    pub permission_policy: EmptyPermissionPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo de `get`; los tests pasan un mapa.
    pub fn from_lookup<F>(get: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let value = |key: &str, default: &str| get(key).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            get(key).filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| AppError::Config(format!("{key} no definido")))
        };

        let timeout_secs = match get("OPSFLOW_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim()
                            .parse::<u64>()
                            .map_err(|_| AppError::Config(format!("OPSFLOW_HTTP_TIMEOUT_SECS inválido: '{raw}'")))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        let allow_empty = match get("OPSFLOW_ALLOW_EMPTY_PERMISSIONS") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                                              AppError::Config(format!("OPSFLOW_ALLOW_EMPTY_PERMISSIONS inválido: '{raw}'"))
                                          })?,
            None => false,
        };

        Ok(Self { http: HttpSettings { org_api_url: value("OPSFLOW_ORG_API_URL", DEFAULT_ORG_API_URL),
                                       jwt_url: value("OPSFLOW_JWT_URL", DEFAULT_JWT_URL),
                                       chat_api_url: value("OPSFLOW_CHAT_API_URL", DEFAULT_CHAT_API_URL),
                                       secrets_url: value("OPSFLOW_SECRETS_URL", DEFAULT_SECRETS_URL),
                                       timeout_secs },
                  secrets_oid: required("OPSFLOW_SECRETS_OID")?,
                  secrets_api_key: SecretValue::new(required("OPSFLOW_SECRETS_API_KEY")?),
                  permission_policy: if allow_empty {
                      EmptyPermissionPolicy::Allow
                  } else {
                      EmptyPermissionPolicy::Reject
                  } })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Forzar carga temprana de .env desde el binario.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_values_are_set() {
        let cfg = AppConfig::from_lookup(lookup(&[("OPSFLOW_SECRETS_OID", "oid-1"),
                                                  ("OPSFLOW_SECRETS_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.http.org_api_url, DEFAULT_ORG_API_URL);
        assert_eq!(cfg.http.chat_api_url, DEFAULT_CHAT_API_URL);
        assert_eq!(cfg.http.timeout_secs, 30);
        assert_eq!(cfg.permission_policy, EmptyPermissionPolicy::Reject);
        assert_eq!(cfg.secrets_oid, "oid-1");
    }

    #[test]
    fn missing_service_credential_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("OPSFLOW_SECRETS_OID", "oid-1")])).unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("OPSFLOW_SECRETS_API_KEY")));
    }

    #[test]
    fn invalid_numbers_and_flags_are_rejected() {
        let base = [("OPSFLOW_SECRETS_OID", "oid-1"), ("OPSFLOW_SECRETS_API_KEY", "k")];

        let mut bad_timeout = base.to_vec();
        bad_timeout.push(("OPSFLOW_HTTP_TIMEOUT_SECS", "soon"));
        assert!(AppConfig::from_lookup(lookup(&bad_timeout)).is_err());

        let mut bad_flag = base.to_vec();
        bad_flag.push(("OPSFLOW_ALLOW_EMPTY_PERMISSIONS", "maybe"));
        assert!(AppConfig::from_lookup(lookup(&bad_flag)).is_err());

        let mut allow = base.to_vec();
        allow.push(("OPSFLOW_ALLOW_EMPTY_PERMISSIONS", "TRUE"));
        allow.push(("OPSFLOW_HTTP_TIMEOUT_SECS", "5"));
        let cfg = AppConfig::from_lookup(lookup(&allow)).unwrap();
        assert_eq!(cfg.permission_policy, EmptyPermissionPolicy::Allow);
        assert_eq!(cfg.http.timeout_secs, 5);
    }
}
