//! Playbooks: validación, resolución de credenciales, cableado de clientes
//! y ejecución de la definición en el `FlowEngine`.
pub mod create_channel;
pub mod create_org;

use std::sync::Arc;

use ops_core::SecretValue;

use crate::clients::{ClientFactory, PayloadStore, SecretStore, TemplateFetcher};
use crate::error::PlaybookError;

pub use create_channel::{ChannelRequestEcho, ChannelRunReport, CreateChannelPlaybook};
pub use create_org::{CreateOrgPlaybook, OrgRunOutcome};

/// Colaboradores compartidos por todos los runs. Los clientes que
/// dependen de credenciales los crea `factory` en cada run.
#[derive(Clone)]
pub struct Collaborators {
    pub secrets: Arc<dyn SecretStore>,
    pub payloads: Arc<dyn PayloadStore>,
    pub templates: Arc<dyn TemplateFetcher>,
    pub factory: Arc<dyn ClientFactory>,
}

impl Collaborators {
    pub(crate) fn secret(&self, name: &str) -> Result<SecretValue, PlaybookError> {
        log::debug!("resolving secret '{name}'");
        self.secrets.get(name).map_err(|source| PlaybookError::Secret { name: name.to_string(),
                                                                         source })
    }
}
