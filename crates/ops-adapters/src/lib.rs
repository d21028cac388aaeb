//! ops-adapters: colaboradores externos y playbooks concretos.
//!
//! Este crate provee:
//! - Traits de colaboradores (`OrgManager`, `ChatPlatform`, `SecretStore`,
//!   `PayloadStore`, `TemplateFetcher`) y sus implementaciones HTTP
//!   bloqueantes sobre `reqwest`.
//! - Validación de entrada: tabla de regiones, parseo de permisos,
//!   referencias de plantilla IaC, requests de playbook.
//! - Steps de aprovisionamiento y los dos playbooks: creación de
//!   organización y creación de canal.
//!
//! Nota: el core sólo conoce `StepDefinition` y `StepOutput`; toda la
//! semántica de organizaciones, grupos y canales vive aquí.

pub mod clients;
pub mod credentials;
pub mod error;
pub mod notifier;
pub mod permissions;
pub mod playbooks;
pub mod region;
pub mod request;
pub mod steps;
pub mod template;

pub use clients::{ChatPlatform, ClientError, ClientFactory, OrgManager, PayloadStore, ResponseHook, SecretStore,
                  TemplateFetcher};
pub use credentials::{ActingCredential, RunCredentials};
pub use error::PlaybookError;
pub use notifier::ChatNotifier;
pub use permissions::{EmptyPermissionPolicy, PermissionSet};
pub use playbooks::{ChannelRunReport, Collaborators, CreateChannelPlaybook, CreateOrgPlaybook, OrgRunOutcome};
pub use region::Region;
pub use request::{from_trigger, CreateChannelRequest, CreateOrgRequest, UserList};
