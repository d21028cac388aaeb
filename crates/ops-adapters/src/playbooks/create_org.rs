//! Playbook de creación de organización.
//!
//! validate -> secretos -> credencial -> clientes -> engine
//! (`create_org`, `create_group`, `add_owner`, `link_group`,
//! `set_permissions`) -> aviso de fin. Los errores de entrada se detectan
//! antes de tocar ningún colaborador; un fallo de step detiene el run sin
//! deshacer lo ya creado.
use std::sync::Arc;

use ops_core::{CoreEngineError, DefinitionBuilder, FlowDefinition, FlowEngine, Notice, NotifyTarget, RunContext,
               RunOutputs};
use serde::Serialize;

use super::Collaborators;
use crate::clients::OrgManager;
use crate::credentials::{ActingCredential, RunCredentials};
use crate::error::PlaybookError;
use crate::notifier::ChatNotifier;
use crate::permissions::EmptyPermissionPolicy;
use crate::request::{CreateOrgRequest, ValidatedOrgRequest};
use crate::steps::{AddOwnerStep, CreateGroupStep, CreateOrgStep, LinkGroupStep, SetPermissionsStep, CREATE_GROUP,
                   CREATE_ORG};
use crate::template::TemplateLoader;

pub const PLAYBOOK: &str = "create_org";

/// Resultado de un run completo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgRunOutcome {
    pub oid: String,
    pub gid: String,
    pub owner: String,
    pub users: Vec<String>,
    pub org_name: String,
    /// Identificador de región del backend (no el código corto).
    pub org_location: String,
    pub slack_channel: String,
    pub iac_url: Option<String>,
}

pub struct CreateOrgPlaybook {
    collaborators: Collaborators,
    policy: EmptyPermissionPolicy,
}

impl CreateOrgPlaybook {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators,
               policy: EmptyPermissionPolicy::default() }
    }

    pub fn with_policy(mut self, policy: EmptyPermissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Secuencia fija de steps para un request ya validado.
    pub fn definition(&self,
                      orgs: Arc<dyn OrgManager>,
                      request: &CreateOrgRequest,
                      validated: &ValidatedOrgRequest)
                      -> FlowDefinition {
        let loader = TemplateLoader::new(self.collaborators.templates.clone(), self.collaborators.payloads.clone());
        DefinitionBuilder::new(PLAYBOOK).first_step(CreateOrgStep::new(orgs.clone(),
                                                                       loader,
                                                                       request.org_name.as_str(),
                                                                       validated.region,
                                                                       validated.template.clone()))
                                        .add_step(CreateGroupStep::new(orgs.clone(), request.org_name.as_str()))
                                        .add_step(AddOwnerStep::new(orgs.clone(), request.requestor.as_str()))
                                        .add_step(LinkGroupStep::new(orgs.clone()))
                                        .add_step(SetPermissionsStep::new(orgs,
                                                                          self.collaborators.secrets.clone(),
                                                                          request.group_perm_secret.as_str(),
                                                                          self.policy))
                                        .build()
    }

    fn credentials(&self, request: &CreateOrgRequest) -> Result<RunCredentials, PlaybookError> {
        let acting = ActingCredential::parse(&self.collaborators.secret(&request.lc_user_secret)?)?;
        let chat_token = self.collaborators.secret(&request.slack_secret)?;
        Ok(RunCredentials { acting, chat_token })
    }

    pub fn run(&self, request: &CreateOrgRequest) -> Result<OrgRunOutcome, PlaybookError> {
        let validated = request.validate()?;
        let credentials = self.credentials(request)?;

        let orgs = self.collaborators.factory.org_manager(&credentials.acting)?;
        let chat = self.collaborators.factory.chat_platform(&credentials.chat_token)?;
        let notifier = ChatNotifier::new(chat);
        let target = NotifyTarget::new(&notifier, &request.slack_channel);

        let definition = self.definition(orgs, request, &validated);
        let run = RunContext::new(PLAYBOOK);
        log::info!("run {}: creating org '{}' in {} as {}",
                   run.run_id,
                   request.org_name,
                   validated.region.backend_id(),
                   credentials.acting.uid);

        let mut engine = FlowEngine::new();
        let outputs = engine.run(&run, &definition, target)?;

        // el fallo del aviso ya queda en el log del NotifyTarget
        let _ = target.send(&Notice::completed(format!("Completed creating org {} in {}",
                                                        request.org_name,
                                                        validated.region.backend_id())));

        Ok(OrgRunOutcome { oid: required(&outputs, CREATE_ORG, "oid")?,
                           gid: required(&outputs, CREATE_GROUP, "gid")?,
                           owner: request.requestor.clone(),
                           users: request.users.as_slice().to_vec(),
                           org_name: request.org_name.clone(),
                           org_location: validated.region.backend_id().to_string(),
                           slack_channel: request.slack_channel.clone(),
                           iac_url: request.iac_url.clone().filter(|u| !u.trim().is_empty()) })
    }
}

fn required(outputs: &RunOutputs, step: &str, key: &str) -> Result<String, PlaybookError> {
    outputs.get_str(step, key)
           .map(str::to_string)
           .ok_or_else(|| CoreEngineError::Internal(format!("step '{step}' produced no '{key}'")).into())
}
