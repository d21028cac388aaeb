//! Steps del playbook de creación de organización.
//!
//! Orden fijo: `create_org` -> `create_group` -> `add_owner` ->
//! `link_group` -> `set_permissions`. Cada uno depende del output de los
//! anteriores (oid, gid).
use std::sync::Arc;

use ops_core::{ExecutionContext, StepDefinition, StepError, StepKind, StepOutput, StepRunResult};

use super::{upstream, ADD_OWNER, CREATE_GROUP, CREATE_ORG, LINK_GROUP, SET_PERMISSIONS};
use crate::clients::{OrgManager, SecretStore};
use crate::permissions::{parse_permissions, EmptyPermissionPolicy};
use crate::region::Region;
use crate::template::{TemplateLoader, TemplateRef};

pub struct CreateOrgStep {
    orgs: Arc<dyn OrgManager>,
    templates: TemplateLoader,
    name: String,
    region: Region,
    template: Option<TemplateRef>,
}

impl CreateOrgStep {
    pub fn new(orgs: Arc<dyn OrgManager>,
               templates: TemplateLoader,
               name: impl Into<String>,
               region: Region,
               template: Option<TemplateRef>)
               -> Self {
        Self { orgs,
               templates,
               name: name.into(),
               region,
               template }
    }

    fn error(&self) -> StepError {
        StepError::new(CREATE_ORG,
                       format!("Error creating org {} in {}", self.name, self.region.backend_id()))
    }

    fn create(&self) -> Result<StepOutput, StepError> {
        // la plantilla se carga aquí: un fallo cuenta como fallo de creación
        let template = match &self.template {
            Some(reference) => Some(self.templates.load(reference).map_err(|e| self.error().with_cause(e))?),
            None => None,
        };
        let oid = self.orgs
                      .create_org(&self.name, self.region.backend_id(), template.as_deref())
                      .map_err(|e| self.error().with_cause(e))?;
        Ok(StepOutput::new().with("oid", oid))
    }
}

impl StepDefinition for CreateOrgStep {
    fn id(&self) -> &str {
        CREATE_ORG
    }

    fn kind(&self) -> StepKind {
        StepKind::Announced
    }

    fn run(&self, _ctx: &ExecutionContext) -> StepRunResult {
        self.create().into()
    }

    fn start_message(&self, _ctx: &ExecutionContext) -> String {
        format!("Creating org {} in {}", self.name, self.region.backend_id())
    }

    fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
        format!("Organization created with ID: {}", output.get_str("oid").unwrap_or_default())
    }
}

/// Crea el grupo con el mismo nombre que la organización.
pub struct CreateGroupStep {
    orgs: Arc<dyn OrgManager>,
    name: String,
}

impl CreateGroupStep {
    pub fn new(orgs: Arc<dyn OrgManager>, name: impl Into<String>) -> Self {
        Self { orgs, name: name.into() }
    }
}

impl StepDefinition for CreateGroupStep {
    fn id(&self) -> &str {
        CREATE_GROUP
    }

    fn kind(&self) -> StepKind {
        StepKind::Announced
    }

    fn run(&self, _ctx: &ExecutionContext) -> StepRunResult {
        self.orgs
            .create_group(&self.name)
            .map(|gid| StepOutput::new().with("gid", gid))
            .map_err(|e| StepError::new(CREATE_GROUP, format!("Error creating group {}", self.name)).with_cause(e))
            .into()
    }

    fn start_message(&self, _ctx: &ExecutionContext) -> String {
        format!("Creating group {}", self.name)
    }

    fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
        format!("Group created with ID: {}", output.get_str("gid").unwrap_or_default())
    }
}

pub struct AddOwnerStep {
    orgs: Arc<dyn OrgManager>,
    owner: String,
}

impl AddOwnerStep {
    pub fn new(orgs: Arc<dyn OrgManager>, owner: impl Into<String>) -> Self {
        Self { orgs, owner: owner.into() }
    }

    fn add(&self, ctx: &ExecutionContext) -> Result<StepOutput, StepError> {
        let gid = upstream(ctx, ADD_OWNER, CREATE_GROUP, "gid")?;
        self.orgs.add_group_owner(gid, &self.owner).map_err(|e| {
                                                      StepError::new(ADD_OWNER,
                                                                     format!("Error adding owner {} to group {gid}",
                                                                             self.owner)).with_cause(e)
                                                  })?;
        Ok(StepOutput::new().with("owner", self.owner.as_str()).with("gid", gid))
    }
}

impl StepDefinition for AddOwnerStep {
    fn id(&self) -> &str {
        ADD_OWNER
    }

    fn kind(&self) -> StepKind {
        StepKind::Quiet
    }

    fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
        self.add(ctx).into()
    }

    fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
        format!("Owner {} added to group {}", self.owner, output.get_str("gid").unwrap_or_default())
    }
}

/// Vincula el grupo a la organización recién creada.
pub struct LinkGroupStep {
    orgs: Arc<dyn OrgManager>,
}

impl LinkGroupStep {
    pub fn new(orgs: Arc<dyn OrgManager>) -> Self {
        Self { orgs }
    }

    fn link(&self, ctx: &ExecutionContext) -> Result<StepOutput, StepError> {
        let oid = upstream(ctx, LINK_GROUP, CREATE_ORG, "oid")?;
        let gid = upstream(ctx, LINK_GROUP, CREATE_GROUP, "gid")?;
        self.orgs
            .add_group_to_org(gid, oid)
            .map_err(|e| StepError::new(LINK_GROUP, format!("Error adding group {gid} to org {oid}")).with_cause(e))?;
        Ok(StepOutput::new().with("gid", gid).with("oid", oid))
    }
}

impl StepDefinition for LinkGroupStep {
    fn id(&self) -> &str {
        LINK_GROUP
    }

    fn kind(&self) -> StepKind {
        StepKind::Quiet
    }

    fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
        self.link(ctx).into()
    }

    fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
        format!("Group {} added to org {}",
                output.get_str("gid").unwrap_or_default(),
                output.get_str("oid").unwrap_or_default())
    }
}

/// Lee la lista de permisos del secret store y la aplica al grupo.
pub struct SetPermissionsStep {
    orgs: Arc<dyn OrgManager>,
    secrets: Arc<dyn SecretStore>,
    secret_name: String,
    policy: EmptyPermissionPolicy,
}

impl SetPermissionsStep {
    pub fn new(orgs: Arc<dyn OrgManager>,
               secrets: Arc<dyn SecretStore>,
               secret_name: impl Into<String>,
               policy: EmptyPermissionPolicy)
               -> Self {
        Self { orgs,
               secrets,
               secret_name: secret_name.into(),
               policy }
    }

    fn apply(&self, ctx: &ExecutionContext) -> Result<StepOutput, StepError> {
        let gid = upstream(ctx, SET_PERMISSIONS, CREATE_GROUP, "gid")?;
        let error = || StepError::new(SET_PERMISSIONS, format!("Error setting permissions for group {gid}"));

        let raw = self.secrets.get(&self.secret_name).map_err(|e| error().with_cause(e))?;
        let permissions = parse_permissions(raw.expose());
        if permissions.is_empty() {
            match self.policy {
                EmptyPermissionPolicy::Reject => {
                    return Err(error().with_cause(format!("secret '{}' contains no permissions",
                                                          self.secret_name)));
                }
                EmptyPermissionPolicy::Allow => {
                    log::warn!("secret '{}' contains no permissions; group {gid} will have none",
                               self.secret_name);
                }
            }
        }

        let list = permissions.to_vec();
        self.orgs.set_group_permissions(gid, &list).map_err(|e| error().with_cause(e))?;
        Ok(StepOutput::new().with("gid", gid).with("permissions", list))
    }
}

impl StepDefinition for SetPermissionsStep {
    fn id(&self) -> &str {
        SET_PERMISSIONS
    }

    fn kind(&self) -> StepKind {
        StepKind::Quiet
    }

    fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
        self.apply(ctx).into()
    }

    fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
        format!("Permissions set for group {}", output.get_str("gid").unwrap_or_default())
    }
}
