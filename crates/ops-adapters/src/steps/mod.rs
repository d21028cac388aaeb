//! Steps concretos de los playbooks.
//!
//! Cada step guarda sus colaboradores (`Arc<dyn ...>`) y parámetros ya
//! validados; los ids producidos por steps anteriores se leen de
//! `ExecutionContext::outputs`.
pub mod channel;
pub mod org;

use ops_core::{ExecutionContext, StepError};

pub use channel::{CreateChannelStep, InviteMembersStep, ResolveMembersStep};
pub use org::{AddOwnerStep, CreateGroupStep, CreateOrgStep, LinkGroupStep, SetPermissionsStep};

pub const CREATE_ORG: &str = "create_org";
pub const CREATE_GROUP: &str = "create_group";
pub const ADD_OWNER: &str = "add_owner";
pub const LINK_GROUP: &str = "link_group";
pub const SET_PERMISSIONS: &str = "set_permissions";

pub const RESOLVE_MEMBERS: &str = "resolve_members";
pub const CREATE_CHANNEL: &str = "create_channel";
pub const INVITE_MEMBERS: &str = "invite_members";

/// Valor `key` del output de `from`. Su ausencia es un error del playbook,
/// no del colaborador.
pub(crate) fn upstream<'a>(ctx: &ExecutionContext<'a>, step: &str, from: &str, key: &str) -> Result<&'a str, StepError> {
    ctx.outputs
       .get_str(from, key)
       .ok_or_else(|| StepError::new(step, format!("missing '{key}' from step '{from}'")))
}
