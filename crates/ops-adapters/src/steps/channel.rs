//! Steps del playbook de creación de canal.
use std::sync::Arc;

use ops_core::{ExecutionContext, IdentityLookupBatch, IdentityResolver, StepDefinition, StepError, StepKind,
               StepOutput, StepRunResult};
use serde_json::Value;

use super::{upstream, CREATE_CHANNEL, INVITE_MEMBERS, RESOLVE_MEMBERS};
use crate::clients::{ChatPlatform, EmailLookup};

/// Resuelve los emails de los miembros a ids de usuario del chat.
///
/// Nunca falla: el lote completo queda en el output (`outcomes`, más ids,
/// errores y `ok` como resumen) y es `invite_members` quien decide. Sin
/// miembros no hace ninguna llamada.
pub struct ResolveMembersStep {
    chat: Arc<dyn ChatPlatform>,
    emails: Vec<String>,
}

impl ResolveMembersStep {
    pub fn new(chat: Arc<dyn ChatPlatform>, emails: Vec<String>) -> Self {
        Self { chat, emails }
    }
}

impl StepDefinition for ResolveMembersStep {
    fn id(&self) -> &str {
        RESOLVE_MEMBERS
    }

    fn kind(&self) -> StepKind {
        StepKind::Quiet
    }

    fn run(&self, _ctx: &ExecutionContext) -> StepRunResult {
        let skipped = self.emails.is_empty();
        let batch = if skipped {
            IdentityLookupBatch::default()
        } else {
            let lookup = EmailLookup::new(self.chat.as_ref());
            IdentityResolver::new(&lookup).resolve(&self.emails)
        };
        let user_ids: Vec<String> = batch.resolved().into_values().collect();
        let output = StepOutput::new().with("skipped", skipped)
                                      .with("requested", batch.len())
                                      .with("user_ids", user_ids)
                                      .with("errors", batch.errors())
                                      .with("ok", batch.ok())
                                      .with("outcomes", serde_json::to_value(&batch).unwrap_or_default());
        StepRunResult::Success { output }
    }

    fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
        if output.get_bool("skipped") == Some(true) {
            return "No members to look up".to_string();
        }
        let found = output.get("user_ids").and_then(Value::as_array).map_or(0, Vec::len);
        let failed = output.get("errors").and_then(Value::as_array).map_or(0, Vec::len);
        let summary = format!("Looked up {found} of {} members ({failed} failed)", self.emails.len());
        if output.get_bool("ok") == Some(true) {
            return summary;
        }
        format!("{summary}; members will not be invited")
    }
}

pub struct CreateChannelStep {
    chat: Arc<dyn ChatPlatform>,
    name: String,
    private: bool,
}

impl CreateChannelStep {
    pub fn new(chat: Arc<dyn ChatPlatform>, name: impl Into<String>, private: bool) -> Self {
        Self { chat,
               name: name.into(),
               private }
    }
}

impl StepDefinition for CreateChannelStep {
    fn id(&self) -> &str {
        CREATE_CHANNEL
    }

    fn kind(&self) -> StepKind {
        StepKind::Announced
    }

    fn run(&self, _ctx: &ExecutionContext) -> StepRunResult {
        self.chat
            .create_channel(&self.name, self.private)
            .map(|id| StepOutput::new().with("channel_id", id))
            .map_err(|e| StepError::new(CREATE_CHANNEL, format!("Error creating channel {}", self.name)).with_cause(e))
            .into()
    }

    fn start_message(&self, _ctx: &ExecutionContext) -> String {
        let visibility = if self.private { "private" } else { "public" };
        format!("Creating {visibility} channel {}", self.name)
    }

    fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
        format!("Channel {} created with ID: {}", self.name, output.get_str("channel_id").unwrap_or_default())
    }
}

/// Invitación masiva, condicionada a que todas las identidades resolvieran.
pub struct InviteMembersStep {
    chat: Arc<dyn ChatPlatform>,
}

impl InviteMembersStep {
    pub fn new(chat: Arc<dyn ChatPlatform>) -> Self {
        Self { chat }
    }

    fn invite(&self, ctx: &ExecutionContext) -> Result<StepOutput, StepError> {
        let channel_id = upstream(ctx, INVITE_MEMBERS, CREATE_CHANNEL, "channel_id")?;
        let outcomes = ctx.outputs
                          .get(RESOLVE_MEMBERS)
                          .and_then(|o| o.get("outcomes"))
                          .cloned()
                          .ok_or_else(|| StepError::new(INVITE_MEMBERS, "missing output from step 'resolve_members'"))?;
        let batch: IdentityLookupBatch = serde_json::from_value(outcomes).map_err(|e| {
                                             StepError::new(INVITE_MEMBERS, "unreadable member lookup batch").with_cause(e)
                                         })?;

        let user_ids = batch.into_result(INVITE_MEMBERS)?;
        if user_ids.is_empty() {
            return Ok(StepOutput::new().with("channel_id", channel_id).with("invited", 0));
        }
        self.chat.invite_members(channel_id, &user_ids).map_err(|e| {
                                                           StepError::new(INVITE_MEMBERS,
                                                                          format!("Error inviting members to channel {channel_id}"))
                                                               .with_cause(e)
                                                       })?;
        Ok(StepOutput::new().with("channel_id", channel_id).with("invited", user_ids.len()))
    }
}

impl StepDefinition for InviteMembersStep {
    fn id(&self) -> &str {
        INVITE_MEMBERS
    }

    fn kind(&self) -> StepKind {
        StepKind::Quiet
    }

    fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
        self.invite(ctx).into()
    }

    fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
        let channel = output.get_str("channel_id").unwrap_or_default();
        match output.get("invited").and_then(Value::as_u64) {
            Some(0) | None => format!("No members to invite to channel {channel}"),
            Some(n) => format!("Invited {n} members to channel {channel}"),
        }
    }
}
