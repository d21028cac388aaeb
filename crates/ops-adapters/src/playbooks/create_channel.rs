//! Playbook de creación de canal de chat.
//!
//! `resolve_members` -> `create_channel` -> `invite_members` en el engine,
//! y después la respuesta al solicitante vía `response_url`, que se envía
//! exactamente una vez sea cual sea el resultado. La respuesta no necesita
//! el token del chat: si el token o el cliente fallan, el run termina en
//! fallo y se responde igual. Sólo un request inválido sale sin reply.
use std::sync::Arc;

use ops_core::constants::LOG_CHANNEL;
use ops_core::{DefinitionBuilder, FlowDefinition, FlowEngine, LogNotifier, Notifier, NotifyTarget, RunContext};
use serde::Serialize;
use serde_json::json;

use super::Collaborators;
use crate::clients::ChatPlatform;
use crate::error::PlaybookError;
use crate::notifier::ChatNotifier;
use crate::request::CreateChannelRequest;
use crate::steps::{CreateChannelStep, InviteMembersStep, ResolveMembersStep, CREATE_CHANNEL};

pub const PLAYBOOK: &str = "create_channel";
pub const EVENT_CREATED: &str = "slack_channel_created";
pub const EVENT_FAILED: &str = "slack_channel_creation_failed";

/// Eco del request más el email del solicitante.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelRequestEcho {
    #[serde(flatten)]
    pub request: CreateChannelRequest,
    pub src_user_name: String,
}

/// Informe de un run de canal; se construye siempre, también en fallo.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelRunReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub request: ChannelRequestEcho,
    pub event: String,
    pub reply_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_error: Option<String>,
}

pub struct CreateChannelPlaybook {
    collaborators: Collaborators,
}

impl CreateChannelPlaybook {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    pub fn definition(&self, chat: Arc<dyn ChatPlatform>, request: &CreateChannelRequest) -> FlowDefinition {
        DefinitionBuilder::new(PLAYBOOK).first_step(ResolveMembersStep::new(chat.clone(), request.member_emails()))
                                        .add_step(CreateChannelStep::new(chat.clone(),
                                                                         request.channel_name.as_str(),
                                                                         request.private()))
                                        .add_step(InviteMembersStep::new(chat))
                                        .build()
    }

    pub fn run(&self, request: &CreateChannelRequest) -> Result<ChannelRunReport, PlaybookError> {
        request.validate()?;
        let hook = self.collaborators.factory.response_hook()?;

        let (error, channel_id, requester) = match self.chat_client(request) {
            Ok(chat) => self.provision(&chat, request),
            Err(e) => {
                log::error!("chat client unavailable for channel '{}': {e}", request.channel_name);
                (Some(e.to_string()), None, request.src_user_id.clone())
            }
        };

        let text = reply_text(&request.channel_name, error.as_deref(), &requester);
        let payload = json!({ "replace_original": "true", "text": text });
        let (reply_body, reply_error) = match hook.reply(&request.response_url, &payload) {
            Ok(body) => (Some(body), None),
            Err(e) => {
                log::error!("reply to requester of channel '{}' failed: {e}", request.channel_name);
                (None, Some(e.to_string()))
            }
        };

        let ok = error.is_none();
        Ok(ChannelRunReport { ok,
                              error,
                              channel_id,
                              request: ChannelRequestEcho { request: request.clone(),
                                                            src_user_name: requester },
                              event: (if ok { EVENT_CREATED } else { EVENT_FAILED }).to_string(),
                              reply_body,
                              reply_error })
    }

    fn chat_client(&self, request: &CreateChannelRequest) -> Result<Arc<dyn ChatPlatform>, PlaybookError> {
        let token = self.collaborators.secret(&request.slack_secret)?;
        Ok(self.collaborators.factory.chat_platform(&token)?)
    }

    /// Ejecuta el engine; devuelve `(error, channel_id, email del solicitante)`.
    fn provision(&self,
                 chat: &Arc<dyn ChatPlatform>,
                 request: &CreateChannelRequest)
                 -> (Option<String>, Option<String>, String) {
        let notifier: Box<dyn Notifier> = match request.notify_channel {
            Some(_) => Box::new(ChatNotifier::new(chat.clone())),
            None => Box::new(LogNotifier),
        };
        let channel = request.notify_channel.as_deref().unwrap_or(LOG_CHANNEL);
        let target = NotifyTarget::new(notifier.as_ref(), channel);

        let definition = self.definition(chat.clone(), request);
        let run = RunContext::new(PLAYBOOK);
        log::info!("run {}: creating channel '{}'", run.run_id, request.channel_name);

        let mut engine = FlowEngine::new();
        let error = match engine.run(&run, &definition, target) {
            Ok(_) => None,
            Err(e) => Some(e.step_error().map_or_else(|| e.to_string(), ToString::to_string)),
        };
        let channel_id = engine.outputs_for(run.run_id)
                               .get_str(CREATE_CHANNEL, "channel_id")
                               .map(str::to_string);

        let requester = match chat.get_user_profile(&request.src_user_id) {
            Ok(email) => email,
            Err(e) => {
                log::warn!("could not resolve requester '{}': {e}", request.src_user_id);
                request.src_user_id.clone()
            }
        };
        (error, channel_id, requester)
    }
}

/// Texto de la respuesta; `error` presente significa fallo.
pub(crate) fn reply_text(channel_name: &str, error: Option<&str>, requester: &str) -> String {
    match error {
        None => format!(":white_check_mark:\tChannel created successfully. \n\t\t  Channel Name: {channel_name}\n\t\t Requested by: {requester}"),
        Some(error) => format!(":x:\tChannel creation failed. \n\t\t  Error: {error}\n\t\t  Requested by: {requester}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_text_carries_marker_and_details() {
        let ok = reply_text("incident-42", None, "me@acme.io");
        assert!(ok.starts_with(":white_check_mark:"));
        assert!(ok.contains("Channel Name: incident-42"));
        assert!(ok.contains("Requested by: me@acme.io"));

        let failed = reply_text("incident-42", Some("name_taken"), "me@acme.io");
        assert!(failed.starts_with(":x:"));
        assert!(failed.contains("Error: name_taken"));
    }
}
