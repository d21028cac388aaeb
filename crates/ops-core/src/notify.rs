//! Notificaciones de progreso hacia un canal externo.
//!
//! Cada aviso es texto plano con un marcador de severidad delante
//! (`:rocket:`, `:white_check_mark:`, `:x:`, `:partying_face:`). Un fallo al
//! entregar un aviso se reporta al llamador pero nunca aborta un run: el
//! engine lo registra y sigue.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    InProgress,
    Success,
    Failure,
    Completed,
}

impl Severity {
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::InProgress => ":rocket:",
            Severity::Success => ":white_check_mark:",
            Severity::Failure => ":x:",
            Severity::Completed => ":partying_face:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self { severity, text: text.into() }
    }

    pub fn in_progress(text: impl Into<String>) -> Self {
        Self::new(Severity::InProgress, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self::new(Severity::Failure, text)
    }

    pub fn completed(text: impl Into<String>) -> Self {
        Self::new(Severity::Completed, text)
    }
}

/// `"<marker> <text>"`, el formato que llega al canal.
impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.marker(), self.text)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")] Transport(String),
    #[error("notification rejected by channel '{channel}': {reason}")] Rejected { channel: String, reason: String },
}

/// Destino de avisos. Una llamada = un mensaje; sin batching ni reintentos.
pub trait Notifier: Send + Sync {
    fn notify(&self, channel: &str, notice: &Notice) -> Result<(), NotifyError>;
}

/// Notificador que escribe los avisos en el log. Se usa cuando el playbook
/// no tiene canal de chat para el progreso.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, channel: &str, notice: &Notice) -> Result<(), NotifyError> {
        match notice.severity {
            Severity::Failure => log::error!("[{channel}] {notice}"),
            _ => log::info!("[{channel}] {notice}"),
        }
        Ok(())
    }
}
