//! Tipos de evento del run y estructura `RunEvent`.
//!
//! Rol en el flujo:
//! - Cada ejecución del `FlowEngine` emite eventos a un `EventStore`
//!   append-only.
//! - `RunInstance::replay` reconstruye a partir de ellos el estado de cada
//!   step y el estado terminal del run.
//! - No hay persistencia duradera: el diario vive lo que vive el proceso.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StepError;
use crate::model::StepOutput;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`: fija la forma del pipeline.
    RunInitialized { playbook: String, definition_hash: String, step_count: usize },
    /// Un step comenzó su ejecución. No implica éxito.
    StepStarted { step_index: usize, step_id: String },
    /// Un step terminó correctamente con su output.
    StepFinished { step_index: usize, step_id: String, output: StepOutput },
    /// Un step terminó con error. El run no continúa (stop-on-failure).
    StepFailed { step_index: usize, step_id: String, error: StepError },
    /// El notificador no pudo entregar un aviso. No altera el estado del step.
    NotificationFailed { step_id: String, error: String },
    RunCompleted { step_count: usize },
    RunFailed { step_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por el store (orden append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}
