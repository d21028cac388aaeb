//! Tipos de repositorio: estado reconstruido (`RunInstance`) y definición
//! (`FlowDefinition`).
//!
//! El replay es lineal: consume eventos en orden y actualiza un slot por
//! step. Es la forma de observar en qué estado de la máquina
//! (`ORG_CREATED`, `GROUP_CREATED`, ..., `FAILED`) terminó un run.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::{RunEvent, RunEventKind};
use crate::hashing::definition_hash;
use crate::step::{StepDefinition, StepStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

#[derive(Debug)]
pub struct RunInstance {
    pub id: Uuid,
    pub steps: Vec<StepSlot>,
    pub cursor: usize,
    pub status: RunStatus,
}

/// Estado de un step en la instancia.
#[derive(Debug)]
pub struct StepSlot {
    pub step_id: String,
    pub status: StepStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunInstance {
    pub fn replay(run_id: Uuid, events: &[RunEvent], definition: &FlowDefinition) -> Self {
        let mut steps: Vec<StepSlot> = definition.steps
                                                 .iter()
                                                 .map(|s| StepSlot { step_id: s.id().to_string(),
                                                                     status: StepStatus::Pending,
                                                                     started_at: None,
                                                                     finished_at: None })
                                                 .collect();
        let mut status = RunStatus::Running;
        for ev in events {
            match &ev.kind {
                RunEventKind::StepStarted { step_index, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Running;
                        slot.started_at = Some(ev.ts);
                    }
                }
                RunEventKind::StepFinished { step_index, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::FinishedOk;
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::StepFailed { step_index, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Failed;
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::RunCompleted { .. } => status = RunStatus::Completed,
                RunEventKind::RunFailed { .. } => status = RunStatus::Failed,
                RunEventKind::RunInitialized { .. } | RunEventKind::NotificationFailed { .. } => {}
            }
        }
        let cursor = steps.iter()
                          .position(|s| matches!(s.status, StepStatus::Pending))
                          .unwrap_or(steps.len());
        RunInstance { id: run_id,
                      steps,
                      cursor,
                      status }
    }

    /// Id del último step terminado con éxito (el "estado" alcanzado).
    pub fn last_finished(&self) -> Option<&str> {
        self.steps
            .iter()
            .rev()
            .find(|s| s.status == StepStatus::FinishedOk)
            .map(|s| s.step_id.as_str())
    }

    pub fn status_of(&self, step_id: &str) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.step_id == step_id).map(|s| s.status)
    }
}

/// Definición inmutable de un playbook.
pub struct FlowDefinition {
    pub name: String,
    pub steps: Vec<Box<dyn StepDefinition>>,
    pub definition_hash: String,
}

impl FlowDefinition {
    pub fn new(name: impl Into<String>, steps: Vec<Box<dyn StepDefinition>>) -> Self {
        let name = name.into();
        let ids: Vec<&str> = steps.iter().map(|s| s.id()).collect();
        let definition_hash = definition_hash(&name, &ids);
        Self { name,
               steps,
               definition_hash }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id()).collect()
    }
}

impl std::fmt::Debug for FlowDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowDefinition")
         .field("name", &self.name)
         .field("steps", &self.step_ids())
         .field("definition_hash", &self.definition_hash)
         .finish()
    }
}
