//! Definición de playbook y estado reconstruido de un run.

mod types;

pub use types::{FlowDefinition, RunInstance, RunStatus, StepSlot};
