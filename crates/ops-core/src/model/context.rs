use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{RunOutputs, StepOutput};

/// Identidad de un run de playbook. Se crea al inicio y se pasa
/// explícitamente a cada componente; nada vive en estado global.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: Uuid,
    pub playbook: String,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(playbook: impl Into<String>) -> Self {
        Self { run_id: Uuid::new_v4(),
               playbook: playbook.into(),
               started_at: Utc::now() }
    }
}

/// Contexto de ejecución entregado a `StepDefinition::run`.
pub struct ExecutionContext<'a> {
    pub run: &'a RunContext,
    pub previous: Option<&'a StepOutput>, // output del step anterior (None en el primero)
    pub outputs: &'a RunOutputs,          // todos los outputs previos por id
}

impl<'a> ExecutionContext<'a> {
    pub fn new(run: &'a RunContext, outputs: &'a RunOutputs) -> Self {
        Self { run,
               previous: outputs.last(),
               outputs }
    }
}
