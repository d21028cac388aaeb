//! Core FlowEngine implementation

use uuid::Uuid;

use crate::engine::executor::{NotifyTarget, StepExecutor};
use crate::errors::CoreEngineError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::model::{ExecutionContext, RunContext, RunOutputs};
use crate::repo::{FlowDefinition, RunInstance};

/// Motor de ejecución secuencial de playbooks.
///
/// Ejecuta los steps de una `FlowDefinition` en orden estricto, cada uno
/// bloqueando hasta que su colaborador responde. En el primer fallo
/// registra `StepFailed` + `RunFailed` y devuelve el error: no hay
/// reintentos ni compensación de los steps ya hechos.
#[derive(Debug)]
pub struct FlowEngine<E>
    where E: EventStore
{
    event_store: E,
}

impl FlowEngine<InMemoryEventStore> {
    /// Crea un nuevo engine con store en memoria
    #[inline]
    pub fn new() -> Self {
        Self::new_with_store(InMemoryEventStore::default())
    }
}

impl Default for FlowEngine<InMemoryEventStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FlowEngine<E>
    where E: EventStore
{
    pub fn new_with_store(event_store: E) -> Self {
        Self { event_store }
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Ejecuta el playbook completo y devuelve los outputs de todos los steps.
    pub fn run(&mut self,
               run: &RunContext,
               definition: &FlowDefinition,
               target: NotifyTarget<'_>)
               -> Result<RunOutputs, CoreEngineError> {
        if definition.is_empty() {
            return Err(CoreEngineError::EmptyDefinition);
        }
        let run_id = run.run_id;
        self.event_store.append_kind(run_id,
                                     RunEventKind::RunInitialized { playbook: definition.name.clone(),
                                                                    definition_hash: definition.definition_hash.clone(),
                                                                    step_count: definition.len() });
        log::info!("run {run_id}: starting playbook '{}' ({} steps)", definition.name, definition.len());

        let executor = StepExecutor::new(target);
        let mut outputs = RunOutputs::new();

        for (cursor, step_def) in definition.steps.iter().enumerate() {
            let step_id = step_def.id().to_string();
            self.event_store.append_kind(run_id,
                                         RunEventKind::StepStarted { step_index: cursor,
                                                                     step_id: step_id.clone() });

            let exec = {
                let ctx = ExecutionContext::new(run, &outputs);
                executor.execute(step_def.as_ref(), &ctx)
            };

            for failure in exec.notify_failures {
                self.event_store.append_kind(run_id,
                                             RunEventKind::NotificationFailed { step_id: step_id.clone(),
                                                                                error: failure.to_string() });
            }

            match exec.result {
                Ok(output) => {
                    self.event_store.append_kind(run_id,
                                                 RunEventKind::StepFinished { step_index: cursor,
                                                                              step_id: step_id.clone(),
                                                                              output: output.clone() });
                    outputs.insert(&step_id, output);
                }
                Err(error) => {
                    self.event_store.append_kind(run_id,
                                                 RunEventKind::StepFailed { step_index: cursor,
                                                                            step_id: step_id.clone(),
                                                                            error: error.clone() });
                    self.event_store.append_kind(run_id, RunEventKind::RunFailed { step_id });
                    log::error!("run {run_id}: playbook '{}' failed", definition.name);
                    return Err(CoreEngineError::StepFailed(error));
                }
            }
        }

        self.event_store.append_kind(run_id,
                                     RunEventKind::RunCompleted { step_count: definition.len() });
        log::info!("run {run_id}: playbook '{}' completed", definition.name);
        Ok(outputs)
    }

    /// Lista eventos de un run.
    pub fn events_for(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.list(run_id)
    }

    /// Outputs de los steps terminados de un run, reconstruidos del diario.
    /// Sirve para informar de lo ya hecho cuando el run falla a mitad.
    pub fn outputs_for(&self, run_id: Uuid) -> RunOutputs {
        let mut outputs = RunOutputs::new();
        for event in self.event_store.list(run_id) {
            if let RunEventKind::StepFinished { step_id, output, .. } = event.kind {
                outputs.insert(&step_id, output);
            }
        }
        outputs
    }

    /// Estado reconstruido de un run a partir de su diario.
    pub fn instance(&self, run_id: Uuid, definition: &FlowDefinition) -> RunInstance {
        RunInstance::replay(run_id, &self.event_store.list(run_id), definition)
    }

    /// Variante compacta de eventos (útil en tests y logs).
    pub fn event_variants(&self, run_id: Uuid) -> Vec<&'static str> {
        self.event_store
            .list(run_id)
            .iter()
            .map(|e| match e.kind {
                RunEventKind::RunInitialized { .. } => "I",
                RunEventKind::StepStarted { .. } => "S",
                RunEventKind::StepFinished { .. } => "F",
                RunEventKind::StepFailed { .. } => "X",
                RunEventKind::NotificationFailed { .. } => "N",
                RunEventKind::RunCompleted { .. } => "C",
                RunEventKind::RunFailed { .. } => "Z",
            })
            .collect()
    }
}
