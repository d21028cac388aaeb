use crate::errors::StepError;
use crate::model::{ExecutionContext, StepOutput};

use super::run_result::StepRunResult;

/// Cuánto ruido hace un step en el canal de notificaciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Step largo o visible para el usuario (crear org, grupo, canal):
    /// envía un aviso "en progreso" antes de ejecutarse.
    Announced,
    /// Sólo notifica al terminar.
    Quiet,
}

/// Trait que define un Step de un playbook.
pub trait StepDefinition {
    /// Identificador estable y único dentro del playbook.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn name(&self) -> &str {
        self.id()
    }

    fn kind(&self) -> StepKind;

    /// Ejecuta la acción. Un fallo de colaborador se devuelve como
    /// `StepRunResult::Failure`, nunca como panic.
    fn run(&self, ctx: &ExecutionContext) -> StepRunResult;

    /// Texto del aviso inicial (sólo se envía para `StepKind::Announced`).
    fn start_message(&self, _ctx: &ExecutionContext) -> String {
        format!("Starting {}", self.name())
    }

    /// Texto de éxito; debe incluir el dato identificativo del output.
    fn success_message(&self, output: &StepOutput, ctx: &ExecutionContext) -> String;

    /// Texto de fallo. Por defecto el propio error, que ya nombra el step y
    /// la causa.
    fn failure_message(&self, error: &StepError, _ctx: &ExecutionContext) -> String {
        error.to_string()
    }
}
