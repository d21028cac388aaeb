//! Definiciones relacionadas a Steps.
//!
//! Un Step es una acción de aprovisionamiento contra un colaborador externo
//! (crear org, crear grupo, crear canal...). Este módulo define:
//! - `StepDefinition`: interfaz neutral usada por el engine.
//! - `StepRunResult`: éxito con `StepOutput` o fallo con `StepError`.
//! - `StepStatus`: estado reconstruido a partir de eventos.

pub mod definition;
mod run_result;
mod status;

pub use definition::{StepDefinition, StepKind};
pub use run_result::StepRunResult;
pub use status::StepStatus;
