//! Engine module: ejecutor de steps y motor secuencial.
//!
//! `StepExecutor` envuelve un step con sus notificaciones; `FlowEngine`
//! encadena executors en orden y corta en el primer fallo.

pub mod builder;
pub mod core;
pub mod executor;

pub use builder::{DefinitionBuilder, StepsBuilder};
pub use core::FlowEngine;
pub use executor::{NotifyTarget, StepExecution, StepExecutor};
