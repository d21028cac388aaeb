//! ops-core: motor secuencial de playbooks de aprovisionamiento.
//!
//! Un playbook es una lista ordenada de steps dependientes. El `FlowEngine`
//! los ejecuta uno tras otro, notifica el progreso tras cada step y se
//! detiene en el primer fallo (stop-on-failure, sin rollback).
//!
//! Este crate no hace IO: los colaboradores externos (API de organizaciones,
//! chat, secretos) entran a través de traits implementados en
//! `ops-adapters`.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod identity;
pub mod model;
pub mod notify;
pub mod repo;
pub mod step;

pub use engine::{DefinitionBuilder, FlowEngine, NotifyTarget, StepExecution, StepExecutor};
pub use errors::{CoreEngineError, StepError};
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use identity::{aggregate_lookup_error, IdentityLookup, IdentityLookupBatch, IdentityResolver, LookupError, LookupOutcome};
pub use model::{ExecutionContext, RunContext, RunOutputs, SecretValue, StepOutput};
pub use notify::{LogNotifier, Notice, Notifier, NotifyError, Severity};
pub use repo::{FlowDefinition, RunInstance, RunStatus};
pub use step::{StepDefinition, StepKind, StepRunResult, StepStatus};
