//! Modelos neutrales (StepOutput, RunOutputs, ExecutionContext, SecretValue).

pub mod context;
pub mod output;
pub mod secret;

pub use context::{ExecutionContext, RunContext};
pub use output::{RunOutputs, StepOutput};
pub use secret::SecretValue;
