use crate::{errors::StepError, model::StepOutput};

/// Resultado abstracto de ejecutar un step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepRunResult {
    Success { output: StepOutput },
    Failure { error: StepError },
}

impl StepRunResult {
    pub fn into_result(self) -> Result<StepOutput, StepError> {
        match self {
            StepRunResult::Success { output } => Ok(output),
            StepRunResult::Failure { error } => Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepRunResult::Success { .. })
    }
}

impl From<Result<StepOutput, StepError>> for StepRunResult {
    fn from(res: Result<StepOutput, StepError>) -> Self {
        match res {
            Ok(output) => StepRunResult::Success { output },
            Err(error) => StepRunResult::Failure { error },
        }
    }
}
