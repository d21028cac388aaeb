//! Step Executor: ejecuta un step con aviso previo/posterior y captura
//! uniforme de errores.
//!
//! Garantía: exactamente un aviso por resultado del step (éxito o fallo),
//! más un aviso inicial si el step es `StepKind::Announced`. Los fallos de
//! entrega del notificador se registran y se devuelven al llamador dentro de
//! `StepExecution`, nunca como error del step.
use crate::errors::StepError;
use crate::model::{ExecutionContext, StepOutput};
use crate::notify::{Notice, Notifier, NotifyError};
use crate::step::{StepDefinition, StepKind};

/// Notificador + canal al que van los avisos de un run.
#[derive(Clone, Copy)]
pub struct NotifyTarget<'a> {
    pub notifier: &'a dyn Notifier,
    pub channel: &'a str,
}

impl<'a> NotifyTarget<'a> {
    pub fn new(notifier: &'a dyn Notifier, channel: &'a str) -> Self {
        Self { notifier, channel }
    }

    /// Envía un aviso. El error se registra en el log y se devuelve para que
    /// el llamador decida si anotarlo; nunca debe abortar un run.
    pub fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        self.notifier.notify(self.channel, notice).inspect_err(|e| {
                                                      log::warn!("notification to '{}' failed: {e}", self.channel);
                                                  })
    }
}

/// Resultado de ejecutar un step a través del executor.
#[derive(Debug)]
pub struct StepExecution {
    pub result: Result<StepOutput, StepError>,
    pub notices_sent: usize,
    pub notify_failures: Vec<NotifyError>,
}

pub struct StepExecutor<'a> {
    target: NotifyTarget<'a>,
}

impl<'a> StepExecutor<'a> {
    pub fn new(target: NotifyTarget<'a>) -> Self {
        Self { target }
    }

    pub fn execute(&self, step: &dyn StepDefinition, ctx: &ExecutionContext) -> StepExecution {
        let mut exec = StepExecution { result: Err(StepError::new(step.id(), "step did not run")),
                                       notices_sent: 0,
                                       notify_failures: Vec::new() };

        if step.kind() == StepKind::Announced {
            self.deliver(&mut exec, Notice::in_progress(step.start_message(ctx)));
        }

        log::debug!("running step '{}' (run {})", step.id(), ctx.run.run_id);
        let result = step.run(ctx).into_result();

        let notice = match &result {
            Ok(output) => Notice::success(step.success_message(output, ctx)),
            Err(error) => {
                log::error!("step '{}' failed: {error}", step.id());
                Notice::failure(step.failure_message(error, ctx))
            }
        };
        self.deliver(&mut exec, notice);

        exec.result = result;
        exec
    }

    fn deliver(&self, exec: &mut StepExecution, notice: Notice) {
        match self.target.send(&notice) {
            Ok(()) => exec.notices_sent += 1,
            Err(e) => exec.notify_failures.push(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RunContext, RunOutputs};
    use crate::notify::Severity;
    use crate::step::StepRunResult;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, Notice)>>,
        fail: bool,
    }

    impl Notifier for Recorder {
        fn notify(&self, channel: &str, notice: &Notice) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Transport("chat down".into()));
            }
            self.sent.lock().unwrap().push((channel.to_string(), notice.clone()));
            Ok(())
        }
    }

    struct Fixed {
        kind: StepKind,
        ok: bool,
    }

    impl StepDefinition for Fixed {
        fn id(&self) -> &str {
            "create_group"
        }
        fn kind(&self) -> StepKind {
            self.kind
        }
        fn run(&self, _ctx: &ExecutionContext) -> StepRunResult {
            if self.ok {
                StepRunResult::Success { output: StepOutput::new().with("gid", "g-1") }
            } else {
                StepRunResult::Failure { error: StepError::new("create_group", "Error creating group acme").with_cause("HTTP 500") }
            }
        }
        fn start_message(&self, _ctx: &ExecutionContext) -> String {
            "Creating group acme".into()
        }
        fn success_message(&self, output: &StepOutput, _ctx: &ExecutionContext) -> String {
            format!("Group created with ID: {}", output.get_str("gid").unwrap_or_default())
        }
    }

    fn run_with(step: &Fixed, notifier: &Recorder) -> StepExecution {
        let run = RunContext::new("test");
        let outputs = RunOutputs::new();
        let ctx = ExecutionContext::new(&run, &outputs);
        StepExecutor::new(NotifyTarget::new(notifier, "#ops")).execute(step, &ctx)
    }

    #[test]
    fn announced_step_sends_start_and_success() {
        let rec = Recorder::default();
        let exec = run_with(&Fixed { kind: StepKind::Announced, ok: true }, &rec);
        assert!(exec.result.is_ok());
        let sent = rec.sent.lock().unwrap();
        let severities: Vec<Severity> = sent.iter().map(|(_, n)| n.severity).collect();
        assert_eq!(severities, vec![Severity::InProgress, Severity::Success]);
        assert_eq!(sent[1].1.text, "Group created with ID: g-1");
        assert_eq!(sent[0].0, "#ops");
    }

    #[test]
    fn quiet_failure_sends_exactly_one_failure_notice_and_propagates() {
        let rec = Recorder::default();
        let exec = run_with(&Fixed { kind: StepKind::Quiet, ok: false }, &rec);
        let err = exec.result.unwrap_err();
        assert_eq!(err.step, "create_group");
        let sent = rec.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.to_string(), ":x: Error creating group acme: HTTP 500");
    }

    #[test]
    fn notifier_failure_does_not_change_step_outcome() {
        let rec = Recorder { fail: true, ..Default::default() };
        let exec = run_with(&Fixed { kind: StepKind::Announced, ok: true }, &rec);
        assert!(exec.result.is_ok());
        assert_eq!(exec.notices_sent, 0);
        assert_eq!(exec.notify_failures.len(), 2);
    }
}
