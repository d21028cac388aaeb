//! Ejecución secuencial, stop-on-failure y diario de eventos del engine.

use std::sync::{Arc, Mutex};

use ops_core::{DefinitionBuilder, ExecutionContext, FlowEngine, Notice, Notifier, NotifyError, NotifyTarget, RunContext,
               RunEventKind, RunStatus, StepDefinition, StepError, StepKind, StepOutput, StepRunResult, StepStatus};

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl Notifier for Recorder {
    fn notify(&self, _channel: &str, notice: &Notice) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("down".into()));
        }
        self.sent.lock().unwrap().push(notice.to_string());
        Ok(())
    }
}

/// Step que registra su ejecución y, si `fails`, devuelve error.
struct TracedStep {
    id: &'static str,
    fails: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl StepDefinition for TracedStep {
    fn id(&self) -> &str {
        self.id
    }
    fn kind(&self) -> StepKind {
        StepKind::Quiet
    }
    fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
        self.log.lock().unwrap().push(self.id.to_string());
        if self.fails {
            return StepRunResult::Failure { error: StepError::new(self.id, format!("Error in {}", self.id)).with_cause("boom") };
        }
        // cada step ve el output del anterior
        let seen = ctx.previous.and_then(|p| p.get_str("id")).unwrap_or("none").to_string();
        StepRunResult::Success { output: StepOutput::new().with("id", self.id).with("seen", seen) }
    }
    fn success_message(&self, _output: &StepOutput, _ctx: &ExecutionContext) -> String {
        format!("{} done", self.id)
    }
}

fn traced(id: &'static str, fails: bool, log: &Arc<Mutex<Vec<String>>>) -> TracedStep {
    TracedStep { id, fails, log: log.clone() }
}

#[test]
fn runs_all_steps_in_order_and_threads_outputs() {
    let log = Arc::new(Mutex::new(vec![]));
    let def = DefinitionBuilder::new("demo").first_step(traced("a", false, &log))
                                            .add_step(traced("b", false, &log))
                                            .add_step(traced("c", false, &log))
                                            .build();
    let rec = Recorder::default();
    let run = RunContext::new("demo");
    let mut engine = FlowEngine::new();

    let outputs = engine.run(&run, &def, NotifyTarget::new(&rec, "#ops")).expect("run should complete");

    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    assert_eq!(outputs.get_str("b", "seen"), Some("a"));
    assert_eq!(outputs.get_str("c", "seen"), Some("b"));
    assert_eq!(engine.event_variants(run.run_id), vec!["I", "S", "F", "S", "F", "S", "F", "C"]);
    assert_eq!(engine.instance(run.run_id, &def).status, RunStatus::Completed);
    assert_eq!(rec.sent.lock().unwrap().len(), 3);
}

#[test]
fn stops_at_first_failure_without_running_later_steps() {
    let log = Arc::new(Mutex::new(vec![]));
    let def = DefinitionBuilder::new("demo").first_step(traced("a", false, &log))
                                            .add_step(traced("b", true, &log))
                                            .add_step(traced("c", false, &log))
                                            .build();
    let rec = Recorder::default();
    let run = RunContext::new("demo");
    let mut engine = FlowEngine::new();

    let err = engine.run(&run, &def, NotifyTarget::new(&rec, "#ops")).unwrap_err();

    assert_eq!(err.step_error().map(|e| e.step.as_str()), Some("b"));
    assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    assert_eq!(*rec.sent.lock().unwrap(), vec![":white_check_mark: a done", ":x: Error in b: boom"]);

    let instance = engine.instance(run.run_id, &def);
    assert_eq!(instance.status, RunStatus::Failed);
    assert_eq!(instance.last_finished(), Some("a"));
    assert_eq!(instance.status_of("b"), Some(StepStatus::Failed));
    assert_eq!(instance.status_of("c"), Some(StepStatus::Pending));
    assert_eq!(instance.cursor, 2);

    let done = engine.outputs_for(run.run_id);
    assert_eq!(done.step_ids().collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(done.get_str("a", "id"), Some("a"));
}

#[test]
fn notification_failures_are_journaled_not_fatal() {
    let log = Arc::new(Mutex::new(vec![]));
    let def = DefinitionBuilder::new("demo").first_step(traced("a", false, &log)).build();
    let rec = Recorder { fail: true, ..Default::default() };
    let run = RunContext::new("demo");
    let mut engine = FlowEngine::new();

    assert!(engine.run(&run, &def, NotifyTarget::new(&rec, "#ops")).is_ok());
    let events = engine.events_for(run.run_id);
    assert!(events.iter()
                  .any(|e| matches!(&e.kind, RunEventKind::NotificationFailed { step_id, .. } if step_id == "a")));
    assert!(matches!(events.last().map(|e| &e.kind), Some(RunEventKind::RunCompleted { step_count: 1 })));
}

#[test]
fn initialized_event_carries_definition_hash() {
    let log = Arc::new(Mutex::new(vec![]));
    let def = DefinitionBuilder::new("demo").first_step(traced("a", false, &log)).build();
    let rec = Recorder::default();
    let run = RunContext::new("demo");
    let mut engine = FlowEngine::new();
    engine.run(&run, &def, NotifyTarget::new(&rec, "#ops")).unwrap();

    let first = engine.events_for(run.run_id).into_iter().next().expect("event");
    match first.kind {
        RunEventKind::RunInitialized { definition_hash, step_count, playbook } => {
            assert_eq!(definition_hash, def.definition_hash);
            assert_eq!(step_count, 1);
            assert_eq!(playbook, "demo");
        }
        other => panic!("unexpected first event {other:?}"),
    }
}
