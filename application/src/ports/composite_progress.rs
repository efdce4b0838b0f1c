//! Composite progress notifier that delegates to multiple notifiers.
//!
//! Used to fan out race events to independent observers, e.g. the console
//! progress bars and a log-only observer.

use super::progress::ProgressNotifier;
use arena_domain::{AgentRunResult, AgentSlot, JudgeMode, JudgeResult, ReasoningStep, TaskId};
use std::sync::Arc;

/// A progress notifier that delegates to multiple inner notifiers.
pub struct CompositeProgress {
    delegates: Vec<Arc<dyn ProgressNotifier>>,
}

impl CompositeProgress {
    pub fn new(delegates: Vec<Arc<dyn ProgressNotifier>>) -> Self {
        Self { delegates }
    }
}

/// Macro to delegate a method call to all inner notifiers.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl ProgressNotifier for CompositeProgress {
    fn on_started(&self, task_id: &TaskId, slots: &[AgentSlot]) {
        delegate!(self, on_started, task_id, slots);
    }

    fn on_reasoning_step(&self, task_id: &TaskId, agent_id: &str, step: &ReasoningStep) {
        delegate!(self, on_reasoning_step, task_id, agent_id, step);
    }

    fn on_agent_complete(&self, task_id: &TaskId, result: &AgentRunResult) {
        delegate!(self, on_agent_complete, task_id, result);
    }

    fn on_judging_started(&self, task_id: &TaskId, mode: JudgeMode, candidates: usize) {
        delegate!(self, on_judging_started, task_id, mode, candidates);
    }

    fn on_complete(&self, task_id: &TaskId, judge: Option<&JudgeResult>) {
        delegate!(self, on_complete, task_id, judge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::Persona;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ProgressNotifier for Recorder {
        fn on_started(&self, task_id: &TaskId, slots: &[AgentSlot]) {
            self.events
                .lock()
                .unwrap()
                .push(format!("started {} {}", task_id, slots.len()));
        }

        fn on_agent_complete(&self, _task_id: &TaskId, result: &AgentRunResult) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {}", result.agent_id));
        }

        fn on_complete(&self, _task_id: &TaskId, judge: Option<&JudgeResult>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete {}", judge.is_some()));
        }
    }

    #[test]
    fn test_delegates_to_every_notifier() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let composite = CompositeProgress::new(vec![a.clone(), b.clone()]);

        let task_id = TaskId::new("t-1");
        composite.on_started(&task_id, &[]);
        composite.on_agent_complete(
            &task_id,
            &AgentRunResult::failure("agent-1", Persona::Lateral, "boom"),
        );
        composite.on_complete(&task_id, None);

        let expected = vec!["started t-1 0", "done agent-1", "complete false"];
        assert_eq!(*a.events.lock().unwrap(), expected);
        assert_eq!(*b.events.lock().unwrap(), expected);
    }
}
