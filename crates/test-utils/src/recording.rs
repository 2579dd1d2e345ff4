use std::sync::{Arc, Mutex};

use sysexec::report::{Diagnostic, Reporter, SharedReporter};
use sysexec::sync::WorkerPhase;

/// A reporter that keeps every diagnostic it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to hand to a component; records into `self`.
    pub fn shared(&self) -> SharedReporter {
        Arc::new(self.clone())
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().unwrap().clone()
    }

    /// Phases reported for one worker, in order.
    pub fn worker_phases(&self, worker: u64) -> Vec<WorkerPhase> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Diagnostic::WorkerPhase { worker: w, phase } if w == worker => Some(phase),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        self.events.lock().unwrap().push(diagnostic);
    }
}
