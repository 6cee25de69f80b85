use crate::events::Event;

/// Whether a batch currently owns the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A titled message surfaced to the user, shown as a dialog by a GUI frontend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

/// Consumer-side view of the current (or last) batch.
///
/// This is built by folding drained [`Event`]s and is wrapped by
/// [`crate::state::StateManager`], which the orchestrator owns. Never mutate it from the worker.
#[derive(Debug, Clone, Default)]
pub struct BatchState {
    pub run_state: RunState,

    // Progress
    pub total_files: usize,
    pub progress: usize,
    pub status: String,

    // Results
    pub error_count: usize,
    pub notices: Vec<Notice>,
}

impl BatchState {
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Reset per-run tracking and mark the batch as running.
    pub fn begin(&mut self) {
        self.run_state = RunState::Running;
        self.total_files = 0;
        self.progress = 0;
        self.status = "Preparing…".to_string();
        self.error_count = 0;
        self.notices.clear();
    }

    /// Fold one drained event into the view.
    ///
    /// `Done` is the only event that changes [`RunState`].
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::SetMax { total } => {
                self.total_files = *total;
                self.progress = 0;
            }
            Event::Progress { index } => {
                self.progress = *index;
            }
            Event::Status { message } => {
                self.status = message.clone();
            }
            Event::Info { title, message } => {
                self.push_notice(Severity::Info, title, message);
            }
            Event::Warning { title, message } => {
                self.push_notice(Severity::Warning, title, message);
            }
            Event::Error { title, message } => {
                self.error_count += 1;
                self.push_notice(Severity::Error, title, message);
            }
            Event::Done => {
                self.run_state = RunState::Idle;
            }
        }
    }

    /// Fraction of files attempted, in `0.0..=1.0`
    pub fn fraction_complete(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.progress as f64 / self.total_files as f64
        }
    }

    fn push_notice(&mut self, severity: Severity, title: &str, message: &str) {
        self.notices.push(Notice {
            severity,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}
