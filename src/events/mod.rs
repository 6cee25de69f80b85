// Event channel between the batch worker and whatever presents its progress
//
// The worker pushes through an EventSender; a single consumer drains an EventReceiver at its own
// cadence. The queue is unbounded, FIFO and never blocks the producer.

use serde::Serialize;
use tokio::sync::mpsc;

/// Lifecycle events emitted while a batch (or a dependency check) runs
///
/// Within one batch run, a single [`Event::SetMax`] precedes every [`Event::Progress`], and
/// [`Event::Done`] is always the last event of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Number of files the batch will attempt
    SetMax { total: usize },

    /// 1-based index of the file that was just attempted
    Progress { index: usize },

    Status { message: String },

    Info { title: String, message: String },

    Warning { title: String, message: String },

    Error { title: String, message: String },

    /// The run is over; the consumer may start another batch
    Done,
}

impl Event {
    pub fn is_done(&self) -> bool {
        matches!(self, Event::Done)
    }
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Producer half of the event channel; cheap to clone across worker threads
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventSender {
    /// Push an event. Never blocks; events sent after the receiver is gone are dropped.
    pub fn send(&self, event: Event) {
        if let Err(mpsc::error::SendError(event)) = self.tx.send(event) {
            tracing::trace!("Event receiver dropped, discarding {:?}", event);
        }
    }

    pub fn set_max(&self, total: usize) {
        self.send(Event::SetMax { total });
    }

    pub fn progress(&self, index: usize) {
        self.send(Event::Progress { index });
    }

    pub fn status(&self, message: impl Into<String>) {
        self.send(Event::Status {
            message: message.into(),
        });
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send(Event::Info {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn warning(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send(Event::Warning {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send(Event::Error {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn done(&self) {
        self.send(Event::Done);
    }

    /// Returns a guard that emits [`Event::Done`] when dropped, including during unwinding.
    pub fn done_on_drop(&self) -> DoneGuard {
        DoneGuard {
            sender: self.clone(),
        }
    }
}

/// Emits exactly one [`Event::Done`] when it goes out of scope
#[must_use = "Done is sent when the guard is dropped"]
#[derive(Debug)]
pub struct DoneGuard {
    sender: EventSender,
}

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.sender.done();
    }
}

/// Consumer half of the event channel
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReceiver {
    /// Take the next queued event without waiting.
    ///
    /// Returns `None` when the queue is currently empty (or every sender is gone).
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event. Returns `None` once every sender has been dropped and the
    /// queue is drained.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
