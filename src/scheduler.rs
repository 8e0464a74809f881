use crate::models::DocumentId;
use std::time::{Duration, Instant};

/// Delay between a successful upload and the processing trigger for that
/// document. The service gives no completion signal, so the client waits a
/// fixed interval before asking it to process.
pub const PROCESS_START_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledProcess {
    pub document_id: DocumentId,
    pub due_at: Instant,
}

/// Owns the deferred processing triggers, one entry per successful upload.
/// The document id is stored in the entry itself rather than captured by a
/// closure, and `poll_due` removes entries as it hands them back, so each
/// fires at most once.
///
/// The current instant is always passed in by the caller. The runtime passes
/// `Instant::now()` from its tick; tests pass fabricated instants.
#[derive(Debug, Default)]
pub struct ProcessScheduler {
    pending: Vec<ScheduledProcess>,
}

impl ProcessScheduler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, document_id: DocumentId, now: Instant) {
        self.pending.push(ScheduledProcess {
            document_id,
            due_at: now + PROCESS_START_DELAY,
        });
    }

    /// Removes and returns every entry whose deadline has passed, in the
    /// order they were scheduled.
    pub fn poll_due(&mut self, now: Instant) -> Vec<DocumentId> {
        let mut due = Vec::new();
        self.pending.retain(|entry| {
            if entry.due_at <= now {
                due.push(entry.document_id);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn cancel(&mut self, document_id: DocumentId) {
        self.pending.retain(|entry| entry.document_id != document_id);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, document_id: DocumentId) -> bool {
        self.pending.iter().any(|e| e.document_id == document_id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
