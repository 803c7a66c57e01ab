//! Batch Progress Registry
//!
//! Process-wide registry of named progress records, one per active batch
//! job, observable through a push-based broadcast subscription that emits
//! the full current record sequence on every mutation.
//!
//! Mutation is single-writer (the orchestrator's own sequential flow);
//! fan-out to readers is read-only broadcast. Records must not outlive
//! their batch job, which [`ProgressGuard`] enforces on every exit path.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::broadcast;

/// Live state of one batch job, keyed by job name
/// ("documentation", "instructions", "faqs").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressRecord {
    pub key: String,
    pub is_visible: bool,
    pub total_items: usize,
    pub completed_items: usize,
    pub is_waiting_for_retry: bool,
    pub retry_countdown_seconds: Option<u64>,
    pub status_text: String,
}

impl ProgressRecord {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            is_visible: false,
            total_items: 0,
            completed_items: 0,
            is_waiting_for_retry: false,
            retry_countdown_seconds: None,
            status_text: String::new(),
        }
    }
}

/// Partial update merged into a record. Unset fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub is_visible: Option<bool>,
    pub total_items: Option<usize>,
    pub completed_items: Option<usize>,
    pub is_waiting_for_retry: Option<bool>,
    pub retry_countdown_seconds: Option<Option<u64>>,
    pub status_text: Option<String>,
}

impl ProgressUpdate {
    pub fn visible(mut self, visible: bool) -> Self {
        self.is_visible = Some(visible);
        self
    }

    pub fn total(mut self, total: usize) -> Self {
        self.total_items = Some(total);
        self
    }

    pub fn completed(mut self, completed: usize) -> Self {
        self.completed_items = Some(completed);
        self
    }

    pub fn waiting(mut self, waiting: bool) -> Self {
        self.is_waiting_for_retry = Some(waiting);
        self
    }

    pub fn countdown(mut self, seconds: Option<u64>) -> Self {
        self.retry_countdown_seconds = Some(seconds);
        self
    }

    pub fn status(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    fn apply(self, record: &mut ProgressRecord) {
        if let Some(visible) = self.is_visible {
            record.is_visible = visible;
        }
        if let Some(total) = self.total_items {
            record.total_items = total;
        }
        if let Some(completed) = self.completed_items {
            record.completed_items = completed;
        }
        if let Some(waiting) = self.is_waiting_for_retry {
            record.is_waiting_for_retry = waiting;
        }
        if let Some(countdown) = self.retry_countdown_seconds {
            record.retry_countdown_seconds = countdown;
        }
        if let Some(status) = self.status_text {
            record.status_text = status;
        }
    }
}

/// Registry of progress records with snapshot broadcast.
pub struct ProgressTracker {
    /// Insertion-ordered; emitted sequence order equals creation order.
    records: RwLock<Vec<ProgressRecord>>,
    sender: broadcast::Sender<Vec<ProgressRecord>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            records: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Subscribe to full-snapshot emissions.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<ProgressRecord>> {
        self.sender.subscribe()
    }

    /// Current records in creation order.
    pub fn snapshot(&self) -> Vec<ProgressRecord> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Create-or-merge the record for `key` and broadcast the new snapshot.
    pub fn set(&self, key: &str, update: ProgressUpdate) {
        {
            let mut records = self
                .records
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match records.iter_mut().find(|r| r.key == key) {
                Some(record) => update.apply(record),
                None => {
                    let mut record = ProgressRecord::new(key);
                    update.apply(&mut record);
                    records.push(record);
                }
            }
        }
        self.emit();
    }

    /// Delete the record for `key` and broadcast the new snapshot.
    pub fn remove(&self, key: &str) {
        {
            let mut records = self
                .records
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            records.retain(|r| r.key != key);
        }
        self.emit();
    }

    /// Broadcast the current snapshot.
    /// Silently discards if no receivers are listening (no UI attached).
    fn emit(&self) {
        let _ = self.sender.send(self.snapshot());
    }
}

/// Shared progress tracker handle.
pub type SharedTracker = Arc<ProgressTracker>;

/// Removes its record when dropped, so the record cannot outlive the batch
/// on any exit path (success, per-item error, or whole-batch error).
pub struct ProgressGuard {
    tracker: SharedTracker,
    key: String,
}

impl ProgressGuard {
    pub fn new(tracker: SharedTracker, key: &str) -> Self {
        Self {
            tracker,
            key: key.to_string(),
        }
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.tracker.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_creates_then_merges() {
        let tracker = ProgressTracker::new();
        tracker.set("x", ProgressUpdate::default().visible(true).total(5));
        tracker.set("x", ProgressUpdate::default().completed(5));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 1);
        let record = &snapshot[0];
        assert_eq!(record.key, "x");
        assert!(record.is_visible);
        assert_eq!(record.total_items, 5);
        assert_eq!(record.completed_items, 5);
    }

    #[test]
    fn test_remove_deletes_record() {
        let tracker = ProgressTracker::new();
        tracker.set("x", ProgressUpdate::default().total(5));
        tracker.remove("x");
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_order_is_creation_order() {
        let tracker = ProgressTracker::new();
        tracker.set("documentation", ProgressUpdate::default().visible(true));
        tracker.set("instructions", ProgressUpdate::default().visible(true));
        tracker.set("documentation", ProgressUpdate::default().completed(1));

        let keys: Vec<String> = tracker.snapshot().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["documentation", "instructions"]);
    }

    #[tokio::test]
    async fn test_subscription_emits_on_every_mutation() {
        let tracker = ProgressTracker::new();
        let mut rx = tracker.subscribe();

        tracker.set("x", ProgressUpdate::default().total(2));
        tracker.set("x", ProgressUpdate::default().completed(1));
        tracker.remove("x");

        let first = rx.recv().await.unwrap();
        assert_eq!(first[0].total_items, 2);
        let second = rx.recv().await.unwrap();
        assert_eq!(second[0].completed_items, 1);
        let third = rx.recv().await.unwrap();
        assert!(third.is_empty());
    }

    #[test]
    fn test_guard_removes_on_drop() {
        let tracker: SharedTracker = Arc::new(ProgressTracker::new());
        {
            let _guard = ProgressGuard::new(tracker.clone(), "job");
            tracker.set("job", ProgressUpdate::default().visible(true));
            assert_eq!(tracker.snapshot().len(), 1);
        }
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_countdown_can_be_cleared() {
        let tracker = ProgressTracker::new();
        tracker.set(
            "x",
            ProgressUpdate::default().waiting(true).countdown(Some(42)),
        );
        assert_eq!(tracker.snapshot()[0].retry_countdown_seconds, Some(42));

        tracker.set(
            "x",
            ProgressUpdate::default().waiting(false).countdown(None),
        );
        let record = &tracker.snapshot()[0];
        assert!(!record.is_waiting_for_retry);
        assert_eq!(record.retry_countdown_seconds, None);
    }
}
