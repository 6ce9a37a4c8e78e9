//! Shared timeline handle recording marks and computing measures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::sync::mpsc;

use crate::entry::{Entry, EntryKind};
use crate::error::{TimelineError, TimelineResult};

/// Receiver half of a timeline subscription.
pub type EntryReceiver = mpsc::UnboundedReceiver<Entry>;

struct Subscriber {
    kinds: Vec<EntryKind>,
    tx: mpsc::UnboundedSender<Entry>,
}

#[derive(Default)]
struct Inner {
    /// Open-mark table: label to recorded time in ms. Latest recording wins.
    marks: HashMap<String, f64>,
    subscribers: Vec<Subscriber>,
}

impl Inner {
    fn deliver(&mut self, entry: &Entry) {
        self.subscribers.retain(|sub| {
            if !sub.kinds.contains(&entry.kind) {
                return !sub.tx.is_closed();
            }
            sub.tx.send(entry.clone()).is_ok()
        });
    }
}

/// A performance timeline recording named marks and computing measures
/// between them.
///
/// Handles are cheap to clone and share one underlying timeline. Entries are
/// delivered to subscribers synchronously at recording time, in recording
/// order.
#[derive(Clone)]
pub struct Timeline {
    origin: Instant,
    inner: Arc<Mutex<Inner>>,
}

impl Timeline {
    /// Create a new, empty timeline with its origin at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    // A poisoned lock only means another thread panicked mid-update; the
    // mark table and subscriber list are still structurally sound.
    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Milliseconds elapsed since the timeline origin.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Record a named mark at the current time.
    ///
    /// Re-recording a label replaces its previous time in the open-mark
    /// table.
    pub fn mark(&self, label: &str) -> Entry {
        let entry = Entry {
            kind: EntryKind::Mark,
            name: label.to_string(),
            start_time_ms: self.now_ms(),
            duration_ms: 0.0,
        };
        let mut inner = self.lock_inner();
        inner.marks.insert(entry.name.clone(), entry.start_time_ms);
        inner.deliver(&entry);
        entry
    }

    /// Compute the measure between two recorded marks and deliver it to
    /// subscribers.
    ///
    /// Fails with [`TimelineError::MissingMark`] naming the absent label if
    /// either mark was never recorded.
    pub fn measure(&self, name: &str, start_label: &str, end_label: &str) -> TimelineResult<Entry> {
        let mut inner = self.lock_inner();
        let start = *inner
            .marks
            .get(start_label)
            .ok_or_else(|| TimelineError::MissingMark {
                label: start_label.to_string(),
            })?;
        let end = *inner
            .marks
            .get(end_label)
            .ok_or_else(|| TimelineError::MissingMark {
                label: end_label.to_string(),
            })?;

        let entry = Entry {
            kind: EntryKind::Measure,
            name: name.to_string(),
            start_time_ms: start,
            duration_ms: (end - start).max(0.0),
        };
        inner.deliver(&entry);
        Ok(entry)
    }

    /// Register a subscription for the given entry kinds.
    ///
    /// Dropping the receiver detaches the subscription; closed subscribers
    /// are pruned on the next delivery.
    pub fn subscribe(&self, kinds: &[EntryKind]) -> EntryReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_inner().subscribers.push(Subscriber {
            kinds: kinds.to_vec(),
            tx,
        });
        rx
    }

    /// Empty the open-mark table.
    ///
    /// Marks that were started but never measured accumulate here until
    /// cleared; callers running a periodic collection cycle clear the table
    /// at every window boundary.
    pub fn clear_marks(&self) {
        self.lock_inner().marks.clear();
    }

    /// Number of labels currently in the open-mark table.
    pub fn mark_count(&self) -> usize {
        self.lock_inner().marks.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock_inner().subscribers.len()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
