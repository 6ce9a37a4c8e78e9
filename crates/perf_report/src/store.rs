//! Window store and timeline observer.
//!
//! The store passively accumulates every mark and measure delivered by the
//! owned timeline into two append-only sequences scoped to the current
//! collection window. The observer holds the subscription receiver and
//! drains pending entries into the store on demand; draining before reading
//! is what keeps a publish issued right after an operation completes from
//! missing its measure.

use serde::{Deserialize, Serialize};
use timeline::{Entry, EntryKind, EntryReceiver, Timeline};

use crate::category::Category;

/// A completed duration measurement captured from the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureRecord {
    /// The originating operation id
    pub name: String,
    /// Elapsed milliseconds
    pub duration_ms: f64,
    /// Category resolved from the id's leading segment; `None` when the
    /// segment matches no known tag
    pub category: Option<Category>,
}

/// Append-only mark/measure state for one collection window.
#[derive(Debug, Default)]
pub struct WindowStore {
    mark_labels: Vec<String>,
    measures: Vec<MeasureRecord>,
}

impl WindowStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed timeline entry.
    ///
    /// Marks append the formatted label and its recorded start time, in that
    /// order, to the diagnostic label sequence. Measures append a record
    /// with the category resolved structurally from the name.
    pub fn record(&mut self, entry: &Entry) {
        match entry.kind {
            EntryKind::Mark => {
                self.mark_labels.push(format!("[{}]", entry.name));
                self.mark_labels.push(format!("{:.3}", entry.start_time_ms));
            }
            EntryKind::Measure => {
                let category = Category::of(&entry.name);
                if category.is_none() {
                    tracing::warn!(
                        target: "perf_report",
                        name = %entry.name,
                        "measure with unrecognized category tag"
                    );
                }
                self.measures.push(MeasureRecord {
                    name: entry.name.clone(),
                    duration_ms: entry.duration_ms,
                    category,
                });
            }
        }
    }

    /// The diagnostic mark-label sequence, in arrival order.
    pub fn mark_labels(&self) -> &[String] {
        &self.mark_labels
    }

    /// The captured measures, in arrival order.
    pub fn measures(&self) -> &[MeasureRecord] {
        &self.measures
    }

    /// Number of captured measures.
    pub fn measure_count(&self) -> usize {
        self.measures.len()
    }

    /// Check whether nothing was captured this window.
    pub fn is_empty(&self) -> bool {
        self.mark_labels.is_empty() && self.measures.is_empty()
    }

    /// Drop everything captured this window.
    pub fn clear(&mut self) {
        self.mark_labels.clear();
        self.measures.clear();
    }

    /// Sample count and mean duration for one category.
    ///
    /// Returns `(0, None)` when the window holds no samples for the
    /// category; the mean is never a NaN.
    pub fn category_stats(&self, category: Category) -> (usize, Option<f64>) {
        let mut count = 0usize;
        let mut total = 0.0f64;
        for measure in &self.measures {
            if measure.category == Some(category) {
                count += 1;
                total += measure.duration_ms;
            }
        }
        if count == 0 {
            (0, None)
        } else {
            (count, Some(total / count as f64))
        }
    }
}

/// Standing subscription to a timeline's mark and measure entries.
#[derive(Default)]
pub struct TimelineObserver {
    rx: Option<EntryReceiver>,
}

impl TimelineObserver {
    /// Create a detached observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)attach to the timeline.
    ///
    /// Any previous subscription is dropped, which detaches it from
    /// delivery; safe to call repeatedly and after [`detach`](Self::detach).
    pub fn attach(&mut self, timeline: &Timeline) {
        self.rx = Some(timeline.subscribe(&[EntryKind::Mark, EntryKind::Measure]));
    }

    /// Stop receiving entries until the next `attach`.
    pub fn detach(&mut self) {
        self.rx = None;
    }

    /// Check whether a subscription is held.
    pub fn is_attached(&self) -> bool {
        self.rx.is_some()
    }

    /// Drain every pending entry into the store.
    ///
    /// Returns the number of entries drained; zero when detached or when
    /// nothing is pending.
    pub fn drain_into(&mut self, store: &mut WindowStore) -> usize {
        let Some(rx) = self.rx.as_mut() else {
            return 0;
        };
        let mut drained = 0;
        while let Ok(entry) = rx.try_recv() {
            store.record(&entry);
            drained += 1;
        }
        drained
    }
}
