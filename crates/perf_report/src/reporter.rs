//! Aggregation and periodic publishing of performance statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loop_probe::{DelayMonitor, DelaySnapshot, UtilizationProbe, UtilizationSnapshot};
use timeline::{Entry, Timeline};

use crate::category::Category;
use crate::config::ReporterConfig;
use crate::error::ReportResult;
use crate::ids::{phase_label, Phase};
use crate::mark::Mark;
use crate::sink::LogSink;
use crate::store::{MeasureRecord, TimelineObserver, WindowStore};

/// Aggregated mean duration for one operation category over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The category
    pub category: Category,
    /// Number of measures captured this window
    pub count: usize,
    /// Arithmetic mean duration; `None` when the window holds no samples
    pub mean_ms: Option<f64>,
}

/// Delay histogram summary published for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelaySummary {
    /// Number of delay samples
    pub count: usize,
    /// Minimum delay in milliseconds
    pub min_ms: f64,
    /// Maximum delay in milliseconds
    pub max_ms: f64,
    /// Mean delay in milliseconds
    pub mean_ms: f64,
    /// Standard deviation in milliseconds
    pub std_dev_ms: f64,
    /// `(percentile, value_ms)` pairs in configuration order
    pub percentiles: Vec<(f64, f64)>,
}

impl DelaySummary {
    fn from_snapshot(snapshot: &DelaySnapshot, percentiles: &[f64]) -> Self {
        Self {
            count: snapshot.count,
            min_ms: snapshot.min_ms,
            max_ms: snapshot.max_ms,
            mean_ms: snapshot.mean_ms,
            std_dev_ms: snapshot.std_dev_ms,
            percentiles: percentiles
                .iter()
                .map(|&p| (p, snapshot.percentile(p)))
                .collect(),
        }
    }
}

/// Everything published for one collection window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfReport {
    /// Id of the window this report closes
    pub window_id: Uuid,
    /// When the report was captured
    pub captured_at: DateTime<Utc>,
    /// Per-category aggregates, in reporting order
    pub categories: Vec<CategorySummary>,
    /// Event loop delay statistics for the window
    pub delay: DelaySummary,
    /// Idle/active/utilization since the window baseline
    pub utilization: UtilizationSnapshot,
    /// Raw measures captured in the window
    pub measures: Vec<MeasureRecord>,
    /// Number of diagnostic mark-label entries captured
    pub mark_label_count: usize,
}

impl PerfReport {
    /// Serialize the report to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Brackets named operations on an owned timeline and periodically publishes
/// aggregate statistics to a logging sink.
///
/// Construction opens the first collection window: the observer subscribes
/// to the timeline, the delay monitor starts sampling, and the utilization
/// baseline is captured. [`publish_results`](Self::publish_results) closes
/// the window and opens the next one; a reporter therefore needs periodic
/// publishing not just for visibility but to bound the open-mark table and
/// the window store.
///
/// The timeline is scoped to this instance, so marks and measures emitted by
/// other subsystems can never contaminate the window.
pub struct PerfReporter {
    config: ReporterConfig,
    sink: Arc<dyn LogSink>,
    timeline: Timeline,
    observer: TimelineObserver,
    store: WindowStore,
    delay: DelayMonitor,
    utilization: UtilizationProbe,
    baseline: UtilizationSnapshot,
    last_utilization: UtilizationSnapshot,
    window_id: Uuid,
}

impl PerfReporter {
    /// Create a reporter and open its first collection window.
    ///
    /// Requires a running tokio runtime for the sampling tasks.
    pub fn new(config: ReporterConfig, sink: Arc<dyn LogSink>) -> ReportResult<Self> {
        let timeline = Timeline::new();
        let mut observer = TimelineObserver::new();
        observer.attach(&timeline);

        let mut delay = DelayMonitor::new(config.delay_resolution);
        delay.enable()?;

        let utilization = UtilizationProbe::start(config.utilization_resolution)?;
        let baseline = utilization.snapshot();

        Ok(Self {
            config,
            sink,
            timeline,
            observer,
            store: WindowStore::new(),
            delay,
            utilization,
            baseline,
            last_utilization: baseline,
            window_id: Uuid::new_v4(),
        })
    }

    /// Reporter with the default configuration and tracing sink.
    pub fn with_defaults() -> ReportResult<Self> {
        Self::new(
            ReporterConfig::default(),
            Arc::new(crate::sink::TracingSink),
        )
    }

    /// The active configuration.
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Id of the collection window currently open.
    pub fn window_id(&self) -> Uuid {
        self.window_id
    }

    /// Check whether the observer is attached to the timeline.
    pub fn is_tracking(&self) -> bool {
        self.observer.is_attached()
    }

    /// Utilization sampled on the most recent `set_start`/`set_end` call.
    pub fn last_utilization(&self) -> UtilizationSnapshot {
        self.last_utilization
    }

    /// Record the start-phase mark for an operation.
    ///
    /// Also samples utilization, keeping the baseline accounting on the same
    /// cadence as the measurements themselves.
    pub fn set_start(&mut self, mark: &Mark) -> Entry {
        self.last_utilization = self.utilization.snapshot();
        self.timeline.mark(&phase_label(Phase::Start, &mark.id))
    }

    /// Record the end-phase mark and request the completed measure.
    ///
    /// Fails with a missing-mark error when no start phase was recorded for
    /// this id; a measure is never fabricated from a lone end mark.
    pub fn set_end(&mut self, mark: &Mark) -> ReportResult<Entry> {
        let end_label = phase_label(Phase::End, &mark.id);
        self.timeline.mark(&end_label);
        self.last_utilization = self.utilization.snapshot();

        let entry = self.timeline.measure(
            &mark.id,
            &phase_label(Phase::Start, &mark.id),
            &end_label,
        )?;
        Ok(entry)
    }

    /// Drain pending timeline entries into the window store.
    ///
    /// [`publish_results`](Self::publish_results) flushes implicitly;
    /// callers only need this to inspect mid-window state.
    pub fn flush(&mut self) -> usize {
        self.observer.drain_into(&mut self.store)
    }

    /// Close the current collection window.
    ///
    /// Flushes pending entries, then in order: logs per-category averages,
    /// logs the delay histogram summary (disabling the monitor), logs
    /// utilization since the window baseline, and finally resets all window
    /// state and opens the next window. Returns the structured report
    /// mirroring the logged lines.
    pub fn publish_results(&mut self) -> ReportResult<PerfReport> {
        self.flush();

        let categories = self.publish_categories();
        let delay = self.publish_delay();
        let utilization = self.publish_utilization();

        let report = PerfReport {
            window_id: self.window_id,
            captured_at: Utc::now(),
            categories,
            delay,
            utilization,
            measures: self.store.measures().to_vec(),
            mark_label_count: self.store.mark_labels().len(),
        };

        self.reset()?;
        Ok(report)
    }

    /// Log the diagnostic mark-label sequence captured so far.
    pub fn publish_marks(&mut self) {
        self.flush();
        for label in self.store.mark_labels() {
            self.sink.debug(label, &self.config.context);
        }
    }

    /// Detach the observer and drop the window store and open-mark table
    /// without restarting the monitors.
    ///
    /// After a hard clear the store receives nothing until
    /// [`track`](Self::track) re-attaches the observer.
    pub fn clear(&mut self) {
        self.observer.detach();
        self.store.clear();
        self.timeline.clear_marks();
    }

    /// (Re)attach the observer so new timeline entries are captured.
    pub fn track(&mut self) {
        self.observer.attach(&self.timeline);
    }

    fn publish_categories(&self) -> Vec<CategorySummary> {
        Category::ALL
            .iter()
            .map(|&category| {
                let (count, mean_ms) = self.store.category_stats(category);
                let message = match mean_ms {
                    Some(mean) => format!(
                        "{} | Average: {:.2} ms from a total of {}",
                        category.tag(),
                        mean,
                        count
                    ),
                    None => format!("{} | No samples recorded in this window", category.tag()),
                };
                self.sink.debug(&message, &self.config.context);
                CategorySummary {
                    category,
                    count,
                    mean_ms,
                }
            })
            .collect()
    }

    fn publish_delay(&mut self) -> DelaySummary {
        self.delay.disable();
        let snapshot = self.delay.snapshot();
        let summary = DelaySummary::from_snapshot(&snapshot, &self.config.percentiles);

        let mut message = format!(
            "Event loop delay | Min: {:.2} ms Max: {:.2} ms Mean: {:.2} ms Stddev: {:.2} ms",
            summary.min_ms, summary.max_ms, summary.mean_ms, summary.std_dev_ms
        );
        for (percentile, value_ms) in &summary.percentiles {
            message.push_str(&format!(" P{}: {:.2} ms", percentile, value_ms));
        }
        self.sink.debug(&message, &self.config.context);
        summary
    }

    fn publish_utilization(&mut self) -> UtilizationSnapshot {
        let utilization = self.utilization.snapshot_since(&self.baseline);
        let message = format!(
            "Event loop utilization | Idle: {:.2} ms Active: {:.2} ms Utilization: {:.2}%",
            utilization.idle_ms,
            utilization.active_ms,
            utilization.utilization * 100.0
        );
        self.sink.debug(&message, &self.config.context);
        utilization
    }

    /// Drop window state and open the next collection window.
    fn reset(&mut self) -> ReportResult<()> {
        self.clear();
        self.delay = DelayMonitor::new(self.config.delay_resolution);
        self.delay.enable()?;
        self.baseline = self.utilization.snapshot();
        self.track();
        self.window_id = Uuid::new_v4();
        Ok(())
    }
}

impl Drop for PerfReporter {
    fn drop(&mut self) {
        self.delay.disable();
        self.utilization.stop();
    }
}
