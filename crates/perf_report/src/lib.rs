//! Operation Performance Reporting
//!
//! This crate brackets named operations with start/end marks on an owned
//! performance timeline, aggregates the completed durations by operation
//! category, and periodically publishes a snapshot of all statistics to a
//! logging sink:
//!
//! - Deterministic operation identifiers composed from a category tag and
//!   the business identifiers distinguishing one operation instance
//! - A window store capturing every mark and measure the timeline delivers,
//!   drained explicitly so a publish never races entry delivery
//! - Per-category average durations over the collection window
//! - Event loop delay distribution and utilization ratio from the
//!   `loop_probe` monitors
//! - A publish/reset cycle that drops all window state and restarts the
//!   monitors, bounding what an abandoned operation can leak
//!
//! # Example
//!
//! ```rust
//! use perf_report::{build_event_mark, MemorySink, PerfReporter, ReporterConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), perf_report::ReportError> {
//! let sink = Arc::new(MemorySink::new());
//! let mut reporter = PerfReporter::new(ReporterConfig::default(), sink.clone())?;
//!
//! let mark = build_event_mark("template-1", "event-1");
//! reporter.set_start(&mark);
//! tokio::time::sleep(std::time::Duration::from_millis(25)).await;
//! reporter.set_end(&mark)?;
//!
//! let report = reporter.publish_results()?;
//! assert_eq!(report.measures.len(), 1);
//! assert!(sink.contains("triggerEvent | Average:"));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`ids`] - deterministic operation and phase identifiers
//! - [`category`] - the fixed operation category set
//! - [`mark`] - mark values and the per-call-site builder helpers
//! - [`store`] - window store and timeline observer
//! - [`sink`] - logging sink abstraction
//! - [`config`] - reporter configuration
//! - [`reporter`] - the aggregating reporter and published report types
//! - [`error`] - error types

mod category;
mod config;
mod error;
mod ids;
mod mark;
mod reporter;
mod sink;
mod store;

pub use category::Category;
pub use config::ReporterConfig;
pub use error::{ReportError, ReportResult};
pub use ids::{operation_id, phase_label, Phase};
pub use mark::{build_digest_steps_mark, build_event_mark, build_notification_mark, Mark};
pub use reporter::{CategorySummary, DelaySummary, PerfReport, PerfReporter};
pub use sink::{LogSink, MemorySink, TracingSink};
pub use store::{MeasureRecord, TimelineObserver, WindowStore};

/// Re-exports of the collaborator types surfaced through the public API.
pub use loop_probe::{DelaySnapshot, UtilizationSnapshot};
pub use timeline::{Entry, EntryKind};
