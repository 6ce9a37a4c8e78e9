//! Performance Timeline
//!
//! This crate provides the timeline primitive the instrumentation stack
//! records against:
//!
//! - Named point-in-time marks with a latest-wins open-mark table
//! - Measures computed between a start mark and an end mark
//! - Kind-filtered subscriptions delivering every new entry over a channel
//!
//! Each [`Timeline`] is an independent instance: handles are cheap to clone
//! and share one underlying clock and mark table, so unrelated subsystems
//! holding their own timelines never see each other's entries.
//!
//! # Example
//!
//! ```rust
//! use timeline::{EntryKind, Timeline};
//!
//! let timeline = Timeline::new();
//! let mut entries = timeline.subscribe(&[EntryKind::Mark, EntryKind::Measure]);
//!
//! timeline.mark("start:job:42");
//! timeline.mark("end:job:42");
//! let measure = timeline.measure("job:42", "start:job:42", "end:job:42").unwrap();
//! assert!(measure.duration_ms >= 0.0);
//!
//! // Delivery is synchronous; three entries are already waiting.
//! assert_eq!(entries.try_recv().unwrap().name, "start:job:42");
//! ```

mod entry;
mod error;
mod timeline;

pub use entry::{Entry, EntryKind};
pub use error::{TimelineError, TimelineResult};
pub use timeline::{EntryReceiver, Timeline};
