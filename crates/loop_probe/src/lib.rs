//! Event Loop Probes
//!
//! This crate provides the two runtime responsiveness primitives consumed by
//! the performance reporting stack:
//!
//! - [`DelayMonitor`] - samples how late a fixed-resolution timer fires and
//!   exposes min/max/mean/stddev and percentile statistics over the window
//! - [`UtilizationProbe`] - accumulates idle vs active scheduler time and
//!   produces cumulative snapshots that diff against an earlier baseline
//!
//! Both probes run a background sampling task on the current tokio runtime
//! and stop it on disable/drop, so an enabled probe never outlives its
//! owner.
//!
//! # Example
//!
//! ```rust
//! use loop_probe::DelayMonitor;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), loop_probe::ProbeError> {
//! let mut monitor = DelayMonitor::new(Duration::from_millis(20));
//! monitor.enable()?;
//! tokio::time::sleep(Duration::from_millis(60)).await;
//! monitor.disable();
//!
//! let snapshot = monitor.snapshot();
//! assert!(snapshot.mean_ms >= 0.0);
//! # Ok(())
//! # }
//! ```

mod delay;
mod error;
mod utilization;

pub use delay::{DelayMonitor, DelaySnapshot};
pub use error::{ProbeError, ProbeResult};
pub use utilization::{UtilizationProbe, UtilizationSnapshot};
