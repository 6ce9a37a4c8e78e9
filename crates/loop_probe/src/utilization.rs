//! Scheduler utilization accounting.
//!
//! An accounting task ticks at a fixed resolution and splits every
//! inter-tick gap into the scheduled sleep portion (idle) and the oversleep
//! beyond it (active - time the scheduler spent running other work). Both
//! totals accumulate monotonically; callers diff cumulative snapshots
//! against a baseline to read utilization over an interval.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{ProbeError, ProbeResult};

/// Default accounting resolution.
pub const DEFAULT_RESOLUTION: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
struct Counters {
    idle: Duration,
    active: Duration,
}

/// Idle/active split and utilization ratio over an interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationSnapshot {
    /// Idle time in milliseconds
    pub idle_ms: f64,
    /// Active time in milliseconds
    pub active_ms: f64,
    /// `active / (active + idle)`; zero over an empty interval
    pub utilization: f64,
}

impl UtilizationSnapshot {
    /// Build a snapshot from idle/active totals.
    pub fn from_totals(idle_ms: f64, active_ms: f64) -> Self {
        let total = idle_ms + active_ms;
        let utilization = if total > 0.0 { active_ms / total } else { 0.0 };
        Self {
            idle_ms,
            active_ms,
            utilization,
        }
    }

    /// The interval between an earlier cumulative snapshot and this one.
    pub fn since(&self, baseline: &UtilizationSnapshot) -> Self {
        Self::from_totals(
            (self.idle_ms - baseline.idle_ms).max(0.0),
            (self.active_ms - baseline.active_ms).max(0.0),
        )
    }
}

/// Cumulative idle/active accounting for the scheduler.
///
/// The probe runs for the lifetime of its owner; callers own when baselines
/// are captured and replaced.
pub struct UtilizationProbe {
    counters: Arc<Mutex<Counters>>,
    task: Option<JoinHandle<()>>,
}

impl UtilizationProbe {
    /// Start accounting at the given resolution.
    ///
    /// Fails with [`ProbeError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn start(resolution: Duration) -> ProbeResult<Self> {
        let handle = Handle::try_current().map_err(|_| ProbeError::NoRuntime)?;
        let counters = Arc::new(Mutex::new(Counters::default()));
        let shared = Arc::clone(&counters);

        let task = handle.spawn(async move {
            let mut ticker = tokio::time::interval(resolution);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            let mut last = Instant::now();
            loop {
                ticker.tick().await;
                let now = Instant::now();
                let elapsed = now.duration_since(last);
                let active = elapsed.saturating_sub(resolution);
                let idle = elapsed - active;
                if let Ok(mut counters) = shared.lock() {
                    counters.idle += idle;
                    counters.active += active;
                }
                last = now;
            }
        });

        Ok(Self {
            counters,
            task: Some(task),
        })
    }

    /// Check whether the accounting task is running.
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Idle/active totals accumulated since the probe started.
    pub fn snapshot(&self) -> UtilizationSnapshot {
        let (idle, active) = match self.counters.lock() {
            Ok(counters) => (counters.idle, counters.active),
            Err(poisoned) => {
                let counters = poisoned.into_inner();
                (counters.idle, counters.active)
            }
        };
        UtilizationSnapshot::from_totals(
            idle.as_secs_f64() * 1000.0,
            active.as_secs_f64() * 1000.0,
        )
    }

    /// Idle/active totals since `baseline` was captured.
    pub fn snapshot_since(&self, baseline: &UtilizationSnapshot) -> UtilizationSnapshot {
        self.snapshot().since(baseline)
    }

    /// Stop the accounting task. Counters stay readable.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for UtilizationProbe {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_totals() {
        let snapshot = UtilizationSnapshot::from_totals(75.0, 25.0);
        assert_eq!(snapshot.idle_ms, 75.0);
        assert_eq!(snapshot.active_ms, 25.0);
        assert!((snapshot.utilization - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_empty_interval() {
        let snapshot = UtilizationSnapshot::from_totals(0.0, 0.0);
        assert_eq!(snapshot.utilization, 0.0);
    }

    #[test]
    fn test_snapshot_since_baseline() {
        let baseline = UtilizationSnapshot::from_totals(100.0, 20.0);
        let current = UtilizationSnapshot::from_totals(160.0, 60.0);

        let diff = current.since(&baseline);
        assert!((diff.idle_ms - 60.0).abs() < 1e-9);
        assert!((diff.active_ms - 40.0).abs() < 1e-9);
        assert!((diff.utilization - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_since_clamps_negative() {
        let baseline = UtilizationSnapshot::from_totals(100.0, 50.0);
        let stale = UtilizationSnapshot::from_totals(80.0, 40.0);

        let diff = stale.since(&baseline);
        assert_eq!(diff.idle_ms, 0.0);
        assert_eq!(diff.active_ms, 0.0);
        assert_eq!(diff.utilization, 0.0);
    }

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let snapshot = UtilizationSnapshot::from_totals(90.0, 10.0);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("idleMs"));

        let parsed: UtilizationSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_start_outside_runtime() {
        assert!(matches!(
            UtilizationProbe::start(DEFAULT_RESOLUTION),
            Err(ProbeError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_probe_accumulates() {
        let mut probe = UtilizationProbe::start(Duration::from_millis(10)).unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        let snapshot = probe.snapshot();

        assert!(
            snapshot.idle_ms > 0.0,
            "idle time should accumulate, got {}",
            snapshot.idle_ms
        );
        assert!((0.0..=1.0).contains(&snapshot.utilization));

        probe.stop();
        assert!(!probe.is_running());
    }

    #[tokio::test]
    async fn test_probe_baseline_diff() {
        let probe = UtilizationProbe::start(Duration::from_millis(10)).unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        let baseline = probe.snapshot();

        tokio::time::sleep(Duration::from_millis(40)).await;
        let diff = probe.snapshot_since(&baseline);

        let total = diff.idle_ms + diff.active_ms;
        assert!(
            total > 0.0 && total < 200.0,
            "diff should cover roughly the second interval, got {}",
            total
        );
        assert!((0.0..=1.0).contains(&diff.utilization));
    }
}
