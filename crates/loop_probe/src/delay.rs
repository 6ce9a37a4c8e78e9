//! Event loop delay monitoring.
//!
//! A sampler task ticks at a fixed resolution and records how far each tick
//! overshot its schedule. Oversleep is time the scheduler spent running
//! other work instead of waking the timer, which makes the sample stream a
//! direct responsiveness signal.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{ProbeError, ProbeResult};

/// Default sampling resolution.
pub const DEFAULT_RESOLUTION: Duration = Duration::from_millis(20);

/// Cap on retained samples per monitoring window.
const MAX_SAMPLES: usize = 10_000;

#[derive(Debug, Default)]
struct SampleBuffer {
    delays_ms: Vec<f64>,
}

impl SampleBuffer {
    fn record(&mut self, delay_ms: f64) {
        if self.delays_ms.len() >= MAX_SAMPLES {
            self.delays_ms.remove(0);
        }
        self.delays_ms.push(delay_ms);
    }
}

/// Monitors event loop scheduling delay at a fixed resolution.
///
/// The accumulated histogram is never reset on read; construct a fresh
/// monitor to start a new window.
pub struct DelayMonitor {
    resolution: Duration,
    buffer: Arc<Mutex<SampleBuffer>>,
    sampler: Option<JoinHandle<()>>,
}

impl DelayMonitor {
    /// Create a disabled monitor sampling at `resolution`.
    pub fn new(resolution: Duration) -> Self {
        Self {
            resolution,
            buffer: Arc::new(Mutex::new(SampleBuffer::default())),
            sampler: None,
        }
    }

    /// The configured sampling resolution.
    pub fn resolution(&self) -> Duration {
        self.resolution
    }

    /// Check whether the sampler task is running.
    pub fn is_enabled(&self) -> bool {
        self.sampler.is_some()
    }

    /// Begin sampling. No-op when already enabled.
    ///
    /// Fails with [`ProbeError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn enable(&mut self) -> ProbeResult<()> {
        if self.sampler.is_some() {
            return Ok(());
        }

        let handle = Handle::try_current().map_err(|_| ProbeError::NoRuntime)?;
        let buffer = Arc::clone(&self.buffer);
        let resolution = self.resolution;

        self.sampler = Some(handle.spawn(async move {
            let mut ticker = tokio::time::interval(resolution);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; measure from there.
            ticker.tick().await;
            let mut last = Instant::now();
            loop {
                ticker.tick().await;
                let now = Instant::now();
                let oversleep = now.duration_since(last).saturating_sub(resolution);
                if let Ok(mut buffer) = buffer.lock() {
                    buffer.record(oversleep.as_secs_f64() * 1000.0);
                }
                last = now;
            }
        }));

        Ok(())
    }

    /// Stop sampling. The accumulated histogram stays readable.
    pub fn disable(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            sampler.abort();
        }
    }

    /// Read the accumulated delay statistics.
    pub fn snapshot(&self) -> DelaySnapshot {
        let samples = match self.buffer.lock() {
            Ok(buffer) => buffer.delays_ms.clone(),
            Err(poisoned) => poisoned.into_inner().delays_ms.clone(),
        };
        DelaySnapshot::from_samples(samples)
    }
}

impl Drop for DelayMonitor {
    fn drop(&mut self) {
        self.disable();
    }
}

/// Statistics over one delay monitoring window, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelaySnapshot {
    /// Number of samples
    pub count: usize,
    /// Minimum delay in milliseconds
    pub min_ms: f64,
    /// Maximum delay in milliseconds
    pub max_ms: f64,
    /// Mean delay in milliseconds
    pub mean_ms: f64,
    /// Standard deviation in milliseconds
    pub std_dev_ms: f64,
    /// Sorted samples backing the percentile lookup; not serialized
    #[serde(skip)]
    sorted_ms: Vec<f64>,
}

impl DelaySnapshot {
    /// Calculate statistics from raw delay samples.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let count = sorted.len();
        let min_ms = sorted[0];
        let max_ms = sorted[count - 1];
        let mean_ms = sorted.iter().sum::<f64>() / count as f64;
        let variance =
            sorted.iter().map(|x| (x - mean_ms).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            min_ms,
            max_ms,
            mean_ms,
            std_dev_ms: variance.sqrt(),
            sorted_ms: sorted,
        }
    }

    /// Interpolated percentile lookup for `p` in `(0, 100]`.
    ///
    /// Only available on locally captured snapshots; the backing samples are
    /// not serialized.
    pub fn percentile(&self, p: f64) -> f64 {
        debug_assert!(p > 0.0 && p <= 100.0, "percentile out of range: {p}");
        let p = p.clamp(f64::MIN_POSITIVE, 100.0);

        if self.sorted_ms.is_empty() {
            return 0.0;
        }
        if self.sorted_ms.len() == 1 {
            return self.sorted_ms[0];
        }

        let rank = (p / 100.0) * (self.sorted_ms.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let fraction = rank - lower as f64;

        if upper >= self.sorted_ms.len() {
            self.sorted_ms[self.sorted_ms.len() - 1]
        } else {
            self.sorted_ms[lower] + fraction * (self.sorted_ms[upper] - self.sorted_ms[lower])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_snapshot_from_samples() {
        let snapshot = DelaySnapshot::from_samples(vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(snapshot.count, 5);
        assert_eq!(snapshot.min_ms, 1.0);
        assert_eq!(snapshot.max_ms, 5.0);
        assert_eq!(snapshot.mean_ms, 3.0);
        assert!((snapshot.std_dev_ms - 1.4142).abs() < 0.01);
    }

    #[test]
    fn test_snapshot_empty() {
        let snapshot = DelaySnapshot::from_samples(Vec::new());

        assert_eq!(snapshot.count, 0);
        assert_eq!(snapshot.min_ms, 0.0);
        assert_eq!(snapshot.max_ms, 0.0);
        assert_eq!(snapshot.percentile(99.0), 0.0);
    }

    #[test]
    fn test_percentile_interpolation() {
        let snapshot = DelaySnapshot::from_samples(
            (1..=10).map(|n| n as f64).collect::<Vec<_>>(),
        );

        assert!((snapshot.percentile(50.0) - 5.5).abs() < 0.01);
        assert!((snapshot.percentile(90.0) - 9.1).abs() < 0.01);
        assert_eq!(snapshot.percentile(100.0), 10.0);
    }

    #[test]
    fn test_percentile_single_sample() {
        let snapshot = DelaySnapshot::from_samples(vec![7.5]);
        assert_eq!(snapshot.percentile(50.0), 7.5);
        assert_eq!(snapshot.percentile(99.0), 7.5);
    }

    #[test]
    fn test_sample_buffer_cap() {
        let mut buffer = SampleBuffer::default();
        for n in 0..(MAX_SAMPLES + 5) {
            buffer.record(n as f64);
        }

        assert_eq!(buffer.delays_ms.len(), MAX_SAMPLES);
        assert_eq!(buffer.delays_ms[0], 5.0);
    }

    #[test]
    fn test_enable_outside_runtime() {
        let mut monitor = DelayMonitor::new(DEFAULT_RESOLUTION);
        assert!(matches!(monitor.enable(), Err(ProbeError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_enable_disable_lifecycle() {
        let mut monitor = DelayMonitor::new(Duration::from_millis(10));
        assert!(!monitor.is_enabled());

        monitor.enable().unwrap();
        assert!(monitor.is_enabled());

        // Re-enabling an enabled monitor is a no-op.
        monitor.enable().unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        monitor.disable();
        assert!(!monitor.is_enabled());

        let snapshot = monitor.snapshot();
        assert!(snapshot.count >= 1, "expected samples, got {}", snapshot.count);
        assert!(snapshot.min_ms >= 0.0);

        // The histogram stays readable after disable and does not reset.
        assert_eq!(monitor.snapshot().count, snapshot.count);
    }

    #[tokio::test]
    async fn test_detects_blocked_scheduler() {
        let mut monitor = DelayMonitor::new(Duration::from_millis(10));
        monitor.enable().unwrap();

        // Let the sampler establish its cadence, then block the thread.
        tokio::time::sleep(Duration::from_millis(30)).await;
        std::thread::sleep(Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(30)).await;
        monitor.disable();

        let snapshot = monitor.snapshot();
        assert!(
            snapshot.max_ms >= 20.0,
            "blocking should register as delay, got max {}",
            snapshot.max_ms
        );
    }
}
