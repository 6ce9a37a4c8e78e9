//! Logging sink abstraction.
//!
//! Published statistics lines go to a sink. Sinks are fire-and-forget:
//! `debug` returns nothing and implementations must not panic, so a failing
//! sink cannot abort a publish cycle.

use std::sync::Mutex;

/// Destination for published statistics lines.
pub trait LogSink: Send + Sync {
    /// Write one line under a context label.
    fn debug(&self, message: &str, context: &str);
}

/// Default sink forwarding to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn debug(&self, message: &str, context: &str) {
        tracing::debug!(target: "perf_report", context = context, "{message}");
    }
}

/// Sink capturing lines in memory, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, formatted `[<context>] <message>`.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Check whether any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Drop all captured lines.
    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn debug(&self, message: &str, context: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("[{context}] {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures() {
        let sink = MemorySink::new();
        sink.debug("first line", "ctx");
        sink.debug("second line", "ctx");

        assert_eq!(sink.lines().len(), 2);
        assert_eq!(sink.lines()[0], "[ctx] first line");
        assert!(sink.contains("second"));
        assert!(!sink.contains("third"));
    }

    #[test]
    fn test_memory_sink_clear() {
        let sink = MemorySink::new();
        sink.debug("line", "ctx");
        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_tracing_sink_never_panics() {
        // No subscriber installed; the call must still be a quiet no-op.
        TracingSink.debug("message", "ctx");
    }
}
