//! Reporter configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a reporter instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterConfig {
    /// Sink context label attached to every published line
    pub context: String,
    /// Delay monitor sampling resolution
    #[serde(with = "duration_millis")]
    pub delay_resolution: Duration,
    /// Utilization accounting resolution
    #[serde(with = "duration_millis")]
    pub utilization_resolution: Duration,
    /// Percentiles reported for the delay histogram, in `(0, 100]`
    pub percentiles: Vec<f64>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            context: "PerfReporter".to_string(),
            delay_resolution: Duration::from_millis(20),
            utilization_resolution: Duration::from_millis(10),
            percentiles: vec![50.0, 75.0, 99.0],
        }
    }
}

impl ReporterConfig {
    /// Create a config with the given sink context label.
    pub fn new(context: &str) -> Self {
        Self {
            context: context.to_string(),
            ..Default::default()
        }
    }

    /// Set the delay monitor sampling resolution.
    pub fn with_delay_resolution(mut self, resolution: Duration) -> Self {
        self.delay_resolution = resolution;
        self
    }

    /// Set the utilization accounting resolution.
    pub fn with_utilization_resolution(mut self, resolution: Duration) -> Self {
        self.utilization_resolution = resolution;
        self
    }

    /// Set the reported delay percentiles.
    pub fn with_percentiles(mut self, percentiles: Vec<f64>) -> Self {
        self.percentiles = percentiles;
        self
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ReporterConfig::default();
        assert_eq!(config.context, "PerfReporter");
        assert_eq!(config.delay_resolution, Duration::from_millis(20));
        assert_eq!(config.percentiles, vec![50.0, 75.0, 99.0]);
    }

    #[test]
    fn test_config_builder() {
        let config = ReporterConfig::new("Workers")
            .with_delay_resolution(Duration::from_millis(5))
            .with_utilization_resolution(Duration::from_millis(2))
            .with_percentiles(vec![50.0, 99.9]);

        assert_eq!(config.context, "Workers");
        assert_eq!(config.delay_resolution, Duration::from_millis(5));
        assert_eq!(config.utilization_resolution, Duration::from_millis(2));
        assert_eq!(config.percentiles, vec![50.0, 99.9]);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ReporterConfig::new("Workers")
            .with_delay_resolution(Duration::from_millis(15));

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"delayResolution\":15"));

        let parsed: ReporterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
