//! Timeline entry types.

use serde::{Deserialize, Serialize};

/// Kind of a recorded timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A named point-in-time timestamp
    Mark,
    /// A computed duration between two marks
    Measure,
}

/// A single entry recorded on a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Entry kind
    pub kind: EntryKind,
    /// Mark label, or the measure's name
    pub name: String,
    /// Milliseconds since the timeline origin
    pub start_time_ms: f64,
    /// Elapsed milliseconds; always zero for marks
    pub duration_ms: f64,
}

impl Entry {
    /// Check whether this entry is a mark.
    pub fn is_mark(&self) -> bool {
        self.kind == EntryKind::Mark
    }

    /// Check whether this entry is a measure.
    pub fn is_measure(&self) -> bool {
        self.kind == EntryKind::Measure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_predicates() {
        let mark = Entry {
            kind: EntryKind::Mark,
            name: "start:op".to_string(),
            start_time_ms: 1.5,
            duration_ms: 0.0,
        };
        assert!(mark.is_mark());
        assert!(!mark.is_measure());

        let measure = Entry {
            kind: EntryKind::Measure,
            name: "op".to_string(),
            start_time_ms: 1.5,
            duration_ms: 10.0,
        };
        assert!(measure.is_measure());
        assert!(!measure.is_mark());
    }

    #[test]
    fn test_entry_serialization_roundtrip() {
        let entry = Entry {
            kind: EntryKind::Measure,
            name: "op:1".to_string(),
            start_time_ms: 12.25,
            duration_ms: 3.75,
        };

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: Entry = serde_json::from_str(&json).unwrap();

        assert_eq!(entry, parsed);
        assert!(json.contains("\"measure\""));
        assert!(json.contains("startTimeMs"));
    }
}
