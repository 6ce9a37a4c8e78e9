//! Deterministic operation identifiers.
//!
//! An operation id is the category tag followed by alternating business
//! identifier labels and values, all joined with `:`. Phase labels prefix an
//! id with the lifecycle phase so the start and end of one operation pair up
//! on the timeline.

use std::fmt;

/// Lifecycle phase of a timeline mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The operation began
    Start,
    /// The operation completed
    End,
}

impl Phase {
    /// The tag prefixed onto phase labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::End => "end",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the id for one logical operation instance.
///
/// Pure and deterministic. Blank labels or values are accepted and produce
/// degenerate but syntactically valid ids; identifier hygiene is the
/// caller's responsibility. Two concurrently open operations must differ in
/// at least one identifier pair, or their phase marks will pair incorrectly.
pub fn operation_id(tag: &str, parts: &[(&str, &str)]) -> String {
    let mut id = String::from(tag);
    for (label, value) in parts {
        id.push(':');
        id.push_str(label);
        id.push(':');
        id.push_str(value);
    }
    id
}

/// Build the phase-qualified timeline label for an operation id.
pub fn phase_label(phase: Phase, id: &str) -> String {
    format!("{}:{}", phase.as_str(), id)
}
