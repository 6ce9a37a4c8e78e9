//! Operation categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical operation types whose durations are aggregated separately.
///
/// The category tag is embedded as the leading `:`-separated segment of
/// every operation id the mark builders produce, and resolved back
/// structurally with [`Category::of`] when measures are captured. A business
/// identifier that happens to contain a tag as a substring can therefore
/// never misclassify a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// End-to-end handling of one trigger event
    TriggerEvent,
    /// Notification job fan-out for one transaction
    CreateNotificationJobs,
    /// Digest filter step evaluation
    DigestFilterSteps,
}

impl Category {
    /// Every category, in reporting order.
    pub const ALL: [Category; 3] = [
        Category::TriggerEvent,
        Category::CreateNotificationJobs,
        Category::DigestFilterSteps,
    ];

    /// The tag embedded as the leading segment of operation ids.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::TriggerEvent => "triggerEvent",
            Category::CreateNotificationJobs => "createNotificationJobs",
            Category::DigestFilterSteps => "digestFilterSteps",
        }
    }

    /// Look up a category by its exact tag.
    pub fn from_tag(tag: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.tag() == tag)
    }

    /// Resolve the category a measure name belongs to from its leading
    /// `:`-separated segment.
    pub fn of(name: &str) -> Option<Category> {
        Category::from_tag(name.split(':').next().unwrap_or_default())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
