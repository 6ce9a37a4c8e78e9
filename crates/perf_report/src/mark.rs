//! Mark construction.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::ids::operation_id;

/// Identifies one logical operation instance awaiting completion.
///
/// Marks are transient values handed to the reporter's `set_start` and
/// `set_end`; the facility never retains them. Two concurrently open
/// operations must carry distinct ids, which the builder helpers guarantee
/// as long as the distinguishing business identifiers differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    /// Unique id for this operation instance
    pub id: String,
    /// Category the completed measure will be aggregated under
    pub category: Category,
}

impl Mark {
    /// Compose a mark from a category and ordered business identifier pairs.
    pub fn compose(category: Category, parts: &[(&str, &str)]) -> Self {
        Self {
            id: operation_id(category.tag(), parts),
            category,
        }
    }
}

/// Mark for the end-to-end handling of one trigger event.
pub fn build_event_mark(template_id: &str, event_id: &str) -> Mark {
    Mark::compose(
        Category::TriggerEvent,
        &[("notificationTemplate", template_id), ("event", event_id)],
    )
}

/// Mark for the notification job fan-out of one transaction.
pub fn build_notification_mark(transaction_id: &str, subscriber_id: &str) -> Mark {
    Mark::compose(
        Category::CreateNotificationJobs,
        &[("transaction", transaction_id), ("subscriber", subscriber_id)],
    )
}

/// Mark for the digest filter steps of one transaction.
pub fn build_digest_steps_mark(transaction_id: &str, subscriber_id: &str) -> Mark {
    Mark::compose(
        Category::DigestFilterSteps,
        &[("transaction", transaction_id), ("subscriber", subscriber_id)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mark_id() {
        let mark = build_event_mark("T1", "E1");
        assert_eq!(mark.id, "triggerEvent:notificationTemplate:T1:event:E1");
        assert_eq!(mark.category, Category::TriggerEvent);
    }

    #[test]
    fn test_notification_mark_id() {
        let mark = build_notification_mark("tx-9", "sub-3");
        assert_eq!(
            mark.id,
            "createNotificationJobs:transaction:tx-9:subscriber:sub-3"
        );
        assert_eq!(mark.category, Category::CreateNotificationJobs);
    }

    #[test]
    fn test_digest_steps_mark_id() {
        let mark = build_digest_steps_mark("tx-9", "sub-3");
        assert_eq!(mark.id, "digestFilterSteps:transaction:tx-9:subscriber:sub-3");
        assert_eq!(mark.category, Category::DigestFilterSteps);
    }

    #[test]
    fn test_builders_categorize_exhaustively_and_exclusively() {
        let marks = [
            build_event_mark("T1", "E1"),
            build_notification_mark("tx", "sub"),
            build_digest_steps_mark("tx", "sub"),
        ];

        for mark in &marks {
            let resolved: Vec<_> = Category::ALL
                .iter()
                .filter(|c| Category::of(&mark.id) == Some(**c))
                .collect();
            assert_eq!(resolved.len(), 1, "exactly one category for {}", mark.id);
            assert_eq!(Category::of(&mark.id), Some(mark.category));
        }
    }

    #[test]
    fn test_distinct_identifiers_give_distinct_ids() {
        let a = build_notification_mark("tx-1", "sub-1");
        let b = build_notification_mark("tx-1", "sub-2");
        assert_ne!(a.id, b.id);
    }
}
