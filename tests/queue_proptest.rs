//! Property-based tests for queue ordering
//!
//! Uses proptest to generate random enqueue timestamps and verify the
//! replay-order guarantees.

use chrono::{TimeZone, Utc};
use jobsync::offline::queue::{order_by_queue_time, PendingAction};
use proptest::prelude::*;

fn action(id: String, millis: i64) -> PendingAction {
    PendingAction {
        id,
        kind: "delete_client".to_string(),
        payload: serde_json::json!({"id": {"remote": 1}}),
        queued_at: Utc.timestamp_millis_opt(millis).unwrap(),
    }
}

proptest! {
    #[test]
    fn test_ordering_is_nondecreasing_and_lossless(
        offsets in proptest::collection::vec(0i64..1_000_000, 0..32)
    ) {
        let actions: Vec<PendingAction> = offsets
            .iter()
            .enumerate()
            .map(|(i, millis)| action(format!("a{}", i), *millis))
            .collect();

        let ordered = order_by_queue_time(actions.clone());

        prop_assert_eq!(ordered.len(), actions.len());
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].queued_at <= pair[1].queued_at);
        }
        // Same multiset of ids, nothing dropped or duplicated.
        let mut before: Vec<&str> = actions.iter().map(|a| a.id.as_str()).collect();
        let mut after: Vec<&str> = ordered.iter().map(|a| a.id.as_str()).collect();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order(count in 2usize..16) {
        let actions: Vec<PendingAction> = (0..count)
            .map(|i| action(format!("a{}", i), 1000))
            .collect();

        let ordered = order_by_queue_time(actions.clone());

        let ids: Vec<&str> = ordered.iter().map(|a| a.id.as_str()).collect();
        let expected: Vec<&str> = actions.iter().map(|a| a.id.as_str()).collect();
        prop_assert_eq!(ids, expected);
    }
}
