//! Reduces per-token outcomes into a delivery report.

use std::collections::HashSet;

use vitrix_entity::notification::{DeliveryReport, DispatchOutcome, OverallStatus};

/// Summarise `outcomes` for `requested` recipients.
///
/// A recipient counts as sent when any of its tokens was fulfilled.
pub fn aggregate(outcomes: &[DispatchOutcome], requested: usize) -> DeliveryReport {
    let reached: HashSet<_> = outcomes
        .iter()
        .filter(|o| o.is_fulfilled())
        .map(|o| o.recipient_id)
        .collect();

    let requested = requested as u64;
    let sent = (reached.len() as u64).min(requested);

    DeliveryReport {
        requested,
        sent,
        failed: requested - sent,
        overall: OverallStatus::classify(sent, requested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ok(id: Uuid, token: &str) -> DispatchOutcome {
        DispatchOutcome::fulfilled(id, token)
    }

    fn bad(id: Uuid, token: &str) -> DispatchOutcome {
        DispatchOutcome::rejected(id, token, "UNAVAILABLE", "try later")
    }

    #[test]
    fn boundaries() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let none = aggregate(&[bad(a, "1"), bad(b, "2")], 2);
        assert_eq!((none.sent, none.failed, none.overall), (0, 2, OverallStatus::Failure));

        let some = aggregate(&[ok(a, "1"), bad(b, "2")], 2);
        assert_eq!((some.sent, some.failed, some.overall), (1, 1, OverallStatus::Partial));

        let all = aggregate(&[ok(a, "1"), ok(b, "2")], 2);
        assert_eq!((all.sent, all.failed, all.overall), (2, 0, OverallStatus::Success));
    }

    #[test]
    fn one_fulfilled_token_is_enough_per_recipient() {
        let a = Uuid::new_v4();
        let report = aggregate(&[bad(a, "phone"), ok(a, "tablet"), ok(a, "web")], 1);
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.overall, OverallStatus::Success);
    }

    #[test]
    fn recipients_without_tokens_count_as_failed() {
        let report = aggregate(&[], 1);
        assert_eq!(report.requested, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.overall, OverallStatus::Failure);
    }

    #[test]
    fn sent_plus_failed_equals_requested() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for fulfilled in 0..=ids.len() {
            let outcomes: Vec<_> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| if i < fulfilled { ok(*id, "t") } else { bad(*id, "t") })
                .collect();
            let report = aggregate(&outcomes, ids.len());
            assert_eq!(report.sent + report.failed, report.requested);
            assert_eq!(report.sent, fulfilled as u64);
        }
    }
}
