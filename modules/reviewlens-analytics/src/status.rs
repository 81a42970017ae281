use reviewlens_common::{ApprovalMap, ApprovalRecord, ModerationStatus};

/// Moderation status of one review against an approval snapshot.
///
/// `false` and "absent" differ: `false` is an explicit denial, a missing key means
/// no decision yet. A review goes back to pending only when the store deletes its key.
pub fn resolve_status(review_id: &str, approvals: &ApprovalMap) -> ModerationStatus {
    match approvals.get(review_id) {
        None => ModerationStatus::Pending,
        Some(true) => ModerationStatus::Approved,
        Some(false) => ModerationStatus::Denied,
    }
}

/// Build the snapshot the pipeline consumes from persisted rows.
pub fn approval_map<'a>(records: impl IntoIterator<Item = &'a ApprovalRecord>) -> ApprovalMap {
    records
        .into_iter()
        .map(|r| (r.review_id.clone(), r.approved))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_is_pending() {
        assert_eq!(resolve_status("r1", &ApprovalMap::new()), ModerationStatus::Pending);
    }

    #[test]
    fn test_true_is_approved_false_is_denied() {
        let mut approvals = ApprovalMap::new();
        approvals.insert("r1".into(), true);
        approvals.insert("r2".into(), false);
        assert_eq!(resolve_status("r1", &approvals), ModerationStatus::Approved);
        assert_eq!(resolve_status("r2", &approvals), ModerationStatus::Denied);
        assert_eq!(resolve_status("r3", &approvals), ModerationStatus::Pending);
    }

    #[test]
    fn test_approval_map_from_records() {
        let records = vec![
            ApprovalRecord {
                review_id: "a".into(),
                approved: true,
                approved_by: Some("manager".into()),
                approved_at: None,
            },
            ApprovalRecord {
                review_id: "b".into(),
                approved: false,
                approved_by: None,
                approved_at: None,
            },
        ];
        let map = approval_map(&records);
        assert_eq!(map.get("a"), Some(&true));
        assert_eq!(map.get("b"), Some(&false));
        assert_eq!(map.len(), 2);
    }
}
