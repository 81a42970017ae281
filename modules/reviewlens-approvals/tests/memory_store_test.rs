//! Approval store contract, exercised against the in-memory implementation.

use std::sync::Arc;

use reviewlens_approvals::{ApprovalError, ApprovalStore, MemoryApprovalStore, DEFAULT_APPROVER};

#[tokio::test]
async fn test_set_then_snapshot() {
    let store = MemoryApprovalStore::new();
    store.set("hostaway-1", true, None).await.unwrap();
    store.set("google-x-1", false, Some("alex")).await.unwrap();

    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.get("hostaway-1"), Some(&true));
    assert_eq!(snapshot.get("google-x-1"), Some(&false));

    let rows = store.get_all().await.unwrap();
    assert_eq!(rows.len(), 2);
    let host = rows.iter().find(|r| r.review_id == "hostaway-1").unwrap();
    assert_eq!(host.approved_by.as_deref(), Some(DEFAULT_APPROVER));
    assert!(host.approved_at.is_some());
}

#[tokio::test]
async fn test_set_is_an_upsert() {
    let store = MemoryApprovalStore::new();
    store.set("hostaway-1", true, Some("alex")).await.unwrap();
    store.set("hostaway-1", false, Some("sam")).await.unwrap();

    let rows = store.get_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].approved);
    assert_eq!(rows[0].approved_by.as_deref(), Some("sam"));
}

#[tokio::test]
async fn test_clear_returns_review_to_pending() {
    let store = MemoryApprovalStore::new();
    store.set("hostaway-1", false, None).await.unwrap();

    assert!(store.clear("hostaway-1").await.unwrap());
    assert!(!store.clear("hostaway-1").await.unwrap());
    assert!(store.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_review_id_is_rejected() {
    let store = MemoryApprovalStore::new();
    let err = store.set("  ", true, None).await.unwrap_err();
    assert!(matches!(err, ApprovalError::InvalidReviewId(_)));
}

#[tokio::test]
async fn test_concurrent_writers() {
    let store: Arc<dyn ApprovalStore> = Arc::new(MemoryApprovalStore::new());
    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.set(&format!("hostaway-{i}"), i % 2 == 0, None).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(store.snapshot().await.unwrap().len(), 20);
}
