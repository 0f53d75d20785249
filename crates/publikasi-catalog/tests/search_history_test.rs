//! Search history upsert semantics.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use publikasi_catalog::memory::MemoryStore;
use publikasi_catalog::SearchHistoryTracker;
use publikasi_core::Role;

fn tracker(store: &MemoryStore) -> SearchHistoryTracker {
    SearchHistoryTracker::new(Arc::new(store.clone()))
}

#[tokio::test]
async fn test_repeat_search_refreshes_single_entry() {
    let store = MemoryStore::new();
    let user = store.add_user("analyst@bps.go.id", Role::User);
    let history = tracker(&store);
    let t1 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let t2 = t1 + Duration::hours(2);

    let first = history
        .record_search_at(user.id, "inflation", t1)
        .await
        .unwrap()
        .unwrap();
    let second = history
        .record_search_at(user.id, "  inflation ", t2)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.id, second.id);
    let entries = history.list_recent(user.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].keyword, "inflation");
    assert_eq!(entries[0].searched_at_utc, t2);
}

#[tokio::test]
async fn test_blank_keywords_are_ignored() {
    let store = MemoryStore::new();
    let user = store.add_user("analyst@bps.go.id", Role::User);
    let history = tracker(&store);

    assert!(history.record_search(user.id, "").await.unwrap().is_none());
    assert!(history.record_search(user.id, " \t ").await.unwrap().is_none());
    assert!(history.list_recent(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_keywords_are_case_sensitive_and_per_user() {
    let store = MemoryStore::new();
    let alice = store.add_user("alice@example.com", Role::User);
    let bob = store.add_user("bob@example.com", Role::User);
    let history = tracker(&store);

    history.record_search(alice.id, "GDP").await.unwrap();
    history.record_search(alice.id, "gdp").await.unwrap();
    history.record_search(bob.id, "GDP").await.unwrap();

    assert_eq!(history.list_recent(alice.id).await.unwrap().len(), 2);
    assert_eq!(history.list_recent(bob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_recent_list_is_capped_and_newest_first() {
    let store = MemoryStore::new();
    let user = store.add_user("analyst@bps.go.id", Role::User);
    let history = tracker(&store);
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    for i in 0..12 {
        history
            .record_search_at(user.id, &format!("keyword {}", i), start + Duration::minutes(i))
            .await
            .unwrap();
    }
    // Re-searching an old keyword moves it to the front
    history
        .record_search_at(user.id, "keyword 0", start + Duration::hours(1))
        .await
        .unwrap();

    let recent = history.list_recent(user.id).await.unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].keyword, "keyword 0");
    assert_eq!(recent[1].keyword, "keyword 11");

    assert_eq!(history.clear(user.id).await.unwrap(), 12);
    assert!(history.list_recent(user.id).await.unwrap().is_empty());
}
