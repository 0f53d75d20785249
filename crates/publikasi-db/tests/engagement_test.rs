//! Integration tests for notifications and search history.
//!
//! Requires a migrated PostgreSQL database (see `test_fixtures`).

use chrono::{Duration, Utc};
use publikasi_db::test_fixtures::TestDatabase;
use publikasi_db::{
    NewNotification, NotificationRepository, NotificationType, Role, SearchHistoryRepository,
    ENTITY_USER,
};

fn security_notice(recipient_id: uuid::Uuid) -> NewNotification {
    NewNotification {
        recipient_id,
        title: "Password changed".to_string(),
        message: "Your password has been changed.".to_string(),
        notification_type: NotificationType::PasswordChanged,
        related_entity_type: Some(ENTITY_USER.to_string()),
        related_entity_id: Some(recipient_id),
    }
}

#[tokio::test]
#[ignore = "Requires migrated PostgreSQL"]
async fn test_batch_insert_is_all_or_nothing() {
    let test_db = TestDatabase::new().await;
    let user = test_db.seed_user(Role::User).await;
    let repo = &test_db.db.notifications;

    // Second recipient does not exist: the FK violation rolls back the first row.
    let batch = vec![security_notice(user), security_notice(uuid::Uuid::now_v7())];
    assert!(repo.insert_batch(batch).await.is_err());
    assert_eq!(repo.count_unread(user).await.unwrap(), 0);

    assert_eq!(repo.insert_batch(vec![security_notice(user)]).await.unwrap(), 1);
    assert_eq!(repo.count_unread(user).await.unwrap(), 1);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires migrated PostgreSQL"]
async fn test_paging_read_state_and_retention() {
    let test_db = TestDatabase::new().await;
    let user = test_db.seed_user(Role::User).await;
    let repo = &test_db.db.notifications;

    repo.insert_batch((0..3).map(|_| security_notice(user)).collect())
        .await
        .unwrap();

    let (page, total) = repo.list_for_user(user, 2, 0).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].notification_type, NotificationType::PasswordChanged);

    repo.mark_read(page[0].id).await.unwrap();
    assert_eq!(repo.count_unread(user).await.unwrap(), 2);
    assert_eq!(repo.mark_all_read(user).await.unwrap(), 2);
    assert_eq!(repo.delete_read(user).await.unwrap(), 3);

    repo.insert_batch(vec![security_notice(user)]).await.unwrap();
    let future_cutoff = Utc::now() + Duration::minutes(1);
    assert!(repo.delete_older_than(future_cutoff).await.unwrap() >= 1);
    assert!(repo.list_unread(user).await.unwrap().is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires migrated PostgreSQL"]
async fn test_search_history_insert_collapses_duplicates() {
    let test_db = TestDatabase::new().await;
    let user = test_db.seed_user(Role::User).await;
    let repo = &test_db.db.search_history;

    let first_at = Utc::now() - Duration::hours(1);
    let second_at = Utc::now();
    let first = repo.insert(user, "bps", first_at).await.unwrap();
    let second = repo.insert(user, "bps", second_at).await.unwrap();

    assert_eq!(first.id, second.id);
    let recent = repo.list_recent(user, 10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(
        recent[0].searched_at_utc.timestamp_micros(),
        second_at.timestamp_micros()
    );

    assert_eq!(repo.delete_for_user(user).await.unwrap(), 1);
    assert!(repo.find(user, "bps").await.unwrap().is_none());

    test_db.cleanup().await;
}
