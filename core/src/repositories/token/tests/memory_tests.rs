//! Unit tests for the in-memory refresh token repository

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{RefreshToken, RefreshTokenState};
use crate::errors::RefreshRejection;
use crate::repositories::token::{InMemoryRefreshTokenRepository, RefreshTokenRepository};

fn token(user_id: Uuid, hash: &str, issued_at: DateTime<Utc>) -> RefreshToken {
    RefreshToken::issue(
        user_id,
        hash.to_string(),
        issued_at,
        Duration::days(7),
        None,
        None,
    )
}

#[tokio::test]
async fn test_create_supersedes_prior_rows_without_revoking() {
    let repo = InMemoryRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    for i in 0..5 {
        repo.create(token(user_id, &format!("hash-{}", i), now + Duration::seconds(i)))
            .await
            .unwrap();
    }

    let rows = repo.rows_for_user(user_id).await;
    assert_eq!(rows.len(), 5);
    assert_eq!(rows.iter().filter(|t| !t.is_deleted).count(), 1);
    assert_eq!(rows.iter().filter(|t| t.is_deleted).count(), 4);
    assert!(rows.iter().all(|t| !t.revoked));
    assert!(rows
        .iter()
        .filter(|t| t.is_deleted)
        .all(|t| t.deleted_by.as_deref() == Some("SYSTEM")));

    let live = repo.find_by_user_id(user_id).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].token_hash, "hash-4");
}

#[tokio::test]
async fn test_create_leaves_other_users_alone() {
    let repo = InMemoryRefreshTokenRepository::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let now = Utc::now();

    repo.create(token(alice, "a1", now)).await.unwrap();
    repo.create(token(bob, "b1", now)).await.unwrap();

    assert!(repo.find_active("a1").await.unwrap().is_some());
    assert!(repo.find_active("b1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_duplicate_digest_rejected() {
    let repo = InMemoryRefreshTokenRepository::new();
    let now = Utc::now();

    repo.create(token(Uuid::new_v4(), "same", now)).await.unwrap();
    let result = repo.create(token(Uuid::new_v4(), "same", now)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_find_active_skips_deleted_rows() {
    let repo = InMemoryRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    repo.create(token(user_id, "first", now)).await.unwrap();
    repo.create(token(user_id, "second", now)).await.unwrap();

    assert!(repo.find_active("first").await.unwrap().is_none());
    assert!(repo.find_active("second").await.unwrap().is_some());
}

#[tokio::test]
async fn test_rotate_replaces_token_in_one_step() {
    let repo = InMemoryRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    repo.create(token(user_id, "t", now)).await.unwrap();

    let err = repo
        .rotate("missing", token(user_id, "never", now), now)
        .await
        .unwrap_err();
    assert_eq!(err.refresh_rejection(), Some(RefreshRejection::NotFound));

    let (consumed, stored) = repo.rotate("t", token(user_id, "t2", now), now).await.unwrap();
    assert!(consumed.revoked);
    assert_eq!(consumed.revoked_at, Some(now));
    assert_eq!(stored.token_hash, "t2");

    let live = repo.find_by_user_id(user_id).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].token_hash, "t2");

    // The predecessor stays revoked underneath its soft delete
    let rows = repo.rows_for_user(user_id).await;
    let old = rows.iter().find(|t| t.token_hash == "t").unwrap();
    assert!(old.revoked && old.is_deleted);

    let err = repo.rotate("t", token(user_id, "t3", now), now).await.unwrap_err();
    assert!(err.refresh_rejection().is_some());
}

#[tokio::test]
async fn test_rotate_rejects_revoked_token() {
    let repo = InMemoryRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    repo.create(token(user_id, "t", now)).await.unwrap();
    repo.revoke("t", now).await.unwrap();

    let err = repo.rotate("t", token(user_id, "t2", now), now).await.unwrap_err();
    assert_eq!(err.refresh_rejection(), Some(RefreshRejection::Revoked));
    assert!(repo.find_active("t2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rotate_expired_token() {
    let repo = InMemoryRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    repo.create(token(user_id, "t", now)).await.unwrap();

    let later = now + Duration::days(8);
    let err = repo
        .rotate("t", token(user_id, "t2", later), later)
        .await
        .unwrap_err();
    assert_eq!(err.refresh_rejection(), Some(RefreshRejection::Expired));

    // An expired token is left unrevoked and no successor is stored
    let row = repo.find_active("t").await.unwrap().unwrap();
    assert!(!row.revoked);
    assert_eq!(repo.all_rows().await.len(), 1);
}

#[tokio::test]
async fn test_rotate_rejects_replacement_for_other_user() {
    let repo = InMemoryRefreshTokenRepository::new();
    let owner = Uuid::new_v4();
    let now = Utc::now();
    repo.create(token(owner, "t", now)).await.unwrap();

    let err = repo
        .rotate("t", token(Uuid::new_v4(), "stolen", now), now)
        .await
        .unwrap_err();
    assert_eq!(err.refresh_rejection(), Some(RefreshRejection::NotFound));
    assert!(!repo.find_active("t").await.unwrap().unwrap().revoked);
}

#[tokio::test]
async fn test_revoke_all_after_rotation_leaves_nothing_live() {
    let repo = InMemoryRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    repo.create(token(user_id, "t", now)).await.unwrap();

    repo.rotate("t", token(user_id, "t2", now), now).await.unwrap();
    assert_eq!(repo.revoke_all_for_user(user_id, now).await.unwrap(), 1);
    assert!(repo.find_by_user_id(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_rotate_has_single_winner() {
    let repo = Arc::new(InMemoryRefreshTokenRepository::new());
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    repo.create(token(user_id, "race", now)).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = repo.clone();
        let successor = token(user_id, &format!("next-{}", i), now);
        handles.push(tokio::spawn(async move { repo.rotate("race", successor, now).await }));
    }

    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(repo.find_by_user_id(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let repo = InMemoryRefreshTokenRepository::new();
    let now = Utc::now();
    repo.create(token(Uuid::new_v4(), "t", now)).await.unwrap();

    assert!(repo.revoke("t", now).await.unwrap());
    assert!(repo.revoke("t", now + Duration::minutes(1)).await.unwrap());
    assert!(!repo.revoke("unknown", now).await.unwrap());

    let row = repo.find_active("t").await.unwrap().unwrap();
    assert_eq!(row.revoked_at, Some(now));
    assert_eq!(row.state_at(now), RefreshTokenState::Revoked);
}

#[tokio::test]
async fn test_revoke_all_for_user_revokes_and_deletes() {
    let repo = InMemoryRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    repo.create(token(user_id, "t", now)).await.unwrap();

    assert_eq!(repo.revoke_all_for_user(user_id, now).await.unwrap(), 1);
    assert_eq!(repo.revoke_all_for_user(user_id, now).await.unwrap(), 0);

    let rows = repo.rows_for_user(user_id).await;
    assert!(rows.iter().all(|t| t.revoked && t.is_deleted));
    assert!(repo.find_active("t").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sweep_only_touches_expired_live_rows() {
    let repo = InMemoryRefreshTokenRepository::new();
    let now = Utc::now();

    repo.create(token(Uuid::new_v4(), "old", now - Duration::days(10)))
        .await
        .unwrap();
    repo.create(token(Uuid::new_v4(), "fresh", now)).await.unwrap();

    assert_eq!(repo.sweep_expired(now).await.unwrap(), 1);
    assert_eq!(repo.sweep_expired(now).await.unwrap(), 0);

    assert!(repo.find_active("old").await.unwrap().is_none());
    assert!(repo.find_active("fresh").await.unwrap().is_some());
}
