//! MySQL repository tests against a live database

use chrono::{Duration, Utc};
use uuid::Uuid;

use ak_core::domain::entities::{Account, RefreshToken};
use ak_core::errors::{AuthError, DomainError, RefreshRejection};
use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};
use ak_core::services::hash_token;

use super::connection_tests::test_config;
use crate::database::{
    DatabasePool, MySqlAccountRepository, MySqlRefreshTokenRepository, MySqlRoleRepository,
};

async fn migrated_pool() -> DatabasePool {
    let pool = DatabasePool::new(&test_config()).await.unwrap();
    pool.run_migrations().await.unwrap();
    pool
}

async fn stored_account(pool: &DatabasePool) -> Account {
    let repo = MySqlAccountRepository::new(pool.get_pool().clone());
    let username = format!("user_{}", &Uuid::new_v4().simple().to_string()[..12]);
    let account = Account::new(username, "hash".to_string(), None, ["USER".to_string()]);
    repo.create(account).await.unwrap()
}

fn token_for(account: &Account, secret: &str) -> RefreshToken {
    RefreshToken::issue(
        account.id,
        hash_token(secret),
        Utc::now(),
        Duration::days(7),
        Some("127.0.0.1".to_string()),
        None,
    )
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_seeded_roles_exist() {
    let pool = migrated_pool().await;
    let repo = MySqlRoleRepository::new(pool.get_pool().clone());

    let role = repo.find_by_name("USER").await.unwrap();
    assert!(role.is_some());
    assert!(repo.find_by_name("NOBODY").await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_account_create_and_find() {
    let pool = migrated_pool().await;
    let repo = MySqlAccountRepository::new(pool.get_pool().clone());
    let account = stored_account(&pool).await;

    let found = repo.find_by_username(&account.username).await.unwrap().unwrap();
    assert_eq!(found.id, account.id);
    assert!(found.roles.contains("USER"));
    assert!(repo.exists_by_username(&account.username).await.unwrap());

    let duplicate = Account::new(account.username.clone(), "h".to_string(), None, Vec::new());
    let err = repo.create(duplicate).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::AlreadyExists { .. })));
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_create_supersedes_previous_tokens() {
    let pool = migrated_pool().await;
    let account = stored_account(&pool).await;
    let repo = MySqlRefreshTokenRepository::new(pool.get_pool().clone());

    repo.create(token_for(&account, "first")).await.unwrap();
    repo.create(token_for(&account, "second")).await.unwrap();

    let live = repo.find_by_user_id(account.id).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].token_hash, hash_token("second"));
    assert!(repo.find_active(&hash_token("first")).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_rotate_succeeds_once() {
    let pool = migrated_pool().await;
    let account = stored_account(&pool).await;
    let repo = MySqlRefreshTokenRepository::new(pool.get_pool().clone());
    repo.create(token_for(&account, "once")).await.unwrap();

    let (consumed, stored) = repo
        .rotate(&hash_token("once"), token_for(&account, "twice"), Utc::now())
        .await
        .unwrap();
    assert!(consumed.revoked);
    assert_eq!(stored.token_hash, hash_token("twice"));

    let err = repo
        .rotate(&hash_token("once"), token_for(&account, "thrice"), Utc::now())
        .await
        .unwrap_err();
    assert!(err.refresh_rejection().is_some());

    let live = repo.find_by_user_id(account.id).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].token_hash, hash_token("twice"));
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_rotate_after_revoke_all_is_rejected() {
    let pool = migrated_pool().await;
    let account = stored_account(&pool).await;
    let repo = MySqlRefreshTokenRepository::new(pool.get_pool().clone());
    repo.create(token_for(&account, "before-reset")).await.unwrap();

    repo.revoke_all_for_user(account.id, Utc::now()).await.unwrap();

    let err = repo
        .rotate(&hash_token("before-reset"), token_for(&account, "after-reset"), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.refresh_rejection(), Some(RefreshRejection::NotFound));
    assert!(repo.find_by_user_id(account.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_revoke_all_and_sweep() {
    let pool = migrated_pool().await;
    let account = stored_account(&pool).await;
    let repo = MySqlRefreshTokenRepository::new(pool.get_pool().clone());

    repo.create(token_for(&account, "revoke-all")).await.unwrap();
    assert_eq!(repo.revoke_all_for_user(account.id, Utc::now()).await.unwrap(), 1);
    assert!(repo.find_by_user_id(account.id).await.unwrap().is_empty());

    repo.create(token_for(&account, "sweep-me")).await.unwrap();
    let swept = repo
        .sweep_expired(Utc::now() + Duration::days(8))
        .await
        .unwrap();
    assert!(swept >= 1);
    assert!(repo.find_active(&hash_token("sweep-me")).await.unwrap().is_none());
}
