//! Store tests against a real PostgreSQL. Run with
//! `DATABASE_URL=... cargo test -- --ignored`.

use chrono::{TimeDelta, Utc};
use gatehouse_db::{PgTokenStore, PgUserStore, StoreError, TokenStore, UserStore};
use gatehouse_models::{NewUser, Token, TokenType};
use sqlx::PgPool;

async fn insert_user(pool: &PgPool, email: &str) -> gatehouse_models::User {
    PgUserStore::new(pool.clone())
        .insert(NewUser {
            email: email.to_string(),
            role: "user".to_string(),
        })
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_user_insert_and_find(pool: PgPool) {
    let users = PgUserStore::new(pool.clone());
    let user = insert_user(&pool, "pg-user@example.com").await;

    let by_id = users.find_by_id(user.id).await.unwrap();
    assert_eq!(by_id.as_ref().map(|u| u.email.as_str()), Some("pg-user@example.com"));

    let by_email = users.find_by_email("pg-user@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));

    let duplicate = users
        .insert(NewUser {
            email: "pg-user@example.com".to_string(),
            role: "admin".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_email_uniqueness_ignores_case(pool: PgPool) {
    let users = PgUserStore::new(pool.clone());
    let first = insert_user(&pool, "Alice@Example.com").await;

    let duplicate = users
        .insert(NewUser {
            email: "alice@example.com".to_string(),
            role: "user".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

    let found = users.find_by_email("ALICE@EXAMPLE.COM").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(first.id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_token_lifecycle(pool: PgPool) {
    let tokens = PgTokenStore::new(pool.clone());
    let user = insert_user(&pool, "pg-token@example.com").await;

    let token = Token::new("pg-token", user.id, TokenType::Auth);
    tokens.insert(&token).await.unwrap();

    let found = tokens
        .find_one("pg-token", user.id, TokenType::Auth)
        .await
        .unwrap();
    assert!(found.is_some());

    let wrong_type = tokens
        .find_one("pg-token", user.id, TokenType::Refresh)
        .await
        .unwrap();
    assert!(wrong_type.is_none());

    tokens.delete("pg-token").await.unwrap();
    tokens.delete("pg-token").await.unwrap();
    assert!(
        tokens
            .find_one("pg-token", user.id, TokenType::Auth)
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_created_before(pool: PgPool) {
    let tokens = PgTokenStore::new(pool.clone());
    let user = insert_user(&pool, "pg-purge@example.com").await;

    let mut stale = Token::new("pg-stale", user.id, TokenType::Auth);
    stale.created_at = Utc::now() - TimeDelta::hours(2);
    tokens.insert(&stale).await.unwrap();
    tokens
        .insert(&Token::new("pg-fresh", user.id, TokenType::Auth))
        .await
        .unwrap();

    let removed = tokens
        .delete_created_before(TokenType::Auth, Utc::now() - TimeDelta::hours(1))
        .await
        .unwrap();

    assert_eq!(removed, 1);
}
