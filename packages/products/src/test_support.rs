// ABOUTME: Shared helpers for product and access tests
// ABOUTME: In-memory database setup and fixture rows

use chrono::Utc;
use sqlx::SqlitePool;

use canopy_storage::connect_in_memory;

use crate::types::ProductCreateInput;

pub async fn setup_pool() -> SqlitePool {
    connect_in_memory().await.unwrap()
}

pub async fn insert_user(pool: &SqlitePool, user_id: &str) {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, display_name, approved, created_at, updated_at)
        VALUES (?, ?, 'hash', ?, 1, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(format!("{}@example.com", user_id))
    .bind(user_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
}

pub fn product_input(name: &str) -> ProductCreateInput {
    ProductCreateInput {
        name: name.to_string(),
        status: None,
        progress: None,
    }
}
