// ABOUTME: User storage layer using SQLite
// ABOUTME: Handles account rows, approval, and profile updates

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use canopy_storage::{generate_id, StorageError};

use super::types::{User, UserCreateInput, UserProfileUpdate};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        row_to_user(&row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        debug!("Fetching user by email: {}", email);

        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Insert a new account. New accounts start unapproved.
    pub async fn create_user(&self, input: UserCreateInput) -> Result<User, StorageError> {
        let user_id = generate_id();
        let now = Utc::now();

        debug!("Creating user: {} ({})", user_id, input.email);

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, display_name, timezone, approved, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.display_name)
        .bind(&input.timezone)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_user(&user_id).await
    }

    /// Mark an account as approved; approval is an external admin action.
    pub async fn approve_user(&self, user_id: &str) -> Result<User, StorageError> {
        debug!("Approving user: {}", user_id);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET approved = 1, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_user(user_id).await
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: UserProfileUpdate,
    ) -> Result<User, StorageError> {
        debug!("Updating profile for user: {}", user_id);

        let mut query = String::from("UPDATE users SET updated_at = ?");
        let mut has_updates = false;

        if update.display_name.is_some() {
            query.push_str(", display_name = ?");
            has_updates = true;
        }
        if update.timezone.is_some() {
            query.push_str(", timezone = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_user(user_id).await;
        }

        let mut q = sqlx::query(&query).bind(Utc::now());

        if let Some(display_name) = &update.display_name {
            q = q.bind(display_name);
        }
        if let Some(timezone) = &update.timezone {
            q = q.bind(timezone);
        }

        q.bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.get_user(user_id).await
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        display_name: row.try_get("display_name")?,
        timezone: row.try_get("timezone")?,
        approved: row.try_get::<i64, _>("approved")? != 0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
