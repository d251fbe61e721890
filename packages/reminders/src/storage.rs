// ABOUTME: Reminder storage layer using SQLite
// ABOUTME: Handles CRUD and due-listing for user-owned reminders

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use canopy_storage::{generate_id, StorageError};

use super::types::{Reminder, ReminderCreateInput, ReminderUpdateInput};

pub struct ReminderStorage {
    pool: SqlitePool,
}

impl ReminderStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>, StorageError> {
        debug!("Fetching reminders for user: {}", user_id);

        let rows = sqlx::query("SELECT * FROM reminders WHERE user_id = ? ORDER BY remind_at")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_reminder).collect()
    }

    /// Reminders due at or before `now` that are still open.
    pub async fn list_due_reminders(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reminder>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM reminders WHERE user_id = ? AND completed = 0 AND remind_at <= ? ORDER BY remind_at",
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_reminder).collect()
    }

    pub async fn get_reminder(&self, reminder_id: &str) -> Result<Reminder, StorageError> {
        let row = sqlx::query("SELECT * FROM reminders WHERE id = ?")
            .bind(reminder_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        row_to_reminder(&row)
    }

    pub async fn create_reminder(
        &self,
        user_id: &str,
        input: ReminderCreateInput,
    ) -> Result<Reminder, StorageError> {
        let reminder_id = generate_id();
        let now = Utc::now();

        debug!("Creating reminder: {} for user: {}", reminder_id, user_id);

        sqlx::query(
            r#"
            INSERT INTO reminders (id, user_id, product_id, task_id, message, remind_at,
                                   completed, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(&reminder_id)
        .bind(user_id)
        .bind(&input.product_id)
        .bind(&input.task_id)
        .bind(&input.message)
        .bind(input.remind_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_reminder(&reminder_id).await
    }

    pub async fn update_reminder(
        &self,
        reminder_id: &str,
        input: ReminderUpdateInput,
    ) -> Result<Reminder, StorageError> {
        debug!("Updating reminder: {}", reminder_id);

        let mut query = String::from("UPDATE reminders SET id = id");
        let mut has_updates = false;

        if input.message.is_some() {
            query.push_str(", message = ?");
            has_updates = true;
        }
        if input.remind_at.is_some() {
            query.push_str(", remind_at = ?");
            has_updates = true;
        }
        if input.completed.is_some() {
            query.push_str(", completed = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_reminder(reminder_id).await;
        }

        let mut q = sqlx::query(&query);

        if let Some(message) = &input.message {
            q = q.bind(message);
        }
        if let Some(remind_at) = input.remind_at {
            q = q.bind(remind_at);
        }
        if let Some(completed) = input.completed {
            q = q.bind(completed);
        }

        let result = q
            .bind(reminder_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_reminder(reminder_id).await
    }

    pub async fn delete_reminder(&self, reminder_id: &str) -> Result<(), StorageError> {
        debug!("Deleting reminder: {}", reminder_id);

        let result = sqlx::query("DELETE FROM reminders WHERE id = ?")
            .bind(reminder_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn row_to_reminder(row: &sqlx::sqlite::SqliteRow) -> Result<Reminder, StorageError> {
    Ok(Reminder {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        product_id: row.try_get("product_id")?,
        task_id: row.try_get("task_id")?,
        message: row.try_get("message")?,
        remind_at: row.try_get("remind_at")?,
        completed: row.try_get::<i64, _>("completed")? != 0,
        created_at: row.try_get("created_at")?,
    })
}
