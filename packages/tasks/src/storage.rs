// ABOUTME: Task storage layer using SQLite
// ABOUTME: Handles CRUD operations for tasks scoped to a product

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use canopy_storage::{generate_id, StorageError};

use super::types::{Task, TaskCreateInput, TaskUpdateInput};

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_tasks(&self, product_id: &str) -> Result<Vec<Task>, StorageError> {
        debug!("Fetching tasks for product: {}", product_id);

        let rows = sqlx::query(
            "SELECT * FROM tasks WHERE product_id = ? ORDER BY created_at",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_task).collect()
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Task, StorageError> {
        debug!("Fetching task: {}", task_id);

        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        row_to_task(&row)
    }

    pub async fn create_task(
        &self,
        product_id: &str,
        user_id: &str,
        input: TaskCreateInput,
    ) -> Result<Task, StorageError> {
        let task_id = generate_id();
        let now = Utc::now();
        let status = input.status.unwrap_or_default();

        debug!("Creating task: {} for product: {}", task_id, product_id);

        sqlx::query(
            r#"
            INSERT INTO tasks (id, product_id, title, description, status, due_date,
                               created_by_user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task_id)
        .bind(product_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(status)
        .bind(input.due_date)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_task(&task_id).await
    }

    pub async fn update_task(
        &self,
        task_id: &str,
        input: TaskUpdateInput,
    ) -> Result<Task, StorageError> {
        debug!("Updating task: {}", task_id);

        let mut query = String::from("UPDATE tasks SET updated_at = ?");
        let mut has_updates = false;

        if input.title.is_some() {
            query.push_str(", title = ?");
            has_updates = true;
        }
        if input.description.is_some() {
            query.push_str(", description = ?");
            has_updates = true;
        }
        if input.status.is_some() {
            query.push_str(", status = ?");
            has_updates = true;
        }
        if input.due_date.is_some() {
            query.push_str(", due_date = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_task(task_id).await;
        }

        let mut q = sqlx::query(&query).bind(Utc::now());

        if let Some(title) = &input.title {
            q = q.bind(title);
        }
        if let Some(description) = &input.description {
            q = q.bind(description);
        }
        if let Some(status) = input.status {
            q = q.bind(status);
        }
        if let Some(due_date) = input.due_date {
            q = q.bind(due_date);
        }

        let result = q
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_task(task_id).await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), StorageError> {
        debug!("Deleting task: {}", task_id);

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Result<Task, StorageError> {
    Ok(Task {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: row.try_get("status")?,
        due_date: row.try_get("due_date")?,
        created_by_user_id: row.try_get("created_by_user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
