// ABOUTME: Customer interview storage layer using SQLite
// ABOUTME: Handles CRUD operations for interviews scoped to a product

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use canopy_storage::{generate_id, StorageError};

use super::types::{CustomerInterview, InterviewCreateInput, InterviewUpdateInput};

pub struct InterviewStorage {
    pool: SqlitePool,
}

impl InterviewStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_interviews(
        &self,
        product_id: &str,
    ) -> Result<Vec<CustomerInterview>, StorageError> {
        debug!("Fetching interviews for product: {}", product_id);

        let rows = sqlx::query(
            "SELECT * FROM customer_interviews WHERE product_id = ? ORDER BY created_at",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_interview).collect()
    }

    pub async fn get_interview(
        &self,
        interview_id: &str,
    ) -> Result<CustomerInterview, StorageError> {
        debug!("Fetching interview: {}", interview_id);

        let row = sqlx::query("SELECT * FROM customer_interviews WHERE id = ?")
            .bind(interview_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        row_to_interview(&row)
    }

    pub async fn create_interview(
        &self,
        product_id: &str,
        input: InterviewCreateInput,
    ) -> Result<CustomerInterview, StorageError> {
        let interview_id = generate_id();
        let now = Utc::now();

        debug!(
            "Creating interview: {} for product: {}",
            interview_id, product_id
        );

        sqlx::query(
            r#"
            INSERT INTO customer_interviews (id, product_id, interviewee, notes, conducted_at,
                                             created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&interview_id)
        .bind(product_id)
        .bind(&input.interviewee)
        .bind(&input.notes)
        .bind(input.conducted_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_interview(&interview_id).await
    }

    pub async fn update_interview(
        &self,
        interview_id: &str,
        input: InterviewUpdateInput,
    ) -> Result<CustomerInterview, StorageError> {
        debug!("Updating interview: {}", interview_id);

        let mut query = String::from("UPDATE customer_interviews SET updated_at = ?");
        let mut has_updates = false;

        if input.interviewee.is_some() {
            query.push_str(", interviewee = ?");
            has_updates = true;
        }
        if input.notes.is_some() {
            query.push_str(", notes = ?");
            has_updates = true;
        }
        if input.conducted_at.is_some() {
            query.push_str(", conducted_at = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_interview(interview_id).await;
        }

        let mut q = sqlx::query(&query).bind(Utc::now());

        if let Some(interviewee) = &input.interviewee {
            q = q.bind(interviewee);
        }
        if let Some(notes) = &input.notes {
            q = q.bind(notes);
        }
        if let Some(conducted_at) = input.conducted_at {
            q = q.bind(conducted_at);
        }

        let result = q
            .bind(interview_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_interview(interview_id).await
    }

    pub async fn delete_interview(&self, interview_id: &str) -> Result<(), StorageError> {
        debug!("Deleting interview: {}", interview_id);

        let result = sqlx::query("DELETE FROM customer_interviews WHERE id = ?")
            .bind(interview_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn row_to_interview(row: &sqlx::sqlite::SqliteRow) -> Result<CustomerInterview, StorageError> {
    Ok(CustomerInterview {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        interviewee: row.try_get("interviewee")?,
        notes: row.try_get("notes")?,
        conducted_at: row.try_get("conducted_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
