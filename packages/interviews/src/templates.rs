// ABOUTME: Interview template storage layer using SQLite
// ABOUTME: Templates are owned by a user, not a product

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use canopy_storage::{generate_id, StorageError};

use super::types::{InterviewTemplate, TemplateCreateInput, TemplateUpdateInput};

pub struct TemplateStorage {
    pool: SqlitePool,
}

impl TemplateStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_templates(
        &self,
        user_id: &str,
    ) -> Result<Vec<InterviewTemplate>, StorageError> {
        debug!("Fetching templates for user: {}", user_id);

        let rows = sqlx::query(
            "SELECT * FROM interview_templates WHERE user_id = ? ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_template).collect()
    }

    pub async fn get_template(
        &self,
        template_id: &str,
    ) -> Result<InterviewTemplate, StorageError> {
        let row = sqlx::query("SELECT * FROM interview_templates WHERE id = ?")
            .bind(template_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        row_to_template(&row)
    }

    pub async fn create_template(
        &self,
        user_id: &str,
        input: TemplateCreateInput,
    ) -> Result<InterviewTemplate, StorageError> {
        let template_id = generate_id();
        let now = Utc::now();

        debug!("Creating template: {} for user: {}", template_id, user_id);

        let questions = input
            .questions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(StorageError::Json)?;

        sqlx::query(
            r#"
            INSERT INTO interview_templates (id, user_id, name, questions, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&template_id)
        .bind(user_id)
        .bind(&input.name)
        .bind(questions)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_template(&template_id).await
    }

    pub async fn update_template(
        &self,
        template_id: &str,
        input: TemplateUpdateInput,
    ) -> Result<InterviewTemplate, StorageError> {
        debug!("Updating template: {}", template_id);

        let mut query = String::from("UPDATE interview_templates SET updated_at = ?");
        let mut has_updates = false;

        if input.name.is_some() {
            query.push_str(", name = ?");
            has_updates = true;
        }
        if input.questions.is_some() {
            query.push_str(", questions = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_template(template_id).await;
        }

        let mut q = sqlx::query(&query).bind(Utc::now());

        if let Some(name) = &input.name {
            q = q.bind(name);
        }
        if let Some(questions) = &input.questions {
            q = q.bind(serde_json::to_string(questions).map_err(StorageError::Json)?);
        }

        let result = q
            .bind(template_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_template(template_id).await
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<(), StorageError> {
        debug!("Deleting template: {}", template_id);

        let result = sqlx::query("DELETE FROM interview_templates WHERE id = ?")
            .bind(template_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn row_to_template(row: &sqlx::sqlite::SqliteRow) -> Result<InterviewTemplate, StorageError> {
    Ok(InterviewTemplate {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        questions: row
            .try_get::<Option<String>, _>("questions")?
            .and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
