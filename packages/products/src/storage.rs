// ABOUTME: Product storage layer using SQLite
// ABOUTME: Row mapping, CRUD, and the visible-products listing

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use canopy_storage::generate_id;

use crate::access::Role;
use crate::error::{ProductError, ProductResult};
use crate::types::{DocumentKind, Product, ProductCreateInput, ProductUpdateInput};

pub struct ProductStorage {
    pool: SqlitePool,
}

impl ProductStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_product(&self, product_id: &str) -> ProductResult<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_product(&r)).transpose()
    }

    /// Products the user can see: owned directly or reachable through a grant.
    pub async fn list_products_for_user(&self, user_id: &str) -> ProductResult<Vec<Product>> {
        debug!("Listing products visible to user: {}", user_id);

        let rows = sqlx::query(
            r#"
            SELECT DISTINCT p.*
            FROM products p
            LEFT JOIN product_access pa ON pa.product_id = p.id
            WHERE p.owner_user_id = ? OR pa.user_id = ?
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    pub async fn list_children(&self, parent_id: &str) -> ProductResult<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products WHERE parent_id = ?")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_product).collect()
    }

    /// Create a root product. The creator's explicit owner grant is written
    /// in the same transaction so no inaccessible orphan can exist.
    pub async fn create_product(
        &self,
        owner_user_id: &str,
        input: ProductCreateInput,
    ) -> ProductResult<Product> {
        if input.name.trim().is_empty() {
            return Err(ProductError::InvalidInput(
                "product name is required".to_string(),
            ));
        }

        let product_id = generate_id();
        let now = Utc::now();
        let status = input.status.unwrap_or_default();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (id, owner_user_id, name, status, archived, progress,
                                  parent_id, iteration_number, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, NULL, 1, ?, ?)
            "#,
        )
        .bind(&product_id)
        .bind(owner_user_id)
        .bind(&input.name)
        .bind(status)
        .bind(input.progress.unwrap_or(0))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO product_access (product_id, user_id, role, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&product_id)
        .bind(owner_user_id)
        .bind(Role::Owner)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Created product '{}' with ID {}", input.name, product_id);

        self.get_product(&product_id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    pub async fn update_product(
        &self,
        product_id: &str,
        input: ProductUpdateInput,
    ) -> ProductResult<Product> {
        debug!("Updating product: {}", product_id);

        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(ProductError::InvalidInput(
                    "product name is required".to_string(),
                ));
            }
        }

        let mut query = String::from("UPDATE products SET updated_at = ?");
        let mut has_updates = false;

        if input.name.is_some() {
            query.push_str(", name = ?");
            has_updates = true;
        }
        if input.status.is_some() {
            query.push_str(", status = ?");
            has_updates = true;
        }
        if input.archived.is_some() {
            query.push_str(", archived = ?");
            has_updates = true;
        }
        if input.progress.is_some() {
            query.push_str(", progress = ?");
            has_updates = true;
        }
        if input.research_status.is_some() {
            query.push_str(", research_status = ?");
            has_updates = true;
        }
        if input.design_status.is_some() {
            query.push_str(", design_status = ?");
            has_updates = true;
        }
        if input.development_status.is_some() {
            query.push_str(", development_status = ?");
            has_updates = true;
        }
        if input.launch_status.is_some() {
            query.push_str(", launch_status = ?");
            has_updates = true;
        }
        if input.research_document.is_some() {
            query.push_str(", research_document = ?");
            has_updates = true;
        }
        if input.prd_document.is_some() {
            query.push_str(", prd_document = ?");
            has_updates = true;
        }
        if input.summary_document.is_some() {
            query.push_str(", summary_document = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self
                .get_product(product_id)
                .await?
                .ok_or(ProductError::NotFound);
        }

        let mut q = sqlx::query(&query).bind(Utc::now());

        if let Some(name) = &input.name {
            q = q.bind(name);
        }
        if let Some(status) = input.status {
            q = q.bind(status);
        }
        if let Some(archived) = input.archived {
            q = q.bind(archived);
        }
        if let Some(progress) = input.progress {
            q = q.bind(progress);
        }
        if let Some(s) = input.research_status {
            q = q.bind(s);
        }
        if let Some(s) = input.design_status {
            q = q.bind(s);
        }
        if let Some(s) = input.development_status {
            q = q.bind(s);
        }
        if let Some(s) = input.launch_status {
            q = q.bind(s);
        }
        if let Some(doc) = &input.research_document {
            q = q.bind(doc);
        }
        if let Some(doc) = &input.prd_document {
            q = q.bind(doc);
        }
        if let Some(doc) = &input.summary_document {
            q = q.bind(doc);
        }

        let result = q.bind(product_id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound);
        }

        self.get_product(product_id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Persist a generated document together with its phase-status flag.
    ///
    /// Both columns change in one statement so the status can never read
    /// completed without the document text being durable.
    pub async fn save_generated_document(
        &self,
        product_id: &str,
        kind: DocumentKind,
        content: &str,
    ) -> ProductResult<Product> {
        debug!(
            "Saving {} document for product: {}",
            kind.document_column(),
            product_id
        );

        let query = format!(
            "UPDATE products SET {} = ?, {} = 'completed', updated_at = ? WHERE id = ?",
            kind.document_column(),
            kind.status_column()
        );

        let result = sqlx::query(&query)
            .bind(content)
            .bind(Utc::now())
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound);
        }

        self.get_product(product_id)
            .await?
            .ok_or(ProductError::NotFound)
    }
}

pub(crate) fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> ProductResult<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        owner_user_id: row.try_get("owner_user_id")?,
        name: row.try_get("name")?,
        status: row.try_get("status")?,
        archived: row.try_get::<i64, _>("archived")? != 0,
        progress: row.try_get("progress")?,
        parent_id: row.try_get("parent_id")?,
        iteration_number: row.try_get("iteration_number")?,
        research_status: row.try_get("research_status")?,
        design_status: row.try_get("design_status")?,
        development_status: row.try_get("development_status")?,
        launch_status: row.try_get("launch_status")?,
        research_document: row.try_get("research_document")?,
        prd_document: row.try_get("prd_document")?,
        summary_document: row.try_get("summary_document")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
