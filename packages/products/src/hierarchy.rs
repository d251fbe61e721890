// ABOUTME: Product Hierarchy Manager
// ABOUTME: Iteration numbering, cross-iteration context assembly, cascading delete

use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use canopy_storage::generate_id;

use crate::access::{is_unique_violation, AccessEvaluator, Role};
use crate::error::{ProductError, ProductResult};
use crate::storage::row_to_product;
use crate::types::{IterationContext, Product, ProductCreateInput, ProductSnapshot};

/// Owns the parent/child forest of products.
///
/// Every mutation here spans multiple rows and runs inside one transaction;
/// authorization is checked through the evaluator before any write begins.
pub struct HierarchyManager {
    pool: SqlitePool,
    evaluator: AccessEvaluator,
}

impl HierarchyManager {
    pub fn new(pool: SqlitePool) -> Self {
        let evaluator = AccessEvaluator::new(pool.clone());
        Self { pool, evaluator }
    }

    /// Next iteration number for a new child of `parent_id`:
    /// 1 + max(existing children), or 1 when the parent has no children.
    pub async fn next_iteration_number(&self, parent_id: &str) -> ProductResult<i64> {
        let mut conn = self.pool.acquire().await?;
        next_iteration_number(&mut *conn, parent_id).await
    }

    /// Create a child iteration under `parent_id`.
    ///
    /// Requires editor access on the parent. The product row and the
    /// creator's owner grant on the new child are one atomic unit. A unique
    /// index on (parent_id, iteration_number) serializes concurrent
    /// creations; on conflict the number is recomputed once.
    pub async fn create_child(
        &self,
        creator_id: &str,
        parent_id: &str,
        input: ProductCreateInput,
    ) -> ProductResult<Product> {
        if input.name.trim().is_empty() {
            return Err(ProductError::InvalidInput(
                "product name is required".to_string(),
            ));
        }

        self.evaluator
            .evaluate(creator_id, parent_id, Role::Editor)
            .await
            .map_err(|e| match e {
                // A parent the caller cannot use is an invalid parent for creation
                ProductError::NotFound => {
                    ProductError::InvalidOperation("invalid parent product".to_string())
                }
                other => other,
            })?;

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.try_insert_child(creator_id, parent_id, &input).await {
                Ok(product_id) => {
                    info!(
                        "Created iteration '{}' ({}) under parent {}",
                        input.name, product_id, parent_id
                    );
                    let row = sqlx::query("SELECT * FROM products WHERE id = ?")
                        .bind(&product_id)
                        .fetch_one(&self.pool)
                        .await?;
                    return row_to_product(&row);
                }
                Err(ProductError::Conflict(_)) if attempts < 2 => {
                    debug!("Iteration number conflict under {}, retrying", parent_id);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_insert_child(
        &self,
        creator_id: &str,
        parent_id: &str,
        input: &ProductCreateInput,
    ) -> ProductResult<String> {
        let product_id = generate_id();
        let now = Utc::now();
        let status = input.status.unwrap_or_default();

        let mut tx = self.pool.begin().await?;

        let iteration_number = next_iteration_number(&mut *tx, parent_id).await?;

        let insert = sqlx::query(
            r#"
            INSERT INTO products (id, owner_user_id, name, status, archived, progress,
                                  parent_id, iteration_number, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product_id)
        .bind(creator_id)
        .bind(&input.name)
        .bind(status)
        .bind(input.progress.unwrap_or(0))
        .bind(parent_id)
        .bind(iteration_number)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if is_unique_violation(&e) {
                tx.rollback().await?;
                return Err(ProductError::Conflict(
                    "iteration number already taken".to_string(),
                ));
            }
            return Err(e.into());
        }

        // Implicit owner grant on the new child only, never on the parent.
        sqlx::query(
            r#"
            INSERT INTO product_access (product_id, user_id, role, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&product_id)
        .bind(creator_id)
        .bind(Role::Owner)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(product_id)
    }

    /// Assemble the cross-iteration context handed to the AI collaborator:
    /// the parent plus all sibling iterations, as read-only snapshots.
    /// Root products yield an empty context. Sibling order is unspecified.
    pub async fn assemble_iteration_context(
        &self,
        product: &Product,
    ) -> ProductResult<IterationContext> {
        let parent_id = match &product.parent_id {
            Some(id) => id,
            None => return Ok(IterationContext::default()),
        };

        let parent_row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ProductError::NotFound)?;
        let parent = row_to_product(&parent_row)?;

        let sibling_rows = sqlx::query("SELECT * FROM products WHERE parent_id = ? AND id != ?")
            .bind(parent_id)
            .bind(&product.id)
            .fetch_all(&self.pool)
            .await?;

        let siblings = sibling_rows
            .iter()
            .map(|r| row_to_product(r).map(|p| snapshot(&p)))
            .collect::<ProductResult<Vec<_>>>()?;

        Ok(IterationContext {
            parent: Some(snapshot(&parent)),
            siblings,
        })
    }

    /// Delete a product and everything it owns: child iterations
    /// (recursively), grants, tasks, and interviews. Reminders are owned by
    /// users, so their product/task links are detached instead.
    ///
    /// Requires owner access. The whole cascade is one transaction.
    pub async fn delete_product(&self, actor_id: &str, product_id: &str) -> ProductResult<()> {
        self.evaluator
            .evaluate(actor_id, product_id, Role::Owner)
            .await?;

        let mut tx = self.pool.begin().await?;

        // Collect the subtree ids breadth-first, then delete leaf-first so
        // no child row ever references a deleted parent.
        let mut order = vec![product_id.to_string()];
        let mut cursor = 0;
        while cursor < order.len() {
            let current = order[cursor].clone();
            cursor += 1;

            let child_rows = sqlx::query("SELECT id FROM products WHERE parent_id = ?")
                .bind(&current)
                .fetch_all(&mut *tx)
                .await?;
            for row in child_rows {
                order.push(row.try_get("id")?);
            }
        }

        for id in order.iter().rev() {
            delete_product_row(&mut tx, id).await?;
        }

        tx.commit().await?;

        info!(
            "Deleted product {} and {} descendant(s)",
            product_id,
            order.len() - 1
        );

        Ok(())
    }
}

async fn next_iteration_number(
    conn: &mut SqliteConnection,
    parent_id: &str,
) -> ProductResult<i64> {
    let max: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(iteration_number) FROM products WHERE parent_id = ?",
    )
    .bind(parent_id)
    .fetch_one(conn)
    .await?;

    Ok(max.unwrap_or(0) + 1)
}

async fn delete_product_row(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    product_id: &str,
) -> ProductResult<()> {
    sqlx::query(
        "UPDATE reminders SET task_id = NULL WHERE task_id IN (SELECT id FROM tasks WHERE product_id = ?)",
    )
    .bind(product_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query("UPDATE reminders SET product_id = NULL WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM tasks WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM customer_interviews WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM product_access WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

fn snapshot(product: &Product) -> ProductSnapshot {
    ProductSnapshot {
        name: product.name.clone(),
        iteration_number: product.iteration_number,
        research_document: product.research_document.clone(),
        prd_document: product.prd_document.clone(),
        summary_document: product.summary_document.clone(),
    }
}
