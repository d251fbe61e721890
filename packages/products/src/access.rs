// ABOUTME: Access Control Evaluator and grant-table operations
// ABOUTME: Gates every product-scoped operation on (caller, product, minimum role)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::{ProductError, ProductResult};
use crate::storage::row_to_product;
use crate::types::Product;

/// Collaboration role on a product. The derived `Ord` gives the strict
/// total order viewer < editor < owner used by the evaluator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Editor,
    Owner,
}

impl std::str::FromStr for Role {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "owner" => Ok(Role::Owner),
            other => Err(ProductError::InvalidInput(format!(
                "unknown role: {}",
                other
            ))),
        }
    }
}

/// A grant record: one user, one role, one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAccess {
    pub product_id: String,
    pub user_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Decides allow/deny for (caller, product, minimum required role) and
/// manages the grant table behind owner-gated operations.
pub struct AccessEvaluator {
    pool: SqlitePool,
}

impl AccessEvaluator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Core authorization gate. Pure read, idempotent.
    ///
    /// Ownership short-circuits: the product's owner passes every check even
    /// when the grant table carries a stale or missing row for them. On
    /// success the product is returned so callers avoid a second lookup.
    pub async fn evaluate(
        &self,
        user_id: &str,
        product_id: &str,
        required_role: Role,
    ) -> ProductResult<Product> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        let product = match row {
            Some(r) => row_to_product(&r)?,
            None => return Err(ProductError::NotFound),
        };

        if product.owner_user_id == user_id {
            return Ok(product);
        }

        let granted = self.get_grant(product_id, user_id).await?;

        match granted {
            None => {
                debug!(
                    "Access denied: user {} has no role on product {}",
                    user_id, product_id
                );
                Err(ProductError::Forbidden("no role on this product".to_string()))
            }
            Some(grant) if grant.role >= required_role => Ok(product),
            Some(grant) => {
                debug!(
                    "Access denied: user {} has role {:?} on product {}, {:?} required",
                    user_id, grant.role, product_id, required_role
                );
                Err(ProductError::Forbidden("insufficient role".to_string()))
            }
        }
    }

    pub async fn get_grant(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> ProductResult<Option<ProductAccess>> {
        let row = sqlx::query(
            "SELECT * FROM product_access WHERE product_id = ? AND user_id = ?",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_grant(&r)).transpose()
    }

    /// Grants visible to anyone with at least viewer access.
    pub async fn list_grants(
        &self,
        actor_id: &str,
        product_id: &str,
    ) -> ProductResult<Vec<ProductAccess>> {
        self.evaluate(actor_id, product_id, Role::Viewer).await?;

        let rows = sqlx::query("SELECT * FROM product_access WHERE product_id = ?")
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_grant).collect()
    }

    /// Invite a user onto a product. Owner-gated; a second invite for the
    /// same user is a conflict, never a silent overwrite.
    pub async fn invite(
        &self,
        actor_id: &str,
        product_id: &str,
        target_user_id: &str,
        role: Role,
    ) -> ProductResult<ProductAccess> {
        self.evaluate(actor_id, product_id, Role::Owner).await?;

        let target_exists = sqlx::query("SELECT id FROM users WHERE id = ?")
            .bind(target_user_id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !target_exists {
            return Err(ProductError::NotFound);
        }

        if self.get_grant(product_id, target_user_id).await?.is_some() {
            return Err(ProductError::Conflict(
                "user already has access".to_string(),
            ));
        }

        let now = Utc::now();
        let insert = sqlx::query(
            r#"
            INSERT INTO product_access (product_id, user_id, role, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(product_id)
        .bind(target_user_id)
        .bind(role)
        .bind(now)
        .execute(&self.pool)
        .await;

        if let Err(e) = insert {
            if is_unique_violation(&e) {
                return Err(ProductError::Conflict(
                    "user already has access".to_string(),
                ));
            }
            return Err(e.into());
        }

        info!(
            "Granted {:?} on product {} to user {}",
            role, product_id, target_user_id
        );

        self.get_grant(product_id, target_user_id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Change an existing grant's role. Self-targeting is rejected before
    /// any role check; ownership transfer is a separate flow.
    pub async fn update_role(
        &self,
        actor_id: &str,
        product_id: &str,
        target_user_id: &str,
        role: Role,
    ) -> ProductResult<ProductAccess> {
        if actor_id == target_user_id {
            return Err(ProductError::InvalidOperation(
                "cannot change your own role".to_string(),
            ));
        }

        self.evaluate(actor_id, product_id, Role::Owner).await?;

        let result = sqlx::query(
            "UPDATE product_access SET role = ? WHERE product_id = ? AND user_id = ?",
        )
        .bind(role)
        .bind(product_id)
        .bind(target_user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound);
        }

        info!(
            "Changed role of user {} on product {} to {:?}",
            target_user_id, product_id, role
        );

        self.get_grant(product_id, target_user_id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Revoke a grant. Self-targeting is rejected before any role check.
    pub async fn revoke(
        &self,
        actor_id: &str,
        product_id: &str,
        target_user_id: &str,
    ) -> ProductResult<()> {
        if actor_id == target_user_id {
            return Err(ProductError::InvalidOperation(
                "cannot remove your own access".to_string(),
            ));
        }

        self.evaluate(actor_id, product_id, Role::Owner).await?;

        let result = sqlx::query(
            "DELETE FROM product_access WHERE product_id = ? AND user_id = ?",
        )
        .bind(product_id)
        .bind(target_user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound);
        }

        info!(
            "Revoked access of user {} on product {}",
            target_user_id, product_id
        );

        Ok(())
    }
}

pub(crate) fn row_to_grant(row: &sqlx::sqlite::SqliteRow) -> ProductResult<ProductAccess> {
    Ok(ProductAccess {
        product_id: row.try_get("product_id")?,
        user_id: row.try_get("user_id")?,
        role: row.try_get("role")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
