// ABOUTME: Product type definitions
// ABOUTME: Lifecycle/phase enums, product rows, and iteration context snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Discovery,
    InProgress,
    Launched,
    Archived,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Discovery
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Completed,
    Skipped,
}

impl Default for PhaseStatus {
    fn default() -> Self {
        PhaseStatus::NotStarted
    }
}

/// Document slots a product carries, one per drafting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Research,
    Prd,
    Summary,
}

impl DocumentKind {
    /// Column holding the document text.
    pub fn document_column(&self) -> &'static str {
        match self {
            DocumentKind::Research => "research_document",
            DocumentKind::Prd => "prd_document",
            DocumentKind::Summary => "summary_document",
        }
    }

    /// Phase-status column completed together with the document write.
    pub fn status_column(&self) -> &'static str {
        match self {
            DocumentKind::Research => "research_status",
            DocumentKind::Prd => "design_status",
            DocumentKind::Summary => "launch_status",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = crate::error::ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "research" => Ok(DocumentKind::Research),
            "prd" => Ok(DocumentKind::Prd),
            "summary" => Ok(DocumentKind::Summary),
            other => Err(crate::error::ProductError::InvalidInput(format!(
                "unknown document kind: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub status: ProductStatus,
    pub archived: bool,
    pub progress: i64,

    // Hierarchy
    pub parent_id: Option<String>,
    pub iteration_number: i64,

    // Per-phase bookkeeping (inert pass-through)
    pub research_status: PhaseStatus,
    pub design_status: PhaseStatus,
    pub development_status: PhaseStatus,
    pub launch_status: PhaseStatus,

    // Opaque document blobs
    pub research_document: Option<String>,
    pub prd_document: Option<String>,
    pub summary_document: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreateInput {
    pub name: String,
    pub status: Option<ProductStatus>,
    pub progress: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdateInput {
    pub name: Option<String>,
    pub status: Option<ProductStatus>,
    pub archived: Option<bool>,
    pub progress: Option<i64>,
    pub research_status: Option<PhaseStatus>,
    pub design_status: Option<PhaseStatus>,
    pub development_status: Option<PhaseStatus>,
    pub launch_status: Option<PhaseStatus>,
    pub research_document: Option<String>,
    pub prd_document: Option<String>,
    pub summary_document: Option<String>,
}

/// Read-only view of a related product used to enrich AI prompts.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub iteration_number: i64,
    pub research_document: Option<String>,
    pub prd_document: Option<String>,
    pub summary_document: Option<String>,
}

/// Cross-iteration context: the parent plus sibling iterations.
///
/// Empty for root products. Sibling order is unspecified.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IterationContext {
    pub parent: Option<ProductSnapshot>,
    pub siblings: Vec<ProductSnapshot>,
}

impl IterationContext {
    pub fn is_empty(&self) -> bool {
        self.parent.is_none() && self.siblings.is_empty()
    }
}
