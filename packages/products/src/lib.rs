// ABOUTME: Product forest and access-control core for Canopy
// ABOUTME: Role evaluation gates every product-scoped operation

pub mod access;
pub mod error;
pub mod hierarchy;
pub mod storage;
pub mod types;

#[cfg(test)]
mod access_test;
#[cfg(test)]
mod test_support;

// Re-export main types
pub use access::{AccessEvaluator, ProductAccess, Role};
pub use error::{ProductError, ProductResult};
pub use hierarchy::HierarchyManager;
pub use storage::ProductStorage;
pub use types::{
    DocumentKind, IterationContext, PhaseStatus, Product, ProductCreateInput, ProductSnapshot,
    ProductStatus, ProductUpdateInput,
};
