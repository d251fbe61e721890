// ABOUTME: Task tracking for Canopy products
// ABOUTME: Provides types and storage layer for product-scoped tasks

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::TaskStorage;
pub use types::{Task, TaskCreateInput, TaskStatus, TaskUpdateInput};
