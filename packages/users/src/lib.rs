// ABOUTME: User account management for Canopy
// ABOUTME: Provides types and storage layer for users and profile edits

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

// Re-export main types
pub use storage::UserStorage;
pub use types::{User, UserCreateInput, UserProfileUpdate};
