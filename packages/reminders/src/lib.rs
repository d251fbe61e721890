// ABOUTME: Reminder management for Canopy users
// ABOUTME: Reminders belong to a user and may reference a product or task

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::ReminderStorage;
pub use types::{Reminder, ReminderCreateInput, ReminderUpdateInput};
