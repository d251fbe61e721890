// ABOUTME: Reminder type definitions
// ABOUTME: User-owned reminders with optional product/task links

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub product_id: Option<String>,
    pub task_id: Option<String>,
    pub message: String,
    pub remind_at: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderCreateInput {
    pub message: String,
    pub remind_at: DateTime<Utc>,
    pub product_id: Option<String>,
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderUpdateInput {
    pub message: Option<String>,
    pub remind_at: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}
