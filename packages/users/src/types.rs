// ABOUTME: User type definitions
// ABOUTME: Structures for user accounts and profile updates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub timezone: Option<String>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreateInput {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub timezone: Option<String>,
}

/// Self-service profile edits; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfileUpdate {
    pub display_name: Option<String>,
    pub timezone: Option<String>,
}
