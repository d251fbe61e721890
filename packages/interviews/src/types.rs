// ABOUTME: Interview type definitions
// ABOUTME: Customer interview rows and user-owned templates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInterview {
    pub id: String,
    pub product_id: String,
    pub interviewee: String,
    pub notes: Option<String>,
    pub conducted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewCreateInput {
    pub interviewee: String,
    pub notes: Option<String>,
    pub conducted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewUpdateInput {
    pub interviewee: Option<String>,
    pub notes: Option<String>,
    pub conducted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewTemplate {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub questions: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateCreateInput {
    pub name: String,
    pub questions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateUpdateInput {
    pub name: Option<String>,
    pub questions: Option<Vec<String>>,
}
