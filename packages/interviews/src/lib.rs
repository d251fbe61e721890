// ABOUTME: Customer interview records and reusable interview templates
// ABOUTME: Interviews belong to a product; templates belong to a user

pub mod storage;
pub mod templates;
pub mod types;

// Re-export main types
pub use storage::InterviewStorage;
pub use templates::TemplateStorage;
pub use types::{
    CustomerInterview, InterviewCreateInput, InterviewTemplate, InterviewUpdateInput,
    TemplateCreateInput, TemplateUpdateInput,
};
