// ABOUTME: AI integration for Canopy document drafting
// ABOUTME: Gemini client plus prompt builders for research, PRD, and summary documents

pub mod prompts;
pub mod service;

// Re-export main types
pub use service::{AiService, AiServiceError, AiServiceResult};
