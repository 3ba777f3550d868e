mod client;
mod responses;

pub use client::{GeminiClient, DEFAULT_MODEL, GEMINI_API_BASE};
pub use responses::{Candidate, CandidateContent, GenerateContentResponse, Part, PromptFeedback, UsageMetadata};
