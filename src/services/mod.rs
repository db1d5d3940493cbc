pub mod extractor;
pub mod llm_service;
pub mod prompts;

pub use extractor::{extract, StructuredPayload};
pub use llm_service::{Generation, LlmService, StructuredGeneration};
