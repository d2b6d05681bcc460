// Resume intake: PDF preparation and candidate profile extraction.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod pdf;
pub mod prompts;
