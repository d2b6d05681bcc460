// Assessment & scoring of interview transcripts.
// All LLM calls go through llm_client.

pub mod engine;
pub mod handlers;
pub mod prompts;
