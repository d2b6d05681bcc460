// Interview engine: the four-phase script and the agent that drives it.
// All LLM calls go through llm_client.

pub mod agent;
pub mod handlers;
pub mod phases;
pub mod prompts;
