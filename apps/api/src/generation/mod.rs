// Cover Letter Generation — prompt assembly, the Gemini call, response salvage.
// All LLM calls go through llm_client — no direct Gemini API calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
