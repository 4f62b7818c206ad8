// Text artifacts derived from a vacancy record: job ad, interview guide,
// revisions, boolean search string and skill suggestions.
// All model calls go through llm_client via the gateway.

pub mod boolean_query;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod suggestions;
