// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to a service's system prompt when a JSON payload is expected.
pub const JSON_ONLY_SUFFIX: &str = "Your entire reply is parsed by a program. \
    Output the JSON value and nothing else.";

/// Joins a service system prompt with a shared suffix.
pub fn with_suffix(system: &str, suffix: &str) -> String {
    format!("{} {}", system.trim_end(), suffix)
}
