// Shared prompt fragments.
// Each module that calls the model keeps its own prompts.rs alongside it;
// this file only holds cross-cutting pieces.

/// Appended to a system prompt when the reply must be a bare JSON object.
pub const JSON_OBJECT_SUFFIX: &str = " Respond ONLY with a JSON object.";

/// Common guard for anything written for candidates.
pub const INCLUSIVE_LANGUAGE_INSTRUCTION: &str = "Avoid discriminatory language.";

/// Renders the language hint line every generation prompt starts with.
pub fn language_line(lang: &str) -> String {
    format!("Language: {lang}")
}
