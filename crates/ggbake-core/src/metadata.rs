//! Prompt metadata extraction from repository documentation.
//!
//! Model repositories document their prompt convention as single lines of the
//! form ``Prompt type: `chatml` `` inside `README.md`. Extraction is a plain
//! pattern match: absence of a field is a normal outcome, never an error.

use crate::domain::PromptMetadata;
use regex::Regex;

/// Label for the prompt template field.
pub const PROMPT_TYPE_LABEL: &str = "Prompt type";
/// Label for the reverse prompt field.
pub const REVERSE_PROMPT_LABEL: &str = "Reverse prompt";

/// Extract the first backtick-delimited value labeled `label`.
///
/// Matches the literal pattern ``Label: `value` ``: case-sensitive on the
/// label, value confined to one line. Returns `None` when no line matches.
pub fn extract_field(content: &str, label: &str) -> Option<String> {
    let pattern = format!(r"{}: `([^`\n]+)`", regex::escape(label));
    let re = Regex::new(&pattern).expect("escaped label always forms a valid pattern");
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl PromptMetadata {
    /// Extract both prompt fields from documentation text.
    pub fn from_readme(content: &str) -> Self {
        Self {
            prompt_template: extract_field(content, PROMPT_TYPE_LABEL),
            reverse_prompt: extract_field(content, REVERSE_PROMPT_LABEL),
        }
    }
}
