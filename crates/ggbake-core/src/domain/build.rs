//! Image build parameters and references.

use super::artifact::PromptMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Build argument carrying the downloaded model file name.
pub const ARG_CHAT_MODEL_FILE: &str = "CHAT_MODEL_FILE";
/// Build argument carrying the prompt template name.
pub const ARG_PROMPT_TEMPLATE: &str = "PROMPT_TEMPLATE";
/// Build argument carrying the reverse prompt.
pub const ARG_REVERSE_TEMPLATE: &str = "REVERSE_TEMPLATE";

/// Everything an image build needs. Constructed once per build invocation and
/// never mutated, only rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParameters {
    /// Tag for the built image.
    pub image_tag: String,
    /// `--build-arg` values, keyed deterministically.
    pub build_args: BTreeMap<String, String>,
    /// Directory containing the build definition.
    pub build_context: PathBuf,
    /// Target platform string (`os/arch`).
    pub platform: String,
}

impl BuildParameters {
    /// Derive build parameters for a downloaded artifact.
    ///
    /// `build_args` always carries the model file name; the prompt template
    /// and reverse prompt are included only when present and non-empty.
    pub fn for_artifact(
        image_tag: impl Into<String>,
        model_file_name: &str,
        metadata: &PromptMetadata,
        build_context: impl Into<PathBuf>,
        platform: impl Into<String>,
    ) -> Self {
        let mut build_args = BTreeMap::new();
        build_args.insert(ARG_CHAT_MODEL_FILE.to_string(), model_file_name.to_string());
        if let Some(template) = metadata.prompt_template.as_deref().filter(|s| !s.is_empty()) {
            build_args.insert(ARG_PROMPT_TEMPLATE.to_string(), template.to_string());
        }
        if let Some(reverse) = metadata.reverse_prompt.as_deref().filter(|s| !s.is_empty()) {
            build_args.insert(ARG_REVERSE_TEMPLATE.to_string(), reverse.to_string());
        }

        Self {
            image_tag: image_tag.into(),
            build_args,
            build_context: build_context.into(),
            platform: platform.into(),
        }
    }
}

/// Opaque reference to a built or loaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap an image reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_with_full_metadata() {
        let metadata = PromptMetadata {
            prompt_template: Some("chatml".to_string()),
            reverse_prompt: Some("<|im_end|>".to_string()),
        };
        let params = BuildParameters::for_artifact(
            "user/qwen:latest",
            "model.Q4_K_M.gguf",
            &metadata,
            ".",
            "linux/arm64",
        );

        assert_eq!(
            params.build_args.get(ARG_CHAT_MODEL_FILE).map(String::as_str),
            Some("model.Q4_K_M.gguf")
        );
        assert_eq!(
            params.build_args.get(ARG_PROMPT_TEMPLATE).map(String::as_str),
            Some("chatml")
        );
        assert_eq!(
            params.build_args.get(ARG_REVERSE_TEMPLATE).map(String::as_str),
            Some("<|im_end|>")
        );
        assert_eq!(params.platform, "linux/arm64");
    }

    #[test]
    fn test_build_args_omit_absent_fields() {
        let metadata = PromptMetadata {
            prompt_template: Some("chatml".to_string()),
            reverse_prompt: None,
        };
        let params = BuildParameters::for_artifact(
            "user/qwen:latest",
            "model.Q4_K_M.gguf",
            &metadata,
            ".",
            "linux/arm64",
        );

        assert_eq!(params.build_args.len(), 2);
        assert!(!params.build_args.contains_key(ARG_REVERSE_TEMPLATE));
    }

    #[test]
    fn test_build_args_deterministic_order() {
        let metadata = PromptMetadata {
            prompt_template: Some("llama-2".to_string()),
            reverse_prompt: Some("User:".to_string()),
        };
        let params =
            BuildParameters::for_artifact("t", "m.gguf", &metadata, ".", "linux/amd64");
        let keys: Vec<&str> = params.build_args.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![ARG_CHAT_MODEL_FILE, ARG_PROMPT_TEMPLATE, ARG_REVERSE_TEMPLATE]
        );
    }
}
