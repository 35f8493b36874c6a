//! Pipeline state as an explicit value object.
//!
//! Every transition takes the current state by reference and returns the next
//! one; nothing is mutated in place and there are no ambient fields. The
//! caller keeps whichever state it wants to render or resume from.

use crate::domain::{ArtifactListing, BuildParameters, DownloadState, ImageRef, PromptMetadata, RepoRef};
use thiserror::Error;

/// Where the pipeline currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// Nothing listed yet.
    #[default]
    Idle,
    /// A listing exists (possibly empty).
    Listed,
    /// One artifact chosen from the current listing.
    Selected,
    /// The artifact is on disk.
    Downloaded,
    /// Prompt metadata is complete.
    MetadataResolved,
    /// Build parameters are fixed.
    Parameterized,
    /// The image exists locally.
    Built,
    /// The image carries its push reference.
    Tagged,
    /// The image is on the registry.
    Pushed,
    /// An external call failed; the failing operation is recorded.
    Failed(StageOp),
}

impl Stage {
    /// Whether the pipeline is in the absorbing failure state.
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// The externally-effectful pipeline operations, used to name failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOp {
    /// Listing repository files
    List,
    /// Downloading the selected artifact
    Download,
    /// Fetching and extracting documentation metadata
    ResolveMetadata,
    /// Registry login
    Login,
    /// Loading an image archive
    Load,
    /// Building the image
    Build,
    /// Tagging the image
    Tag,
    /// Pushing the image
    Push,
}

impl StageOp {
    /// Lowercase operation name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Download => "download",
            Self::ResolveMetadata => "resolve-metadata",
            Self::Login => "login",
            Self::Load => "load",
            Self::Build => "build",
            Self::Tag => "tag",
            Self::Push => "push",
        }
    }
}

impl std::fmt::Display for StageOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded stage failure: which operation, and the diagnostic text
/// captured from the external system, verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{op} failed: {diagnostic}")]
pub struct StageFailure {
    /// The operation that failed.
    pub op: StageOp,
    /// Human-readable diagnostic for display.
    pub diagnostic: String,
}

/// A required input was missing or malformed; the transition was rejected
/// before any external call was made and the caller's state is untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// Which input was rejected.
    pub field: &'static str,
    /// Why it was rejected.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The full pipeline state. A plain value: clone it, keep it, throw it away.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    /// Current stage.
    pub stage: Stage,
    /// Repository the listing was taken from.
    pub repo: Option<RepoRef>,
    /// Most recent artifact listing.
    pub listing: Option<ArtifactListing>,
    /// Path selected from the current listing.
    pub selected: Option<String>,
    /// Byte accounting for the (possibly partial) download.
    pub download: Option<DownloadState>,
    /// Extracted or manually supplied prompt metadata.
    pub metadata: Option<PromptMetadata>,
    /// Frozen build parameters.
    pub params: Option<BuildParameters>,
    /// Handle to the built/tagged image.
    pub image: Option<ImageRef>,
    /// Last stage failure, when `stage` is `Failed`.
    pub failure: Option<StageFailure>,
}

impl PipelineState {
    /// A fresh pipeline with nothing listed.
    pub fn new() -> Self {
        Self::default()
    }

    /// File name of the selected artifact (path without directories).
    pub fn selected_file_name(&self) -> Option<&str> {
        self.selected
            .as_deref()
            .map(crate::domain::path_file_name)
    }

    /// Whether metadata resolution still needs a manually entered prompt
    /// template.
    pub fn needs_prompt_template(&self) -> bool {
        self.metadata
            .as_ref()
            .is_some_and(|m| m.prompt_template.is_none())
    }

    /// Whether a reverse prompt could still be entered manually. Offered
    /// independently of the prompt template.
    pub fn wants_reverse_prompt(&self) -> bool {
        self.metadata
            .as_ref()
            .is_some_and(|m| m.reverse_prompt.is_none())
    }

    /// Absorb an external failure, keeping every resumable input intact.
    pub(crate) fn failed(mut self, op: StageOp, diagnostic: impl Into<String>) -> Self {
        self.stage = Stage::Failed(op);
        self.failure = Some(StageFailure {
            op,
            diagnostic: diagnostic.into(),
        });
        self
    }

    /// Advance to `stage`, clearing any recorded failure.
    pub(crate) fn advanced(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self.failure = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = PipelineState::new();
        assert_eq!(state.stage, Stage::Idle);
        assert!(state.repo.is_none());
        assert!(state.failure.is_none());
    }

    #[test]
    fn test_failed_records_diagnostic() {
        let state = PipelineState::new().failed(StageOp::Download, "connection reset");
        assert_eq!(state.stage, Stage::Failed(StageOp::Download));
        assert!(state.stage.is_failed());
        let failure = state.failure.unwrap();
        assert_eq!(failure.op, StageOp::Download);
        assert_eq!(failure.diagnostic, "connection reset");
    }

    #[test]
    fn test_advanced_clears_failure() {
        let state = PipelineState::new()
            .failed(StageOp::List, "boom")
            .advanced(Stage::Listed);
        assert_eq!(state.stage, Stage::Listed);
        assert!(state.failure.is_none());
    }

    #[test]
    fn test_selected_file_name_strips_directories() {
        let state = PipelineState {
            selected: Some("Q4_K_M/model.Q4_K_M.gguf".to_string()),
            ..PipelineState::new()
        };
        assert_eq!(state.selected_file_name(), Some("model.Q4_K_M.gguf"));
    }

    #[test]
    fn test_stage_failure_display() {
        let failure = StageFailure {
            op: StageOp::Login,
            diagnostic: "unauthorized".to_string(),
        };
        assert_eq!(failure.to_string(), "login failed: unauthorized");
    }
}
