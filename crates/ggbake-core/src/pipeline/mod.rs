//! The artifact pipeline: a linear wizard from repository listing to a
//! pushed image.
//!
//! Each transition is `(state, input) -> Result<state, ValidationError>`.
//! Missing or malformed inputs are rejected with `Err` before any external
//! call; external failures are absorbed into a returned [`Stage::Failed`]
//! state that keeps every resumable input, so re-invoking the same transition
//! retries it. The pipeline holds no state of its own; it is re-entrant per
//! caller action, one action at a time.

mod state;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::domain::{ArtifactListing, BuildParameters, DownloadState, ImageRef, PromptMetadata, RepoRef};
use crate::ports::{
    BuildLogSinkPort, ImageToolchainPort, ProgressFn, RegistryClientPort, RegistryCredentials,
};

pub use state::{PipelineState, Stage, StageFailure, StageOp, ValidationError};

/// File fetched from the repository for prompt metadata.
const DOCUMENTATION_FILE: &str = "README.md";

// ============================================================================
// Configuration
// ============================================================================

/// Static pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// File extension artifacts are filtered to (without the dot).
    pub artifact_extension: String,
    /// Target platform for image builds (`os/arch`).
    pub platform: String,
    /// Directory holding the build definition.
    pub build_context: PathBuf,
    /// Directory downloads are written into.
    pub download_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifact_extension: "gguf".to_string(),
            platform: "linux/arm64".to_string(),
            build_context: PathBuf::from("."),
            download_dir: PathBuf::from("."),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter artifacts to a different file extension (without the dot).
    #[must_use]
    pub fn with_artifact_extension(mut self, extension: impl Into<String>) -> Self {
        self.artifact_extension = extension.into();
        self
    }

    /// Set the image build target platform.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Set the build context directory.
    #[must_use]
    pub fn with_build_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.build_context = context.into();
        self
    }

    /// Set the download destination directory.
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    fn matches_extension(&self, path: &str) -> bool {
        std::path::Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.artifact_extension))
    }
}

// ============================================================================
// Publish flow
// ============================================================================

/// Inputs for the standalone publish flow: login, load an image archive,
/// tag it, push it.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Registry credentials.
    pub credentials: RegistryCredentials,
    /// Image archive to load.
    pub archive: PathBuf,
    /// Full target reference (`name:tag`).
    pub target: String,
}

/// Why a publish run stopped.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// A required input was missing; nothing was invoked.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A toolchain step failed; later steps were never invoked.
    #[error(transparent)]
    Stage(#[from] StageFailure),
}

// ============================================================================
// Pipeline
// ============================================================================

/// Orchestrates the registry and toolchain ports through the wizard stages.
pub struct ArtifactPipeline {
    registry: Arc<dyn RegistryClientPort>,
    toolchain: Arc<dyn ImageToolchainPort>,
    config: PipelineConfig,
}

impl ArtifactPipeline {
    /// Wire a pipeline up to its collaborators.
    pub fn new(
        registry: Arc<dyn RegistryClientPort>,
        toolchain: Arc<dyn ImageToolchainPort>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            toolchain,
            config,
        }
    }

    /// Pipeline configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// `list`: fetch the repository's files and keep those matching the
    /// artifact extension.
    ///
    /// A new listing supersedes the previous one and transitively drops the
    /// selection, download, metadata, and parameters. An empty listing is a
    /// normal `Listed` outcome.
    pub async fn list(
        &self,
        state: &PipelineState,
        repo: &RepoRef,
    ) -> Result<PipelineState, ValidationError> {
        if !repo.is_valid() {
            return Err(ValidationError::new(
                "repository",
                "repository id must be owner/name",
            ));
        }

        debug!(repo = %repo, revision = %repo.revision, "listing repository files");
        match self.registry.list_files(repo).await {
            Ok(files) => {
                let matching: Vec<String> = files
                    .into_iter()
                    .filter(|f| self.config.matches_extension(f))
                    .collect();
                info!(repo = %repo, count = matching.len(), "listing complete");
                // Fresh state: everything derived from the old listing is stale now.
                Ok(PipelineState {
                    repo: Some(repo.clone()),
                    listing: Some(ArtifactListing::new(repo.clone(), matching)),
                    ..PipelineState::new()
                }
                .advanced(Stage::Listed))
            }
            Err(e) => {
                warn!(repo = %repo, error = %e, "listing failed");
                Ok(state.clone().failed(StageOp::List, e.to_string()))
            }
        }
    }

    /// `select`: choose one artifact out of the current listing.
    ///
    /// Paths not in the listing are rejected; a selection never outlives the
    /// listing it was made from.
    pub fn select(
        &self,
        state: &PipelineState,
        path: &str,
    ) -> Result<PipelineState, ValidationError> {
        let listing = state
            .listing
            .as_ref()
            .ok_or_else(|| ValidationError::new("listing", "list files before selecting"))?;
        if !listing.contains(path) {
            return Err(ValidationError::new(
                "selection",
                format!("'{path}' is not in the current listing"),
            ));
        }

        let mut next = state.clone();
        next.selected = Some(path.to_string());
        // Downstream stages belong to the previous selection.
        next.download = None;
        next.metadata = None;
        next.params = None;
        next.image = None;
        Ok(next.advanced(Stage::Selected))
    }

    /// `download`: stream the selected artifact to the download directory,
    /// reporting progress after each chunk.
    ///
    /// Re-invoking is always possible and overwrites the destination
    /// deterministically; after a failure a partial file may remain on disk
    /// and the selection is kept as the resumable point.
    pub async fn download(
        &self,
        state: &PipelineState,
        on_progress: ProgressFn<'_>,
    ) -> Result<PipelineState, ValidationError> {
        let repo = state
            .repo
            .clone()
            .ok_or_else(|| ValidationError::new("repository", "list files before downloading"))?;
        let selected = state
            .selected
            .clone()
            .ok_or_else(|| ValidationError::new("selection", "select an artifact first"))?;
        let file_name = state
            .selected_file_name()
            .unwrap_or(selected.as_str())
            .to_string();
        let destination = self.config.download_dir.join(&file_name);

        // Track byte accounting alongside the caller's own callback.
        let accounting = Mutex::new(DownloadState::new(destination.clone()));
        let observe: ProgressFn<'_> = &|downloaded, total| {
            if let Ok(mut acc) = accounting.lock() {
                acc.observe(downloaded, total);
            }
            on_progress(downloaded, total);
        };

        info!(repo = %repo, file = %selected, "downloading artifact");
        let result = self
            .registry
            .fetch_file(&repo, &selected, &destination, observe)
            .await;
        let download = accounting
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match result {
            Ok(bytes) => {
                info!(file = %file_name, bytes, "download complete");
                let mut next = state.clone();
                next.download = Some(download);
                Ok(next.advanced(Stage::Downloaded))
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "download failed");
                let mut next = state.clone();
                // Partial file accounting is kept for display; the selection
                // stays valid so the download can simply be retried.
                next.download = Some(download);
                Ok(next.failed(StageOp::Download, e.to_string()))
            }
        }
    }

    /// `resolve_metadata`: fetch the repository documentation and extract the
    /// prompt fields.
    ///
    /// When the prompt template was extracted the pipeline advances to
    /// `MetadataResolved`; otherwise the state keeps its `Downloaded` stage
    /// and [`PipelineState::needs_prompt_template`] reports the required-input
    /// gate; supply the missing fields via [`Self::supply_metadata`]. Each
    /// field's manual fallback is independent of the other.
    pub async fn resolve_metadata(
        &self,
        state: &PipelineState,
    ) -> Result<PipelineState, ValidationError> {
        let repo = state
            .repo
            .clone()
            .ok_or_else(|| ValidationError::new("repository", "list files before resolving metadata"))?;
        // Partial accounting from a failed download also lives in
        // `state.download`, so the stage is part of the gate.
        if state.download.is_none() || state.stage == Stage::Failed(StageOp::Download) {
            return Err(ValidationError::new(
                "download",
                "download the artifact before resolving metadata",
            ));
        }

        debug!(repo = %repo, file = DOCUMENTATION_FILE, "fetching documentation");
        match self.registry.fetch_text(&repo, DOCUMENTATION_FILE).await {
            Ok(content) => {
                let metadata = PromptMetadata::from_readme(&content);
                debug!(
                    template = metadata.prompt_template.as_deref().unwrap_or("<none>"),
                    reverse = metadata.reverse_prompt.as_deref().unwrap_or("<none>"),
                    "extracted prompt metadata"
                );
                let resolved = metadata.prompt_template.is_some();
                let mut next = state.clone();
                next.metadata = Some(metadata);
                if resolved {
                    Ok(next.advanced(Stage::MetadataResolved))
                } else {
                    // Required-input gate, not a failure: the caller must
                    // supply the template before the pipeline advances.
                    Ok(next.advanced(Stage::Downloaded))
                }
            }
            Err(e) => {
                warn!(repo = %repo, error = %e, "documentation fetch failed");
                Ok(state.clone().failed(StageOp::ResolveMetadata, e.to_string()))
            }
        }
    }

    /// Merge manually entered prompt fields into the extracted metadata.
    ///
    /// Extracted values win; each field falls back independently. The
    /// pipeline advances once a prompt template is present.
    pub fn supply_metadata(
        &self,
        state: &PipelineState,
        prompt_template: Option<&str>,
        reverse_prompt: Option<&str>,
    ) -> Result<PipelineState, ValidationError> {
        let metadata = state
            .metadata
            .clone()
            .ok_or_else(|| ValidationError::new("metadata", "resolve metadata first"))?
            .or_manual(prompt_template, reverse_prompt);
        if metadata.prompt_template.is_none() {
            return Err(ValidationError::new(
                "prompt_template",
                "a prompt template is required",
            ));
        }

        let mut next = state.clone();
        next.metadata = Some(metadata);
        Ok(next.advanced(Stage::MetadataResolved))
    }

    /// `parameterize`: freeze the build parameters for the downloaded
    /// artifact. Requires a non-empty image tag and resolved metadata.
    pub fn parameterize(
        &self,
        state: &PipelineState,
        image_tag: &str,
    ) -> Result<PipelineState, ValidationError> {
        let image_tag = image_tag.trim();
        if image_tag.is_empty() {
            return Err(ValidationError::new("image_tag", "an image tag is required"));
        }
        let file_name = state
            .selected_file_name()
            .ok_or_else(|| ValidationError::new("selection", "select an artifact first"))?
            .to_string();
        let metadata = state
            .metadata
            .as_ref()
            .filter(|m| m.prompt_template.is_some())
            .ok_or_else(|| ValidationError::new("metadata", "resolve metadata first"))?;

        let params = BuildParameters::for_artifact(
            image_tag,
            &file_name,
            metadata,
            self.config.build_context.clone(),
            self.config.platform.clone(),
        );
        let mut next = state.clone();
        next.params = Some(params);
        Ok(next.advanced(Stage::Parameterized))
    }

    /// `build`: invoke the image build with the frozen parameters, streaming
    /// log lines to `logs`. Success carries the image handle forward.
    pub async fn build(
        &self,
        state: &PipelineState,
        logs: Arc<dyn BuildLogSinkPort>,
    ) -> Result<PipelineState, ValidationError> {
        let params = state
            .params
            .clone()
            .ok_or_else(|| ValidationError::new("parameters", "parameterize the build first"))?;

        info!(tag = %params.image_tag, platform = %params.platform, "building image");
        match self.toolchain.build(&params, logs).await {
            Ok(image) => {
                info!(image = %image, "image built");
                let mut next = state.clone();
                next.image = Some(image);
                Ok(next.advanced(Stage::Built))
            }
            Err(e) => {
                warn!(tag = %params.image_tag, error = %e, "image build failed");
                Ok(state.clone().failed(StageOp::Build, e.to_string()))
            }
        }
    }

    /// `tag`: apply a push reference to the built image. Gated behind an
    /// explicit caller action, never chained implicitly.
    pub async fn tag(
        &self,
        state: &PipelineState,
        target: &str,
    ) -> Result<PipelineState, ValidationError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ValidationError::new("target", "a target reference is required"));
        }
        let image = state
            .image
            .clone()
            .ok_or_else(|| ValidationError::new("image", "build an image first"))?;

        match self.toolchain.tag(&image, target).await {
            Ok(tagged) => {
                let mut next = state.clone();
                next.image = Some(tagged);
                Ok(next.advanced(Stage::Tagged))
            }
            Err(e) => {
                warn!(reference = target, error = %e, "tagging failed");
                Ok(state.clone().failed(StageOp::Tag, e.to_string()))
            }
        }
    }

    /// `push`: push the tagged image to its registry. Gated behind an
    /// explicit caller action.
    pub async fn push(&self, state: &PipelineState) -> Result<PipelineState, ValidationError> {
        let image = state
            .image
            .clone()
            .ok_or_else(|| ValidationError::new("image", "build and tag an image first"))?;

        info!(image = %image, "pushing image");
        match self.toolchain.push(&image).await {
            Ok(()) => Ok(state.clone().advanced(Stage::Pushed)),
            Err(e) => {
                warn!(image = %image, error = %e, "push failed");
                Ok(state.clone().failed(StageOp::Push, e.to_string()))
            }
        }
    }

    /// The standalone publish flow: login, load an image archive, tag it,
    /// push it. Stops at the first failing step; later steps are never
    /// invoked.
    pub async fn publish(&self, request: &PublishRequest) -> Result<ImageRef, PublishError> {
        if request.credentials.username.is_empty() {
            return Err(ValidationError::new("username", "a username is required").into());
        }
        let target = request.target.trim();
        if target.is_empty() {
            return Err(ValidationError::new("target", "a target reference is required").into());
        }

        info!(username = %request.credentials.username, "logging in to registry");
        self.toolchain
            .login(&request.credentials)
            .await
            .map_err(|e| StageFailure {
                op: StageOp::Login,
                diagnostic: e.to_string(),
            })?;

        info!(archive = %request.archive.display(), "loading image archive");
        let loaded = self
            .toolchain
            .load(&request.archive)
            .await
            .map_err(|e| StageFailure {
                op: StageOp::Load,
                diagnostic: e.to_string(),
            })?;
        // When the toolchain does not report what it loaded, fall back to the
        // target's repository part, which is what the archive is expected to
        // contain.
        let source = loaded.unwrap_or_else(|| {
            ImageRef::new(target.split(':').next().unwrap_or(target))
        });

        let tagged = self
            .toolchain
            .tag(&source, target)
            .await
            .map_err(|e| StageFailure {
                op: StageOp::Tag,
                diagnostic: e.to_string(),
            })?;

        self.toolchain.push(&tagged).await.map_err(|e| StageFailure {
            op: StageOp::Push,
            diagnostic: e.to_string(),
        })?;

        info!(image = %tagged, "image published");
        Ok(tagged)
    }
}
