//! Artifact listings, download accounting, and prompt metadata.

use super::repo::RepoRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Compute a whole-number progress percentage.
///
/// Returns `None` when the total is unknown (indeterminate progress) or zero;
/// a percentage is never fabricated. Otherwise the result is
/// `floor(100 * downloaded / total)` clamped to `[0, 100]`.
pub fn progress_percent(downloaded: u64, total: Option<u64>) -> Option<u8> {
    match total {
        Some(total) if total > 0 => {
            #[allow(clippy::cast_possible_truncation)] // clamped to <= 100
            let pct = (downloaded.saturating_mul(100) / total).min(100) as u8;
            Some(pct)
        }
        _ => None,
    }
}

/// The files of one repository at one revision, filtered to the artifact
/// extension the pipeline is configured for.
///
/// A listing is produced once per `list` action and superseded wholesale by
/// the next one; selections are only valid against the listing they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactListing {
    /// The repository this listing was taken from.
    pub repo: RepoRef,
    /// Matching file paths, in registry order. May be empty.
    pub files: Vec<String>,
}

impl ArtifactListing {
    /// Create a listing for a repository.
    pub fn new(repo: RepoRef, files: Vec<String>) -> Self {
        Self { repo, files }
    }

    /// Whether the listing has no matching artifacts.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether `path` belongs to this listing.
    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
    }
}

/// Byte-level accounting for a single download.
///
/// `bytes_downloaded` only ever grows during one download; `bytes_total`
/// stays `None` for the whole call when the server does not report a length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadState {
    /// Bytes written to the destination so far.
    pub bytes_downloaded: u64,
    /// Expected total, when the server reported one.
    pub bytes_total: Option<u64>,
    /// Where the artifact is being written.
    pub destination: PathBuf,
}

impl DownloadState {
    /// Start accounting for a download into `destination`.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            bytes_downloaded: 0,
            bytes_total: None,
            destination: destination.into(),
        }
    }

    /// Record an observed progress point. Byte counts never move backwards.
    pub fn observe(&mut self, downloaded: u64, total: Option<u64>) {
        self.bytes_downloaded = self.bytes_downloaded.max(downloaded);
        if total.is_some() {
            self.bytes_total = total;
        }
    }

    /// Current percentage, or `None` while the total is unknown.
    pub fn percent(&self) -> Option<u8> {
        progress_percent(self.bytes_downloaded, self.bytes_total)
    }

    /// Whether the known total has been fully downloaded.
    pub fn is_complete(&self) -> bool {
        self.bytes_total
            .is_some_and(|total| self.bytes_downloaded >= total)
    }

    /// File name of the destination path.
    pub fn file_name(&self) -> Option<&str> {
        self.destination.file_name().and_then(|n| n.to_str())
    }
}

/// Prompt fields extracted from a repository's documentation, with manual
/// entry as the fallback when extraction comes up empty.
///
/// Recomputed whenever the selected artifact's owning repository changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMetadata {
    /// Prompt template name (e.g. `chatml`). Required before parameterizing.
    pub prompt_template: Option<String>,
    /// Reverse prompt, when the model needs one.
    pub reverse_prompt: Option<String>,
}

impl PromptMetadata {
    /// Fill in missing fields from manually entered values.
    ///
    /// Extracted values win; empty manual input is ignored. Each field falls
    /// back independently.
    #[must_use]
    pub fn or_manual(mut self, prompt_template: Option<&str>, reverse_prompt: Option<&str>) -> Self {
        if self.prompt_template.is_none() {
            self.prompt_template = prompt_template
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from);
        }
        if self.reverse_prompt.is_none() {
            self.reverse_prompt = reverse_prompt
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from);
        }
        self
    }
}

/// File name portion of a repository path.
pub(crate) fn path_file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent_bounds() {
        assert_eq!(progress_percent(0, Some(1000)), Some(0));
        assert_eq!(progress_percent(250, Some(1000)), Some(25));
        assert_eq!(progress_percent(999, Some(1000)), Some(99));
        assert_eq!(progress_percent(1000, Some(1000)), Some(100));
        // Never exceeds 100 even if the server lied about the total
        assert_eq!(progress_percent(2000, Some(1000)), Some(100));
    }

    #[test]
    fn test_progress_percent_indeterminate() {
        assert_eq!(progress_percent(500, None), None);
        assert_eq!(progress_percent(500, Some(0)), None);
    }

    #[test]
    fn test_download_state_monotonic() {
        let mut state = DownloadState::new("/tmp/model.gguf");
        state.observe(100, Some(1000));
        state.observe(50, Some(1000)); // out-of-order update must not regress
        assert_eq!(state.bytes_downloaded, 100);
        assert_eq!(state.percent(), Some(10));
        assert!(!state.is_complete());

        state.observe(1000, Some(1000));
        assert_eq!(state.percent(), Some(100));
        assert!(state.is_complete());
    }

    #[test]
    fn test_download_state_unknown_total() {
        let mut state = DownloadState::new("/tmp/model.gguf");
        state.observe(4096, None);
        assert_eq!(state.percent(), None);
        assert!(!state.is_complete());
    }

    #[test]
    fn test_listing_contains() {
        let listing = ArtifactListing::new(
            RepoRef::new("org", "model"),
            vec!["a.gguf".to_string(), "sub/b.gguf".to_string()],
        );
        assert!(listing.contains("a.gguf"));
        assert!(listing.contains("sub/b.gguf"));
        assert!(!listing.contains("b.gguf"));
    }

    #[test]
    fn test_metadata_or_manual_independent_fallback() {
        let extracted = PromptMetadata {
            prompt_template: Some("chatml".to_string()),
            reverse_prompt: None,
        };
        let merged = extracted.or_manual(Some("ignored"), Some("<|im_end|>"));
        // Extracted template wins; reverse prompt falls back on its own
        assert_eq!(merged.prompt_template.as_deref(), Some("chatml"));
        assert_eq!(merged.reverse_prompt.as_deref(), Some("<|im_end|>"));
    }

    #[test]
    fn test_metadata_or_manual_ignores_blank_input() {
        let merged = PromptMetadata::default().or_manual(Some("  "), None);
        assert!(merged.prompt_template.is_none());
        assert!(merged.reverse_prompt.is_none());
    }

    #[test]
    fn test_path_file_name() {
        assert_eq!(path_file_name("model.Q4_K_M.gguf"), "model.Q4_K_M.gguf");
        assert_eq!(path_file_name("Q4/model.gguf"), "model.gguf");
    }
}
