//! Model registry port trait.

use crate::domain::RepoRef;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Progress callback for streamed downloads: `(bytes_downloaded, bytes_total)`.
///
/// Invoked after each chunk. The total is `None` for the lifetime of the call
/// when the server does not report a content length.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, Option<u64>) + Send + Sync);

/// Errors from registry port operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry could not be reached or refused the request (network,
    /// auth, rate limiting).
    #[error("Registry unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong
        message: String,
    },

    /// The registry reports no such repository.
    #[error("Repository not found: {repo_id}")]
    RepositoryNotFound {
        /// The repository id that was not found
        repo_id: String,
    },

    /// A documentation file does not exist at the requested revision.
    #[error("File '{filename}' not found in {repo_id}")]
    MetadataNotFound {
        /// The repository id
        repo_id: String,
        /// The file that was requested
        filename: String,
    },

    /// A file download failed partway (HTTP error status or transport error).
    #[error("Download failed: {reason}")]
    DownloadFailed {
        /// Description of the failure
        reason: String,
    },
}

/// Result type alias for registry port operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Port trait for the remote model registry.
///
/// An empty repository is an empty listing, not an error; filtering to the
/// artifact extension is the caller's job.
#[async_trait]
pub trait RegistryClientPort: Send + Sync {
    /// List all file paths in a repository at its revision.
    async fn list_files(&self, repo: &RepoRef) -> RegistryResult<Vec<String>>;

    /// Stream a repository file to `destination`, reporting byte progress
    /// after each chunk. Returns the number of bytes written.
    ///
    /// The destination is truncated first, so re-fetching the same artifact
    /// overwrites deterministically. On failure a partial file may remain on
    /// disk; there is no atomic rename.
    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        destination: &Path,
        on_progress: ProgressFn<'_>,
    ) -> RegistryResult<u64>;

    /// Fetch a repository file as UTF-8 text (e.g. `README.md`).
    async fn fetch_text(&self, repo: &RepoRef, filename: &str) -> RegistryResult<String>;
}
