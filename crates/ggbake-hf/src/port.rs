//! Port trait implementation for the Hugging Face client.
//!
//! Maps internal Hub errors into the core registry taxonomy at the
//! boundary.

use async_trait::async_trait;
use ggbake_core::{ProgressFn, RegistryClientPort, RegistryError, RegistryResult, RepoRef};
use std::path::Path;

use crate::client::HfRegistryClient;
use crate::error::HfError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Map a listing error: a 404 means the repository itself is unknown.
fn map_list_error(err: HfError, repo: &RepoRef) -> RegistryError {
    match err.status() {
        Some(404) => RegistryError::RepositoryNotFound { repo_id: repo.id() },
        _ => RegistryError::Unavailable {
            message: err.to_string(),
        },
    }
}

/// Map a text fetch error: a 404 means the file is absent at this revision.
fn map_text_error(err: HfError, repo: &RepoRef, filename: &str) -> RegistryError {
    match err.status() {
        Some(404) => RegistryError::MetadataNotFound {
            repo_id: repo.id(),
            filename: filename.to_string(),
        },
        _ => RegistryError::Unavailable {
            message: err.to_string(),
        },
    }
}

/// Every download error collapses to `DownloadFailed` with the cause text.
fn map_download_error(err: HfError) -> RegistryError {
    RegistryError::DownloadFailed {
        reason: err.to_string(),
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> RegistryClientPort for HfRegistryClient<B> {
    async fn list_files(&self, repo: &RepoRef) -> RegistryResult<Vec<String>> {
        self.list_repo_files(repo)
            .await
            .map_err(|e| map_list_error(e, repo))
    }

    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        destination: &Path,
        on_progress: ProgressFn<'_>,
    ) -> RegistryResult<u64> {
        self.download_file(repo, path, destination, on_progress)
            .await
            .map_err(map_download_error)
    }

    async fn fetch_text(&self, repo: &RepoRef, filename: &str) -> RegistryResult<String> {
        self.fetch_text_file(repo, filename)
            .await
            .map_err(|e| map_text_error(e, repo, filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HfClientConfig;
    use crate::http::testing::{Canned, FakeBackend};
    use serde_json::json;

    fn repo() -> RepoRef {
        RepoRef::new("org", "model")
    }

    #[test]
    fn test_map_list_error_404_is_repository_not_found() {
        let err = HfError::RequestFailed {
            status: 404,
            url: "https://huggingface.co/api/models/org/model/tree/main".to_string(),
        };
        match map_list_error(err, &repo()) {
            RegistryError::RepositoryNotFound { repo_id } => assert_eq!(repo_id, "org/model"),
            other => panic!("expected RepositoryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_map_list_error_5xx_is_unavailable() {
        let err = HfError::RequestFailed {
            status: 503,
            url: "https://huggingface.co/api/models/org/model/tree/main".to_string(),
        };
        assert!(matches!(
            map_list_error(err, &repo()),
            RegistryError::Unavailable { .. }
        ));
    }

    #[test]
    fn test_map_text_error_404_is_metadata_not_found() {
        let err = HfError::RequestFailed {
            status: 404,
            url: "https://huggingface.co/org/model/resolve/main/README.md".to_string(),
        };
        match map_text_error(err, &repo(), "README.md") {
            RegistryError::MetadataNotFound { repo_id, filename } => {
                assert_eq!(repo_id, "org/model");
                assert_eq!(filename, "README.md");
            }
            other => panic!("expected MetadataNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_port_lists_through_backend() {
        let backend = FakeBackend::new().with_response(
            "tree/main",
            Canned::Json(json!([
                {"path": "model.gguf", "type": "file", "size": 10}
            ])),
        );
        let client = HfRegistryClient::with_backend(HfClientConfig::new(), backend);

        // Call through the port trait, the way the pipeline does.
        let port: &dyn RegistryClientPort = &client;
        let files = port.list_files(&repo()).await.unwrap();
        assert_eq!(files, vec!["model.gguf"]);
    }

    #[tokio::test]
    async fn test_port_download_failure_maps() {
        let backend = FakeBackend::new().with_response("resolve/main/model.gguf", Canned::Status(500));
        let client = HfRegistryClient::with_backend(HfClientConfig::new(), backend);

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("model.gguf");
        let port: &dyn RegistryClientPort = &client;
        let err = port
            .fetch_file(&repo(), "model.gguf", &dest, &|_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::DownloadFailed { .. }));
    }
}
