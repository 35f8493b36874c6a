//! Hugging Face registry client.

use crate::config::HfClientConfig;
use crate::error::HfResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::HfFileEntry;
use crate::parsing::parse_tree_entries;
use crate::url::{build_resolve_url, build_tree_url};
use futures_util::StreamExt;
use ggbake_core::RepoRef;
use std::path::Path;
use tokio::io::AsyncWriteExt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default registry client using the reqwest HTTP backend.
pub type DefaultRegistryClient = HfRegistryClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for listing and fetching repository files from the Hub.
///
/// Generic over an HTTP backend for testing; use [`DefaultRegistryClient`]
/// in production code.
pub struct HfRegistryClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: HfClientConfig,
}

impl DefaultRegistryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HfClientConfig) -> Self {
        let backend = ReqwestBackend::new(&config);
        Self { backend, config }
    }
}

impl<B: HttpBackend> HfRegistryClient<B> {
    /// Create a client with a custom backend.
    ///
    /// Use this for testing with a fake backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: HfClientConfig, backend: B) -> Self {
        Self { backend, config }
    }

    /// List one level of the repository tree.
    pub(crate) async fn list_tree(
        &self,
        repo: &RepoRef,
        subpath: Option<&str>,
    ) -> HfResult<Vec<HfFileEntry>> {
        let url = build_tree_url(&self.config, repo, subpath)?;
        let json = self.backend.get_json(&url).await?;
        parse_tree_entries(&json)
    }

    /// List all files in a repository, descending one level into
    /// subdirectories (repositories commonly group artifacts per variant).
    pub(crate) async fn list_repo_files(&self, repo: &RepoRef) -> HfResult<Vec<String>> {
        let mut all_files = Vec::new();

        let root = self.list_tree(repo, None).await?;
        for entry in &root {
            if entry.is_directory() {
                if let Ok(sub_entries) = self.list_tree(repo, Some(&entry.path)).await {
                    for sub in sub_entries {
                        if !sub.is_directory() {
                            all_files.push(sub.path);
                        }
                    }
                }
            } else {
                all_files.push(entry.path.clone());
            }
        }

        Ok(all_files)
    }

    /// Stream a repository file to `destination`, invoking `on_progress`
    /// after each chunk.
    ///
    /// The destination is created (truncating any previous content) before
    /// the first byte arrives; on failure a partial file remains.
    pub(crate) async fn download_file(
        &self,
        repo: &RepoRef,
        file_path: &str,
        destination: &Path,
        on_progress: &(dyn Fn(u64, Option<u64>) + Send + Sync),
    ) -> HfResult<u64> {
        let url = build_resolve_url(&self.config, repo, file_path)?;
        let body = self.backend.get_body(&url).await?;
        let total = body.total;

        let mut file = tokio::fs::File::create(destination).await?;
        let mut stream = body.stream;
        let mut downloaded: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, total);
        }
        file.flush().await?;

        Ok(downloaded)
    }

    /// Fetch a repository file as UTF-8 text.
    pub(crate) async fn fetch_text_file(
        &self,
        repo: &RepoRef,
        file_path: &str,
    ) -> HfResult<String> {
        let url = build_resolve_url(&self.config, repo, file_path)?;
        self.backend.get_text(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{Canned, FakeBackend};
    use serde_json::json;

    fn client_with(backend: FakeBackend) -> HfRegistryClient<FakeBackend> {
        HfRegistryClient::with_backend(HfClientConfig::new(), backend)
    }

    fn repo() -> RepoRef {
        RepoRef::new("org", "model")
    }

    #[tokio::test]
    async fn test_list_repo_files_flat() {
        let backend = FakeBackend::new().with_response(
            "tree/main",
            Canned::Json(json!([
                {"path": "README.md", "type": "file", "size": 1000},
                {"path": "model.Q4_K_M.gguf", "type": "file", "size": 4_000_000_000_u64}
            ])),
        );

        let client = client_with(backend);
        let files = client.list_repo_files(&repo()).await.unwrap();
        assert_eq!(files, vec!["README.md", "model.Q4_K_M.gguf"]);
    }

    #[tokio::test]
    async fn test_list_repo_files_descends_directories() {
        let backend = FakeBackend::new()
            .with_response(
                "tree/main/Q4_K_M",
                Canned::Json(json!([
                    {"path": "Q4_K_M/model.Q4_K_M.gguf", "type": "file", "size": 100}
                ])),
            )
            .with_response(
                "tree/main",
                Canned::Json(json!([
                    {"path": "README.md", "type": "file", "size": 1000},
                    {"path": "Q4_K_M", "type": "directory", "size": 0}
                ])),
            );

        let client = client_with(backend);
        let files = client.list_repo_files(&repo()).await.unwrap();
        assert_eq!(files, vec!["README.md", "Q4_K_M/model.Q4_K_M.gguf"]);
    }

    #[tokio::test]
    async fn test_download_file_reports_chunked_progress() {
        let backend = FakeBackend::new().with_response(
            "resolve/main/model.gguf",
            Canned::Body {
                bytes: (0..1000u32).map(|i| (i % 256) as u8).collect(),
                chunk_size: 100,
                report_length: true,
            },
        );
        let client = client_with(backend);

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("model.gguf");

        let progress = std::sync::Mutex::new(Vec::new());
        let written = client
            .download_file(&repo(), "model.gguf", &dest, &|done, total| {
                progress.lock().unwrap().push((done, total));
            })
            .await
            .unwrap();

        assert_eq!(written, 1000);
        assert_eq!(std::fs::read(&dest).unwrap().len(), 1000);

        let seen = progress.into_inner().unwrap();
        assert_eq!(seen.len(), 10);
        assert_eq!(seen.first(), Some(&(100, Some(1000))));
        assert_eq!(seen.last(), Some(&(1000, Some(1000))));
        // Monotone byte counts
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[tokio::test]
    async fn test_download_overwrites_previous_file() {
        let backend = FakeBackend::new().with_response(
            "resolve/main/model.gguf",
            Canned::Body {
                bytes: vec![42u8; 64],
                chunk_size: 16,
                report_length: true,
            },
        );
        let client = client_with(backend);

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("model.gguf");
        std::fs::write(&dest, vec![0u8; 4096]).unwrap(); // stale longer file

        client
            .download_file(&repo(), "model.gguf", &dest, &|_, _| {})
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), vec![42u8; 64]);
    }

    #[tokio::test]
    async fn test_fetch_text_file() {
        let backend = FakeBackend::new().with_response(
            "resolve/main/README.md",
            Canned::Text("Prompt type: `chatml`\n".to_string()),
        );
        let client = client_with(backend);

        let text = client.fetch_text_file(&repo(), "README.md").await.unwrap();
        assert!(text.contains("chatml"));
    }
}
