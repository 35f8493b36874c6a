//! URL construction helpers for the Hugging Face Hub.
//!
//! Pure functions so URL shapes stay consistent across all calls.

use crate::config::HfClientConfig;
use crate::error::HfResult;
use ggbake_core::RepoRef;
use url::Url;

/// Build a URL for the repository tree endpoint, optionally below a
/// subdirectory.
pub fn build_tree_url(
    config: &HfClientConfig,
    repo: &RepoRef,
    subpath: Option<&str>,
) -> HfResult<Url> {
    let base = config.api_base_url.trim_end_matches('/');
    let mut raw = format!("{base}/{}/tree/{}", repo.id(), repo.revision);
    if let Some(subpath) = subpath {
        raw.push('/');
        raw.push_str(subpath);
    }
    Ok(Url::parse(&raw)?)
}

/// Build a URL for fetching a raw file at the repository's revision.
pub fn build_resolve_url(
    config: &HfClientConfig,
    repo: &RepoRef,
    file_path: &str,
) -> HfResult<Url> {
    let base = config.resolve_base_url.trim_end_matches('/');
    Ok(Url::parse(&format!(
        "{base}/{}/resolve/{}/{file_path}",
        repo.id(),
        repo.revision,
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HfClientConfig {
        HfClientConfig::new()
    }

    #[test]
    fn test_build_tree_url_root() {
        let repo = RepoRef::new("second-state", "Qwen2-0.5B-Instruct-GGUF");
        let url = build_tree_url(&config(), &repo, None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://huggingface.co/api/models/second-state/Qwen2-0.5B-Instruct-GGUF/tree/main"
        );
    }

    #[test]
    fn test_build_tree_url_subdir_and_revision() {
        let repo = RepoRef::new("org", "model").with_revision("abc123");
        let url = build_tree_url(&config(), &repo, Some("Q4_K_M")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://huggingface.co/api/models/org/model/tree/abc123/Q4_K_M"
        );
    }

    #[test]
    fn test_build_resolve_url() {
        let repo = RepoRef::new("org", "model");
        let url = build_resolve_url(&config(), &repo, "model.Q4_K_M.gguf").unwrap();
        assert_eq!(
            url.as_str(),
            "https://huggingface.co/org/model/resolve/main/model.Q4_K_M.gguf"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_tolerated() {
        let cfg = HfClientConfig::new().with_resolve_base_url("https://mirror.example/");
        let repo = RepoRef::new("org", "model");
        let url = build_resolve_url(&cfg, &repo, "README.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://mirror.example/org/model/resolve/main/README.md"
        );
    }
}
