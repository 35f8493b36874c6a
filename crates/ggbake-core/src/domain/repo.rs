//! Repository references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Revision used when the caller does not name one.
pub const DEFAULT_REVISION: &str = "main";

/// Reference to a remote model repository at a specific revision.
///
/// Immutable once submitted for listing: changing the repository means
/// producing a new reference, which transitively invalidates every later
/// pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Branch name, tag, or commit hash
    pub revision: String,
}

impl RepoRef {
    /// Create a new repository reference at the default revision.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            revision: DEFAULT_REVISION.to_string(),
        }
    }

    /// Parse a repository reference from an `owner/name` id string.
    ///
    /// Returns `None` unless both parts are present and non-empty.
    pub fn parse(repo_id: &str) -> Option<Self> {
        let parts: Vec<&str> = repo_id.splitn(2, '/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self::new(parts[0], parts[1]))
        } else {
            None
        }
    }

    /// Pin this reference to a specific revision.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    /// Get the full repository id (`owner/name`).
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Whether both id parts are present.
    pub fn is_valid(&self) -> bool {
        !self.owner.is_empty() && !self.name.is_empty()
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_parse() {
        let repo = RepoRef::parse("second-state/Qwen2-0.5B-Instruct-GGUF").unwrap();
        assert_eq!(repo.owner, "second-state");
        assert_eq!(repo.name, "Qwen2-0.5B-Instruct-GGUF");
        assert_eq!(repo.revision, "main");
        assert_eq!(repo.id(), "second-state/Qwen2-0.5B-Instruct-GGUF");
    }

    #[test]
    fn test_repo_ref_parse_invalid() {
        assert!(RepoRef::parse("no-slash").is_none());
        assert!(RepoRef::parse("/no-owner").is_none());
        assert!(RepoRef::parse("no-name/").is_none());
        assert!(RepoRef::parse("").is_none());
    }

    #[test]
    fn test_repo_ref_with_revision() {
        let repo = RepoRef::new("org", "model").with_revision("abc123");
        assert_eq!(repo.revision, "abc123");
        // Display never includes the revision
        assert_eq!(repo.to_string(), "org/model");
    }
}
