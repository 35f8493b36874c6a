//! Internal API response types for the Hugging Face Hub.
//!
//! These types stay inside `ggbake-hf`; consumers see only the core port
//! types.

use serde::{Deserialize, Serialize};

/// Type of entry in a repository tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HfEntryType {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// Entry in a repository file tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfFileEntry {
    /// Path relative to repository root
    pub path: String,
    /// Entry type (file or directory)
    pub entry_type: HfEntryType,
    /// File size in bytes (0 for directories)
    pub size: u64,
}

impl HfFileEntry {
    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        self.entry_type == HfEntryType::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directory() {
        let dir = HfFileEntry {
            path: "Q4_K_M".to_string(),
            entry_type: HfEntryType::Directory,
            size: 0,
        };
        assert!(dir.is_directory());

        let file = HfFileEntry {
            path: "model.gguf".to_string(),
            entry_type: HfEntryType::File,
            size: 1000,
        };
        assert!(!file.is_directory());
    }
}
