//! JSON parsing for Hub API responses.

use crate::error::{HfError, HfResult};
use crate::models::{HfEntryType, HfFileEntry};
use serde_json::Value;

/// Parse tree endpoint entries from JSON.
///
/// Lenient on extras: entries without a path are skipped, unknown types are
/// treated as files.
pub fn parse_tree_entries(json: &Value) -> HfResult<Vec<HfFileEntry>> {
    let array = json.as_array().ok_or_else(|| HfError::InvalidResponse {
        message: "Expected array for tree response".to_string(),
    })?;

    let entries = array
        .iter()
        .filter_map(|item| {
            let path = item.get("path").and_then(|v| v.as_str())?.to_string();
            let entry_type = match item.get("type").and_then(|v| v.as_str()) {
                Some("directory") => HfEntryType::Directory,
                _ => HfEntryType::File,
            };
            let size = item
                .get("size")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0);

            Some(HfFileEntry {
                path,
                entry_type,
                size,
            })
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tree_entries_mixed() {
        let json = json!([
            {"path": "README.md", "type": "file", "size": 1000},
            {"path": "model.Q4_K_M.gguf", "type": "file", "size": 4_000_000_000_u64},
            {"path": "subdir", "type": "directory", "size": 0}
        ]);

        let entries = parse_tree_entries(&json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, "README.md");
        assert_eq!(entries[1].size, 4_000_000_000);
        assert!(entries[2].is_directory());
    }

    #[test]
    fn test_parse_tree_entries_skips_malformed() {
        let json = json!([
            {"type": "file", "size": 10},
            {"path": "kept.gguf"}
        ]);

        let entries = parse_tree_entries(&json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "kept.gguf");
        assert_eq!(entries[0].size, 0);
    }

    #[test]
    fn test_parse_tree_entries_invalid_json() {
        let json = json!({"not": "an array"});
        assert!(parse_tree_entries(&json).is_err());
    }
}
