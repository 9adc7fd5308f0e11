//! Location extraction from document-upload responses.
//!
//! Upload endpoints are inconsistent about where they put the stored file's
//! address. Rules are tried in priority order; the first that yields a
//! non-blank string wins.

use serde_json::Value;

/// JSON paths tried in order.
const RULES: &[&[&str]] = &[&["file", "url"], &["url"], &["fileUrl"], &["location"]];

/// No rule produced a location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("upload response carries no file location (tried file.url, url, fileUrl, location)")]
pub struct MissingUploadLocation;

/// The stored file's location from an upload response body.
pub fn extract_upload_location(body: &Value) -> Result<String, MissingUploadLocation> {
    RULES
        .iter()
        .find_map(|path| {
            path.iter()
                .try_fold(body, |node, key| node.get(key))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string)
        .ok_or(MissingUploadLocation)
}
