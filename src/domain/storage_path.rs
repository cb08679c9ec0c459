use std::fmt;

use chrono::{DateTime, Utc};

use super::ids::UserId;

/// Object key of an uploaded recording inside the audio store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn for_upload(manager_id: &UserId, uploaded_at: DateTime<Utc>, filename: &str) -> Self {
        Self(format!(
            "{}/{}-{}",
            manager_id.as_uuid(),
            uploaded_at.timestamp_millis(),
            Self::sanitize_filename(filename)
        ))
    }

    /// Replaces characters that would split the name into extra path
    /// segments or a query/fragment once it becomes part of a URI.
    pub fn sanitize_filename(filename: &str) -> String {
        filename
            .chars()
            .map(|c| match c {
                '/' | '\\' | '?' | '#' => '_',
                other => other,
            })
            .collect()
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
