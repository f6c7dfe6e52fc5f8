//! Document and version records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable, numbered snapshot of a document's full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    /// 1-based, contiguous within a document.
    pub version_number: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A document and its version chain.
///
/// `versions` is ordered by ascending `version_number` and never empty for
/// documents handed out by [`DocumentStore`](crate::DocumentStore).
/// `updated_at` equals the `created_at` of the last version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub topic: String,
    pub overview: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub versions: Vec<Version>,
}

impl Document {
    /// Most recent version.
    #[must_use]
    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Version by its 1-based number.
    #[must_use]
    pub fn version(&self, number: u32) -> Option<&Version> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        self.versions.get(index)
    }

    /// Number of versions.
    #[must_use]
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// Content of the most recent version.
    #[must_use]
    pub fn latest_content(&self) -> Option<&str> {
        self.latest_version().map(|version| version.content.as_str())
    }
}
