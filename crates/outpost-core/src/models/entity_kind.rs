use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kinds of domain entity the subsystem reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Notices,
    Reports,
    Media,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Notices, EntityKind::Reports, EntityKind::Media];

    /// Snapshot key, wire payload key, and URL segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notices => "notices",
            Self::Reports => "reports",
            Self::Media => "media",
        }
    }

    /// Field that names a record in `failed` entries and logs.
    pub fn title_field(&self) -> &'static str {
        match self {
            Self::Notices | Self::Reports => "title",
            Self::Media => "fileName",
        }
    }

    /// Ordered wire field names forming the dedup match key.
    pub fn match_key_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Notices => &["title", "organizationName", "eventStartDate", "eventEndDate"],
            Self::Reports => &["title", "category", "createdAt"],
            Self::Media => &["fileName", "mediaType", "uploadedAt"],
        }
    }

    /// Bulk-upsert endpoint path, relative to the remote base address.
    pub fn sync_local_path(&self) -> String {
        format!("/api/{}/sync-local", self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notices" => Ok(Self::Notices),
            "reports" => Ok(Self::Reports),
            "media" => Ok(Self::Media),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}
