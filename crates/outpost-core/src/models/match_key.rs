//! Field-based equivalence used for deduplication.
//!
//! A match key is a heuristic, not an identity: distinct entities that share
//! every key field are treated as the same logical entity.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use super::entity_kind::EntityKind;

/// Ordered tuple of normalized field values for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    kind: EntityKind,
    parts: Vec<Option<String>>,
}

impl MatchKey {
    pub fn new(kind: EntityKind, parts: Vec<Option<String>>) -> Self {
        Self { kind, parts }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn parts(&self) -> &[Option<String>] {
        &self.parts
    }

    /// Trimmed text; blank counts as absent.
    pub fn text_part(value: Option<&str>) -> Option<String> {
        value
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Dates normalize to UTC RFC 3339 when parseable, otherwise compare as trimmed text.
    pub fn date_part(value: Option<&str>) -> Option<String> {
        let raw = Self::text_part(value)?;
        Some(match parse_date(&raw) {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            None => raw,
        })
    }
}

/// Parse RFC 3339, `YYYY-MM-DDTHH:MM:SS` (taken as UTC), or `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
