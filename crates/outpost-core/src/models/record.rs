//! Typed entity records as they cross the local/remote boundary.
//!
//! Each schema names the fields the dedup match key reads and keeps every
//! other field in a flattened map, so nothing the local cache stores is lost
//! on the way to the remote.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity_kind::EntityKind;
use super::match_key::MatchKey;

/// Local-only identity fields. The remote store assigns its own identity.
pub const IDENTITY_FIELDS: [&str; 2] = ["id", "_id"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A local entry that does not fit its kind's schema, e.g. a non-string
/// title. Carried verbatim so the remote can reject it by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UncheckedRecord {
    #[serde(skip)]
    pub kind: EntityKind,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One record of a known entity kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityRecord {
    Notice(Notice),
    Report(Report),
    Media(MediaItem),
    Unchecked(UncheckedRecord),
}

impl EntityRecord {
    /// Interpret a loosely-typed JSON object as a record of `kind`.
    pub fn from_value(kind: EntityKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            EntityKind::Notices => Self::Notice(serde_json::from_value(value)?),
            EntityKind::Reports => Self::Report(serde_json::from_value(value)?),
            EntityKind::Media => Self::Media(serde_json::from_value(value)?),
        })
    }

    /// Like [`from_value`](Self::from_value), but an object that fails the
    /// typed schema is kept as [`EntityRecord::Unchecked`] instead of erroring.
    pub fn from_value_lenient(kind: EntityKind, value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        let typed = Self::from_value(kind, Value::Object(fields.clone()));
        Some(typed.unwrap_or_else(|_| Self::Unchecked(UncheckedRecord { kind, fields })))
    }

    pub fn is_unchecked(&self) -> bool {
        matches!(self, Self::Unchecked(_))
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Notice(_) => EntityKind::Notices,
            Self::Report(_) => EntityKind::Reports,
            Self::Media(_) => EntityKind::Media,
            Self::Unchecked(u) => u.kind,
        }
    }

    /// Value of the kind's title field, if present.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Notice(n) => n.title.as_deref(),
            Self::Report(r) => r.title.as_deref(),
            Self::Media(m) => m.file_name.as_deref(),
            Self::Unchecked(u) => u.fields.get(u.kind.title_field()).and_then(Value::as_str),
        }
    }

    /// The local identity (`id` or `_id`), if the record carries one.
    pub fn local_id(&self) -> Option<&Value> {
        let extra = self.extra();
        IDENTITY_FIELDS.iter().find_map(|field| extra.get(*field))
    }

    /// A copy of this record without local identity fields.
    pub fn strip_identity(&self) -> Self {
        let mut stripped = self.clone();
        let extra = stripped.extra_mut();
        for field in IDENTITY_FIELDS {
            extra.remove(field);
        }
        stripped
    }

    pub fn match_key(&self) -> MatchKey {
        match self {
            Self::Notice(n) => MatchKey::new(
                EntityKind::Notices,
                vec![
                    MatchKey::text_part(n.title.as_deref()),
                    MatchKey::text_part(n.organization_name.as_deref()),
                    MatchKey::date_part(n.event_start_date.as_deref()),
                    MatchKey::date_part(n.event_end_date.as_deref()),
                ],
            ),
            Self::Report(r) => MatchKey::new(
                EntityKind::Reports,
                vec![
                    MatchKey::text_part(r.title.as_deref()),
                    MatchKey::text_part(r.category.as_deref()),
                    MatchKey::date_part(r.created_at.as_deref()),
                ],
            ),
            Self::Media(m) => MatchKey::new(
                EntityKind::Media,
                vec![
                    MatchKey::text_part(m.file_name.as_deref()),
                    MatchKey::text_part(m.media_type.as_deref()),
                    MatchKey::date_part(m.uploaded_at.as_deref()),
                ],
            ),
            Self::Unchecked(u) => MatchKey::new(
                u.kind,
                u.kind
                    .match_key_fields()
                    .iter()
                    .map(|field| MatchKey::text_part(u.fields.get(*field).and_then(Value::as_str)))
                    .collect(),
            ),
        }
    }

    /// Fields outside the typed schema.
    pub fn extra(&self) -> &Map<String, Value> {
        match self {
            Self::Notice(n) => &n.extra,
            Self::Report(r) => &r.extra,
            Self::Media(m) => &m.extra,
            Self::Unchecked(u) => &u.fields,
        }
    }

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        match self {
            Self::Notice(n) => &mut n.extra,
            Self::Report(r) => &mut r.extra,
            Self::Media(m) => &mut m.extra,
            Self::Unchecked(u) => &mut u.fields,
        }
    }
}
