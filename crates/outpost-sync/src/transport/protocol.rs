//! Wire shapes for the three remote endpoints.

use outpost_core::errors::{OutpostResult, SyncError};
use outpost_core::models::{
    EntityKind, EntityRecord, FailedEntry, SyncOutcome, SyncSummary, SyncedEntry,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dedup::{BulkUpsertReport, UpsertItem};

/// Message attached to `skipped` items.
pub const ALREADY_EXISTS: &str = "already exists";

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub admission_no: String,
    pub password: String,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Created,
    Skipped,
}

/// One entry of the `success` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /api/{kind}/sync-local` response.
///
/// `failed` entries are `{<titleField>, error}`, so their shape depends on
/// the kind and they stay untyped until [`SyncLocalResponse::into_outcome`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncLocalResponse {
    #[serde(default)]
    pub success: Vec<SuccessItem>,
    #[serde(default)]
    pub failed: Vec<Map<String, Value>>,
    #[serde(default)]
    pub summary: SyncSummary,
}

impl SyncLocalResponse {
    /// Serialize a store report in submission order.
    pub fn from_report(kind: EntityKind, report: &BulkUpsertReport) -> Self {
        let mut response = Self {
            summary: report.summary(),
            ..Default::default()
        };
        for item in &report.items {
            match item {
                UpsertItem::Created { id, title } => response.success.push(SuccessItem {
                    id: Some(id.clone()),
                    title: Some(title.clone()),
                    status: ItemStatus::Created,
                    message: None,
                }),
                UpsertItem::Skipped { id, title } => response.success.push(SuccessItem {
                    id: Some(id.clone()),
                    title: Some(title.clone()),
                    status: ItemStatus::Skipped,
                    message: Some(ALREADY_EXISTS.to_string()),
                }),
                UpsertItem::Failed { title, reason } => {
                    let mut entry = Map::new();
                    entry.insert(kind.title_field().to_string(), Value::String(title.clone()));
                    entry.insert("error".to_string(), Value::String(reason.clone()));
                    response.failed.push(entry);
                }
            }
        }
        response
    }

    /// Decode into the kind-agnostic outcome. Counts are re-derived from the
    /// items; a disagreeing server summary is logged, not trusted.
    pub fn into_outcome(self, kind: EntityKind) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        for item in self.success {
            let entry = SyncedEntry {
                id: item.id.unwrap_or_default(),
                title: item.title.unwrap_or_default(),
            };
            match item.status {
                ItemStatus::Created => outcome.created.push(entry),
                ItemStatus::Skipped => outcome.skipped.push(entry),
            }
        }
        for entry in self.failed {
            let field = |name: &str| {
                entry
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            outcome.failed.push(FailedEntry {
                title: field(kind.title_field()),
                reason: field("error"),
            });
        }

        let derived = outcome.summary();
        if derived != self.summary {
            tracing::warn!(
                kind = %kind,
                server = ?self.summary,
                derived = ?derived,
                "outpost: sync-local summary disagrees with items"
            );
        }
        outcome
    }
}

/// Request body `{"<kind>": [record, ...]}`.
pub fn sync_local_body(kind: EntityKind, records: &[EntityRecord]) -> OutpostResult<Value> {
    let records = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    let mut body = Map::new();
    body.insert(kind.as_str().to_string(), Value::Array(records));
    Ok(Value::Object(body))
}

/// Server side: pull the record array out of a sync-local body.
pub fn parse_sync_local_body(kind: EntityKind, body: Value) -> OutpostResult<Vec<Value>> {
    match body {
        Value::Object(mut map) => match map.remove(kind.as_str()) {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(SyncError::Validation {
                title: kind.as_str().to_string(),
                reason: format!("body must carry a `{}` array", kind.as_str()),
            }
            .into()),
        },
        _ => Err(SyncError::Validation {
            title: kind.as_str().to_string(),
            reason: "body must be a JSON object".into(),
        }
        .into()),
    }
}
