use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use outpost_core::models::{
    EntityKind, EntityRecord, FailedEntry, SyncOutcome, SyncSummary, SyncedEntry,
};
use serde_json::Value;

use super::matcher::{DedupMatcher, MatchDecision};
use super::validation::validate_record;

/// A record as the remote holds it.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    pub record: EntityRecord,
    pub created_at: DateTime<Utc>,
}

/// Per-record result of a bulk upsert, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertItem {
    Created { id: String, title: String },
    Skipped { id: String, title: String },
    Failed { title: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkUpsertReport {
    pub items: Vec<UpsertItem>,
}

impl BulkUpsertReport {
    pub fn summary(&self) -> SyncSummary {
        self.to_outcome().summary()
    }

    /// Split into created/skipped/failed, keeping relative order within each.
    pub fn to_outcome(&self) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        for item in &self.items {
            match item {
                UpsertItem::Created { id, title } => outcome.created.push(SyncedEntry {
                    id: id.clone(),
                    title: title.clone(),
                }),
                UpsertItem::Skipped { id, title } => outcome.skipped.push(SyncedEntry {
                    id: id.clone(),
                    title: title.clone(),
                }),
                UpsertItem::Failed { title, reason } => outcome.failed.push(FailedEntry {
                    title: title.clone(),
                    reason: reason.clone(),
                }),
            }
        }
        outcome
    }
}

/// In-process remote store implementing the bulk-upsert contract.
#[derive(Debug, Default)]
pub struct RemoteStore {
    records: BTreeMap<EntityKind, Vec<StoredRecord>>,
    matchers: BTreeMap<EntityKind, DedupMatcher>,
}

impl RemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert without validation, e.g. to seed records created through the CRUD side.
    pub fn insert(&mut self, record: EntityRecord) -> String {
        let kind = record.kind();
        let record = record.strip_identity();
        let id = uuid::Uuid::new_v4().to_string();
        self.matchers
            .entry(kind)
            .or_default()
            .register(record.match_key(), id.clone());
        self.records.entry(kind).or_default().push(StoredRecord {
            id: id.clone(),
            record,
            created_at: Utc::now(),
        });
        id
    }

    /// Apply the bulk-upsert contract to a batch of raw submitted records.
    ///
    /// Each record is handled independently: an existing match key yields
    /// `Skipped` without touching the stored record, a new key yields
    /// `Created`, and a record that fails to parse or validate yields
    /// `Failed` while the rest of the batch continues.
    pub fn bulk_upsert(&mut self, kind: EntityKind, submitted: Vec<Value>) -> BulkUpsertReport {
        let mut report = BulkUpsertReport::default();
        for value in submitted {
            let title = match value.get(kind.title_field()) {
                Some(Value::String(title)) => title.clone(),
                None | Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
            };

            if !value.is_object() {
                report.items.push(UpsertItem::Failed {
                    title,
                    reason: "record must be a JSON object".into(),
                });
                continue;
            }

            let record = match EntityRecord::from_value(kind, value) {
                Ok(record) => record.strip_identity(),
                Err(e) => {
                    report.items.push(UpsertItem::Failed {
                        title,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if let Err(reason) = validate_record(&record) {
                report.items.push(UpsertItem::Failed { title, reason });
                continue;
            }

            let decision = self.matchers.entry(kind).or_default().decide(&record);
            match decision {
                MatchDecision::Existing(id) => {
                    report.items.push(UpsertItem::Skipped { id, title });
                }
                MatchDecision::New => {
                    let id = self.insert(record);
                    report.items.push(UpsertItem::Created { id, title });
                }
            }
        }
        report
    }

    pub fn records(&self, kind: EntityKind) -> &[StoredRecord] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.records(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(Vec::is_empty)
    }
}
