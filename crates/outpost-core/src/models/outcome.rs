//! Per-kind and consolidated results of a reconciliation pass.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_kind::EntityKind;

/// A record the remote created or already had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncedEntry {
    pub id: String,
    pub title: String,
}

/// A record the remote rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEntry {
    pub title: String,
    pub reason: String,
}

/// Counts derived from an outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub total: usize,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncSummary {
    fn absorb(&mut self, other: SyncSummary) {
        self.total += other.total;
        self.created += other.created;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// What the bulk upsert did for one kind in one pass. Never merged across passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub created: Vec<SyncedEntry>,
    pub skipped: Vec<SyncedEntry>,
    pub failed: Vec<FailedEntry>,
}

impl SyncOutcome {
    pub fn summary(&self) -> SyncSummary {
        SyncSummary {
            total: self.created.len() + self.skipped.len() + self.failed.len(),
            created: self.created.len(),
            skipped: self.skipped.len(),
            failed: self.failed.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Pipeline-level result for one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KindReport {
    /// The batch reached the remote; per-record results inside.
    Completed(SyncOutcome),
    /// The local snapshot was empty or missing; no request was made.
    NothingToSync,
    /// The batch never produced per-record results.
    Failed { message: String },
}

impl KindReport {
    pub fn summary(&self) -> SyncSummary {
        match self {
            Self::Completed(outcome) => outcome.summary(),
            Self::NothingToSync | Self::Failed { .. } => SyncSummary::default(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Consolidated result of one reconciliation pass across all kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub kinds: BTreeMap<EntityKind, KindReport>,
    pub completed_at: DateTime<Utc>,
}

impl SyncResult {
    pub fn new(kinds: BTreeMap<EntityKind, KindReport>) -> Self {
        Self {
            kinds,
            completed_at: Utc::now(),
        }
    }

    pub fn get(&self, kind: EntityKind) -> Option<&KindReport> {
        self.kinds.get(&kind)
    }

    /// Counts summed over every kind that completed.
    pub fn totals(&self) -> SyncSummary {
        let mut totals = SyncSummary::default();
        for report in self.kinds.values() {
            totals.absorb(report.summary());
        }
        totals
    }

    /// Kinds whose pipeline failed before per-record processing.
    pub fn failed_kinds(&self) -> Vec<EntityKind> {
        self.kinds
            .iter()
            .filter(|(_, report)| report.is_failed())
            .map(|(kind, _)| *kind)
            .collect()
    }
}
