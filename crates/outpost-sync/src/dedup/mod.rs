//! Remote-side bulk-upsert contract: validation, match-key lookup, and an
//! in-process store that applies it.
//!
//! The server decides equivalence; the client never coordinates primary
//! keys. Re-submitting a batch is always safe because every record whose
//! match key is already present comes back as `skipped`.

mod matcher;
mod store;
mod validation;

pub use matcher::{DedupMatcher, MatchDecision};
pub use store::{BulkUpsertReport, RemoteStore, StoredRecord, UpsertItem};
pub use validation::validate_record;
