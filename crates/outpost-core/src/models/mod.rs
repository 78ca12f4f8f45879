mod credentials;
mod entity_kind;
mod match_key;
mod outcome;
mod record;

pub use credentials::{Credentials, SessionToken, ADMISSION_NO_ENV, PASSWORD_ENV};
pub use entity_kind::EntityKind;
pub use match_key::{parse_date, MatchKey};
pub use outcome::{FailedEntry, KindReport, SyncOutcome, SyncResult, SyncSummary, SyncedEntry};
pub use record::{EntityRecord, MediaItem, Notice, Report, UncheckedRecord, IDENTITY_FIELDS};
