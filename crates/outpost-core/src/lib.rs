//! # outpost-core
//!
//! Foundation crate for the Outpost offline reconciliation subsystem.
//! Defines the entity models, collaborator traits, errors, and config.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::OutpostConfig;
pub use errors::{OutpostError, OutpostResult, SyncError};
pub use models::{EntityKind, EntityRecord, KindReport, SyncOutcome, SyncResult};
