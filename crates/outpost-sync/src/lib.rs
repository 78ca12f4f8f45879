//! # outpost-sync
//!
//! Offline reconciliation loop: authenticates with the remote, probes
//! connectivity on a fixed interval, backs off exponentially while the remote
//! is unreachable, and pushes each locally cached entity kind to its
//! bulk-upsert endpoint. The remote deduplicates by match key, so repeated
//! passes are idempotent.
//!
//! The reqwest transport is behind the default `http` feature. Local files are
//! the source of truth; nothing here prunes or rewrites them.

pub mod auth;
pub mod backoff;
pub mod cache;
pub mod dedup;
pub mod engine;
pub mod observability;
pub mod pipeline;
pub mod probe;
pub mod state;
pub mod transport;

pub use auth::Authenticator;
pub use backoff::{BackoffDecision, BackoffScheduler};
pub use cache::FileCache;
pub use dedup::{DedupMatcher, MatchDecision, RemoteStore};
pub use engine::{SyncOrchestrator, SyncOrchestratorBuilder, TickOutcome};
pub use pipeline::EntitySyncPipeline;
pub use probe::{Connectivity, ConnectivityProbe};
pub use state::{OrchestratorStatus, Phase, SharedSyncState};
#[cfg(feature = "http")]
pub use transport::HttpRemote;
pub use transport::LoopbackRemote;
