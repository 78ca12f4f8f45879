//! Collaborator seams: the local snapshot store and the remote server.

mod local_cache;
mod remote_api;

pub use local_cache::ILocalCache;
pub use remote_api::{HealthStatus, IRemoteApi};
