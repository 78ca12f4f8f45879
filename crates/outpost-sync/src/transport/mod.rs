//! Transport layer: wire protocol, HTTP client, and in-process loopback remote.

#[cfg(feature = "http")]
pub mod http_client;
pub mod loopback;
pub mod protocol;

#[cfg(feature = "http")]
pub use http_client::HttpRemote;
pub use loopback::LoopbackRemote;
pub use protocol::{
    LoginRequest, LoginResponse, SuccessItem, SyncLocalResponse, ALREADY_EXISTS,
};
