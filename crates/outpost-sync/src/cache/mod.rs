//! Local snapshot store: one JSON document per entity kind.

mod file_cache;

pub use file_cache::FileCache;
