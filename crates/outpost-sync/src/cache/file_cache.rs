use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use outpost_core::config::CacheConfig;
use outpost_core::errors::{CacheError, OutpostResult};
use outpost_core::models::{EntityKind, EntityRecord};
use outpost_core::traits::ILocalCache;
use serde_json::{Map, Value};
use tracing::warn;

/// File-backed snapshots at `<dir>/<kind>.json`, each shaped `{"<kind>": [record, ...]}`.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.as_str()))
    }

    /// Replace the snapshot for `kind`. Written to a temp file and renamed into place.
    pub fn save(&self, kind: EntityKind, records: &[Value]) -> OutpostResult<()> {
        let path = self.path_for(kind);
        std::fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;

        let mut doc = Map::new();
        doc.insert(kind.as_str().to_string(), Value::Array(records.to_vec()));
        let bytes = serde_json::to_vec_pretty(&Value::Object(doc))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
        Ok(())
    }
}

impl ILocalCache for FileCache {
    fn load(&self, kind: EntityKind) -> OutpostResult<Vec<EntityRecord>> {
        let path = self.path_for(kind);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&path, e).into()),
        };

        let doc: Value = serde_json::from_str(&contents).map_err(|e| malformed(&path, e))?;
        let entries = match doc.get(kind.as_str()) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(malformed(&path, format!("`{}` is not an array", kind.as_str())).into())
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            // Entries that fail the typed schema still go to the remote,
            // which reports them as failed.
            match EntityRecord::from_value_lenient(kind, entry.clone()) {
                Some(record) => {
                    if record.is_unchecked() {
                        warn!(kind = %kind, index, "outpost: cache entry does not match schema");
                    }
                    records.push(record);
                }
                None => warn!(kind = %kind, index, "outpost: skipping non-object cache entry"),
            }
        }
        Ok(records)
    }
}

fn io_err(path: &Path, e: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn malformed(path: &Path, reason: impl ToString) -> CacheError {
    CacheError::Malformed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
