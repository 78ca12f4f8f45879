use std::collections::HashMap;

use outpost_core::models::{EntityRecord, MatchKey};

/// Whether a submitted record already exists remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    /// Id of the existing remote record with the same match key.
    Existing(String),
    New,
}

/// Index from match key to remote id. First registration wins.
#[derive(Debug, Default)]
pub struct DedupMatcher {
    index: HashMap<MatchKey, String>,
}

impl DedupMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(&self, record: &EntityRecord) -> MatchDecision {
        match self.find(&record.match_key()) {
            Some(id) => MatchDecision::Existing(id.to_string()),
            None => MatchDecision::New,
        }
    }

    pub fn find(&self, key: &MatchKey) -> Option<&str> {
        self.index.get(key).map(String::as_str)
    }

    /// Returns `false` if the key was already taken.
    pub fn register(&mut self, key: MatchKey, id: String) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, id);
        true
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
