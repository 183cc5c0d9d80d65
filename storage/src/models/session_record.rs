//! Session record model for persistence.
//!
//! One record per chat user; stored as a flat object under its id in the session document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Temporary per-user session data. Holds nothing that outlives a `clear_session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    #[serde(default)]
    pub session_data: Map<String, Value>,
}

impl SessionRecord {
    /// Creates an empty session for the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            session_data: Map::new(),
        }
    }

    /// Empties the session data; the record itself is kept.
    pub fn clear_session(&mut self) {
        self.session_data.clear();
    }

    /// Shallow merge: keys in `data` overwrite existing keys.
    pub fn merge(&mut self, data: Map<String, Value>) {
        self.session_data.extend(data);
    }
}
