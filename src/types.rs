//! Core types for the live list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a document, unique within the active cache.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId(s)
    }
}

/// A single document in a query result: stable identity plus an opaque
/// JSON payload. The payload is never interpreted by the cache or the
/// reconciliation engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub payload: serde_json::Value,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

/// One positional change reported by the query source.
///
/// Each variant carries exactly the indices that are meaningful for its
/// kind. Indices are relative to the cache state after all prior records
/// of the same batch have been applied, not to a pre-batch snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// A document entered the result window at `new_index`.
    Added {
        document: Document,
        new_index: usize,
    },

    /// An existing document changed. When `old_index == new_index` only
    /// the content changed; otherwise the document also moved, and
    /// `new_index` is computed by the source against the sequence with the
    /// old entry already removed.
    Modified {
        document: Document,
        old_index: usize,
        new_index: usize,
    },

    /// A document left the result window.
    Removed {
        document: Document,
        old_index: usize,
    },
}

impl ChangeRecord {
    pub fn added(document: Document, new_index: usize) -> Self {
        ChangeRecord::Added {
            document,
            new_index,
        }
    }

    pub fn modified(document: Document, old_index: usize, new_index: usize) -> Self {
        ChangeRecord::Modified {
            document,
            old_index,
            new_index,
        }
    }

    pub fn removed(document: Document, old_index: usize) -> Self {
        ChangeRecord::Removed {
            document,
            old_index,
        }
    }

    /// The document this record refers to.
    pub fn document(&self) -> &Document {
        match self {
            ChangeRecord::Added { document, .. }
            | ChangeRecord::Modified { document, .. }
            | ChangeRecord::Removed { document, .. } => document,
        }
    }
}

/// One atomic, ordered set of change records, produced by the query source
/// per server round-trip. Records must be applied in the order given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    changes: Vec<ChangeRecord>,
}

impl ChangeBatch {
    pub fn new(changes: Vec<ChangeRecord>) -> Self {
        Self { changes }
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl From<Vec<ChangeRecord>> for ChangeBatch {
    fn from(changes: Vec<ChangeRecord>) -> Self {
        Self::new(changes)
    }
}

impl FromIterator<ChangeRecord> for ChangeBatch {
    fn from_iter<I: IntoIterator<Item = ChangeRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// List configuration.
#[derive(Clone, Debug)]
pub struct ListConfig {
    /// Expected result-window limit of the query. Used to size the cache;
    /// the source, not this crate, enforces the window.
    pub window_limit: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { window_limit: 50 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id_display() {
        let id = DocumentId::from("rest-42");
        assert_eq!(id.to_string(), "rest-42");
        assert_eq!(format!("{:?}", id), "DocumentId(rest-42)");
    }

    #[test]
    fn test_change_record_document() {
        let doc = Document::new("a", json!({"name": "Burger Hut"}));
        let record = ChangeRecord::modified(doc.clone(), 2, 0);
        assert_eq!(record.document(), &doc);
    }

    #[test]
    fn test_change_batch_roundtrip() {
        let batch = ChangeBatch::new(vec![
            ChangeRecord::added(Document::new("a", json!({"rating": 4.5})), 0),
            ChangeRecord::removed(Document::new("b", json!(null)), 1),
        ]);

        let encoded = serde_json::to_string(&batch).unwrap();
        let decoded: ChangeBatch = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, batch);
    }
}
