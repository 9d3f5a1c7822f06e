//! Ordered cache of query results.

use crate::types::Document;

/// The client-held ordered sequence of documents, kept index-consistent
/// with the server's current query result order.
///
/// This is a plain positional structure: mutators assume well-formed
/// indices (the reconciliation engine validates against current bounds
/// before mutating) and no identity checks are performed here. Mutation is
/// O(1) amortized at the tail, O(n) for an arbitrary index, which is fine
/// for result windows bounded by the query limit.
#[derive(Debug, Default)]
pub struct OrderedCache {
    documents: Vec<Document>,
}

impl OrderedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sized for an expected result-window limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            documents: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn insert(&mut self, index: usize, document: Document) {
        self.documents.insert(index, document);
    }

    pub fn replace(&mut self, index: usize, document: Document) {
        self.documents[index] = document;
    }

    pub fn remove(&mut self, index: usize) -> Document {
        self.documents.remove(index)
    }

    /// Relocate the entry at `from` to `to`, where `to` is interpreted
    /// against the sequence with the entry already removed.
    pub fn move_item(&mut self, from: usize, to: usize) {
        let document = self.documents.remove(from);
        self.documents.insert(to, document);
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentId;
    use serde_json::json;

    fn doc(id: &str) -> Document {
        Document::new(id, json!({ "id": id }))
    }

    fn ids(cache: &OrderedCache) -> Vec<&str> {
        cache.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = OrderedCache::new();
        cache.insert(0, doc("a"));
        cache.insert(1, doc("c"));
        cache.insert(1, doc("b"));

        assert_eq!(cache.len(), 3);
        assert_eq!(ids(&cache), vec!["a", "b", "c"]);
        assert_eq!(cache.get(1).unwrap().id, DocumentId::from("b"));
        assert!(cache.get(3).is_none());
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut cache = OrderedCache::new();
        cache.insert(0, doc("a"));
        cache.insert(1, doc("b"));

        cache.replace(0, doc("a2"));
        assert_eq!(ids(&cache), vec!["a2", "b"]);
    }

    #[test]
    fn test_remove() {
        let mut cache = OrderedCache::new();
        cache.insert(0, doc("a"));
        cache.insert(1, doc("b"));

        let removed = cache.remove(0);
        assert_eq!(removed.id, DocumentId::from("a"));
        assert_eq!(ids(&cache), vec!["b"]);
    }

    #[test]
    fn test_move_item() {
        let mut cache = OrderedCache::new();
        for (i, id) in ["a", "b", "c", "d"].iter().enumerate() {
            cache.insert(i, doc(id));
        }

        cache.move_item(3, 0);
        assert_eq!(ids(&cache), vec!["d", "a", "b", "c"]);

        cache.move_item(0, 3);
        assert_eq!(ids(&cache), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_clear() {
        let mut cache = OrderedCache::with_capacity(8);
        cache.insert(0, doc("a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
