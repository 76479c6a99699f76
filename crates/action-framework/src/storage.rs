//! # Storage Adapter
//!
//! The capability surface every resource service stores its documents through.
//! Services only see [`SharedAdapter`]; which backend sits behind it is decided
//! when the system is wired. The bundled backend is the actor-owned collection
//! in [`crate::actor`], reached through [`crate::client::CollectionClient`].
//!
//! Lookups by id return `Option`: `None` is the not-found outcome, and it is up to
//! the action handler to turn it into [`FrameworkError::NotFound`](crate::FrameworkError).

use crate::error::StorageError;
use crate::params::Params;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Equality filter; an empty filter matches every document.
pub type Filter = Params;

/// A stored document: a storage-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Params,
}

impl Document {
    pub fn new(id: impl Into<String>, mut fields: Params) -> Self {
        fields.remove("id");
        Self { id: id.into(), fields }
    }

    /// True if every filter entry equals the document's field of the same name.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter.iter().all(|(key, expected)| {
            if key == "id" {
                expected.as_str() == Some(self.id.as_str())
            } else {
                self.fields.get(key) == Some(expected)
            }
        })
    }

    /// Overwrites only the given fields; the id is never touched.
    pub fn merge(&mut self, fields: Params) {
        for (key, value) in fields {
            if key != "id" {
                self.fields.insert(key, value);
            }
        }
    }

    pub fn into_value(self) -> serde_json::Value {
        let mut map = Params::new();
        map.insert("id".to_string(), serde_json::Value::String(self.id));
        map.extend(self.fields);
        serde_json::Value::Object(map)
    }
}

/// Uniform CRUD access to one document collection.
///
/// Each call is atomic on its own; sequences of calls are not.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Name of the collection behind this adapter.
    fn collection(&self) -> &str;

    async fn insert(&self, fields: Params) -> Result<Document, StorageError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StorageError>;

    /// Returns matching documents in insertion order.
    async fn find(&self, filter: Filter) -> Result<Vec<Document>, StorageError>;

    /// Merges `fields` into the document and returns the result.
    async fn update_by_id(
        &self,
        id: &str,
        fields: Params,
    ) -> Result<Option<Document>, StorageError>;

    /// Removes the document and returns what was removed.
    async fn remove_by_id(&self, id: &str) -> Result<Option<Document>, StorageError>;
}

/// The adapter handle a resource service owns.
pub type SharedAdapter = Arc<dyn StorageAdapter>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn fields(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_document_matches_filter() {
        let doc = Document::new("a1", fields(json!({ "userId": "u1", "city": "Oslo" })));
        assert!(doc.matches(&Filter::new()));
        assert!(doc.matches(&fields(json!({ "userId": "u1" }))));
        assert!(doc.matches(&fields(json!({ "id": "a1" }))));
        assert!(!doc.matches(&fields(json!({ "userId": "u2" }))));
        assert!(!doc.matches(&fields(json!({ "zip": "0150" }))));
    }

    #[test]
    fn test_merge_keeps_id_and_untouched_fields() {
        let mut doc = Document::new("a1", fields(json!({ "street": "Main", "city": "Oslo" })));
        doc.merge(fields(json!({ "city": "Bergen", "id": "hijack" })));
        assert_eq!(doc.id, "a1");
        assert_eq!(doc.fields.get("street"), Some(&json!("Main")));
        assert_eq!(doc.fields.get("city"), Some(&json!("Bergen")));
    }

    #[test]
    fn test_document_serializes_flat() {
        let doc = Document::new("a1", fields(json!({ "city": "Oslo" })));
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({ "id": "a1", "city": "Oslo" }));
        assert_eq!(doc.into_value(), json!({ "id": "a1", "city": "Oslo" }));
    }
}
