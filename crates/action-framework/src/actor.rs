//! # Collection Actor
//!
//! This module defines the `CollectionActor`, the in-memory document store behind the
//! bundled [`StorageAdapter`](crate::storage::StorageAdapter). It implements the
//! "Server" side of the Actor Model: it owns the documents and the receiver end of the
//! channel, and processes requests one at a time.

use crate::client::CollectionClient;
use crate::error::StorageError;
use crate::message::CollectionRequest;
use crate::params::Params;
use crate::storage::Document;
use indexmap::IndexMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns one document collection.
///
/// # Architecture Note
/// **Concurrency Model**:
/// Any number of clients may hold a [`CollectionClient`] and call it concurrently, but
/// the actor handles its messages *sequentially*. Each insert, update or delete is
/// therefore atomic with respect to every other operation on the collection, with no
/// `Mutex` around the store. Multi-step sequences issued by a caller (read, then
/// write) are *not* atomic; another request can land between the two messages.
///
/// # Operations
///
/// * **Insert**: rejects unique-field collisions, assigns an id from `next_id_fn`,
///   stores the document and returns it.
/// * **FindById**: returns a clone of the document, or `None`.
/// * **Find**: returns every document matching the equality filter, in insertion order.
/// * **UpdateById**: merges the given fields into the stored document (after the
///   unique-field check) and returns the merged result, or `None`.
/// * **RemoveById**: removes the document and returns it, or `None`.
///
/// # Usage Pattern
///
/// ```rust
/// use action_framework::actor::CollectionActor;
/// use action_framework::storage::StorageAdapter;
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() {
///     // 1. Create
///     let (actor, client) = CollectionActor::new("users", 10);
///
///     // 2. Configure & Run
///     tokio::spawn(actor.unique("email").run());
///
///     // 3. Use
///     let fields = json!({ "email": "a@b.io" }).as_object().cloned().unwrap();
///     let doc = client.insert(fields).await.unwrap();
///     assert!(client.find_by_id(&doc.id).await.unwrap().is_some());
/// }
/// ```
pub struct CollectionActor {
    name: String,
    receiver: mpsc::Receiver<CollectionRequest>,
    store: IndexMap<String, Document>,
    unique: Vec<String>,
    next_id_fn: Box<dyn Fn() -> String + Send + Sync>,
}

impl CollectionActor {
    /// Creates a new `CollectionActor` and its associated `CollectionClient`.
    ///
    /// # Arguments
    ///
    /// * `name` - The collection name, used in logs and errors.
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    ///
    /// Ids default to random UUIDs in simple (32 hex digit) form.
    pub fn new(name: impl Into<String>, buffer_size: usize) -> (Self, CollectionClient) {
        let name = name.into();
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name: name.clone(),
            receiver,
            store: IndexMap::new(),
            unique: Vec::new(),
            next_id_fn: Box::new(|| uuid::Uuid::new_v4().simple().to_string()),
        };
        let client = CollectionClient::new(name, sender);
        (actor, client)
    }

    /// Declares a field whose values must be unique across the collection.
    pub fn unique(mut self, field: impl Into<String>) -> Self {
        self.unique.push(field.into());
        self
    }

    /// Replaces the id generator.
    pub fn with_id_fn(mut self, next_id_fn: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.next_id_fn = Box::new(next_id_fn);
        self
    }

    /// Finds the first unique field of `candidate` already used by another document.
    fn conflict(&self, candidate: &Params, except: Option<&str>) -> Option<StorageError> {
        self.unique.iter().find_map(|field| {
            let value = candidate.get(field).filter(|v| !v.is_null())?;
            let taken = self
                .store
                .values()
                .any(|doc| Some(doc.id.as_str()) != except && doc.fields.get(field) == Some(value));
            taken.then(|| StorageError::Conflict {
                field: field.clone(),
                value: value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string()),
            })
        })
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self) {
        let collection = self.name.clone();
        let collection = collection.as_str();
        info!(collection, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Insert { fields, respond_to } => {
                    debug!(collection, fields = fields.len(), "Insert");
                    if let Some(e) = self.conflict(&fields, None) {
                        warn!(collection, field = e.conflict_field(), "Insert rejected");
                        let _ = respond_to.send(Err(e));
                        continue;
                    }
                    let id = (self.next_id_fn)();
                    let doc = Document::new(id.clone(), fields);
                    self.store.insert(id.clone(), doc.clone());
                    info!(collection, %id, size = self.store.len(), "Inserted");
                    let _ = respond_to.send(Ok(doc));
                }
                CollectionRequest::FindById { id, respond_to } => {
                    let doc = self.store.get(&id).cloned();
                    debug!(collection, %id, found = doc.is_some(), "FindById");
                    let _ = respond_to.send(Ok(doc));
                }
                CollectionRequest::Find { filter, respond_to } => {
                    let docs: Vec<Document> = self
                        .store
                        .values()
                        .filter(|doc| doc.matches(&filter))
                        .cloned()
                        .collect();
                    let keys: Vec<&String> = filter.keys().collect();
                    debug!(collection, filter = ?keys, count = docs.len(), "Find");
                    let _ = respond_to.send(Ok(docs));
                }
                CollectionRequest::UpdateById { id, fields, respond_to } => {
                    debug!(collection, %id, fields = fields.len(), "UpdateById");
                    if !self.store.contains_key(&id) {
                        warn!(collection, %id, "Not found");
                        let _ = respond_to.send(Ok(None));
                        continue;
                    }
                    if let Some(e) = self.conflict(&fields, Some(&id)) {
                        warn!(collection, %id, field = e.conflict_field(), "Update rejected");
                        let _ = respond_to.send(Err(e));
                        continue;
                    }
                    let updated = self.store.get_mut(&id).map(|doc| {
                        doc.merge(fields);
                        doc.clone()
                    });
                    info!(collection, %id, "Updated");
                    let _ = respond_to.send(Ok(updated));
                }
                CollectionRequest::RemoveById { id, respond_to } => {
                    debug!(collection, %id, "RemoveById");
                    let removed = self.store.shift_remove(&id);
                    match &removed {
                        Some(_) => info!(collection, %id, size = self.store.len(), "Removed"),
                        None => warn!(collection, %id, "Not found"),
                    }
                    let _ = respond_to.send(Ok(removed));
                }
            }
        }

        info!(collection, size = self.store.len(), "Shutdown");
    }
}
