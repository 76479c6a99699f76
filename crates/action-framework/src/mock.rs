//! # Mock Collections & Testing Guide
//!
//! A [`CollectionClient`] only holds a channel sender, so a test can stand in for the
//! [`CollectionActor`](crate::actor::CollectionActor) by owning the receiver end.
//! This lets service and action tests run without a real store, and lets them inject
//! failures (a conflict, an unavailable backend) that are awkward to provoke for real.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | Mock collection | Real actor |
//! |---------|-----------------|------------|
//! | **State** | None, replies are scripted | Real documents |
//! | **Use Case** | Testing an action handler or service | Testing storage semantics or the full system |
//! | **Error Injection** | Easy (`return_err`) | Hard |
//!
//! ## Two styles
//!
//! * [`MockCollection`]: queue replies up front with `expect_*().return_ok(..)`, then
//!   call [`MockCollection::verify`] at the end.
//! * [`create_mock_collection`] plus the `expect_*` helper functions: receive each
//!   request yourself, assert on its payload and answer through its responder.
//!
//! ```rust
//! use action_framework::mock::MockCollection;
//! use action_framework::storage::{Document, StorageAdapter};
//! use action_framework::StorageError;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockCollection::new("users");
//!     mock.expect_find_by_id().return_ok(Some(Document::new("u1", Default::default())));
//!     mock.expect_remove_by_id().return_err(StorageError::Unavailable("down".into()));
//!
//!     let client = mock.client();
//!     assert!(client.find_by_id("u1").await.unwrap().is_some());
//!     assert!(client.remove_by_id("u1").await.is_err());
//!     mock.verify();
//! }
//! ```

use crate::client::CollectionClient;
use crate::error::StorageError;
use crate::message::{CollectionRequest, Response};
use crate::params::Params;
use crate::storage::{Document, Filter};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    Insert(Result<Document, StorageError>),
    FindById(Result<Option<Document>, StorageError>),
    Find(Result<Vec<Document>, StorageError>),
    UpdateById(Result<Option<Document>, StorageError>),
    RemoveById(Result<Option<Document>, StorageError>),
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// A scripted collection. Each request pops the next expectation; a request whose kind
/// does not match the expectation at the head of the queue panics the mock task, which
/// surfaces in the test as [`StorageError::Unavailable`].
pub struct MockCollection {
    client: CollectionClient,
    expectations: Queue,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockCollection {
    pub fn new(collection: &str) -> Self {
        let (sender, mut receiver) = mpsc::channel::<CollectionRequest>(100);
        let expectations: Queue = Arc::new(Mutex::new(VecDeque::new()));
        let queue = Arc::clone(&expectations);

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();
                match (request, expectation) {
                    (
                        CollectionRequest::Insert { respond_to, .. },
                        Some(Expectation::Insert(r)),
                    ) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        CollectionRequest::FindById { respond_to, .. },
                        Some(Expectation::FindById(r)),
                    ) => {
                        let _ = respond_to.send(r);
                    }
                    (CollectionRequest::Find { respond_to, .. }, Some(Expectation::Find(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        CollectionRequest::UpdateById { respond_to, .. },
                        Some(Expectation::UpdateById(r)),
                    ) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        CollectionRequest::RemoveById { respond_to, .. },
                        Some(Expectation::RemoveById(r)),
                    ) => {
                        let _ = respond_to.send(r);
                    }
                    (request, _) => panic!("Unexpected request: {request:?}"),
                }
            }
        });

        Self {
            client: CollectionClient::new(collection, sender),
            expectations,
            _handle: handle,
        }
    }

    pub fn client(&self) -> CollectionClient {
        self.client.clone()
    }

    pub fn expect_insert(&self) -> ExpectationBuilder<Document> {
        ExpectationBuilder::new(&self.expectations, Expectation::Insert)
    }

    pub fn expect_find_by_id(&self) -> ExpectationBuilder<Option<Document>> {
        ExpectationBuilder::new(&self.expectations, Expectation::FindById)
    }

    pub fn expect_find(&self) -> ExpectationBuilder<Vec<Document>> {
        ExpectationBuilder::new(&self.expectations, Expectation::Find)
    }

    pub fn expect_update_by_id(&self) -> ExpectationBuilder<Option<Document>> {
        ExpectationBuilder::new(&self.expectations, Expectation::UpdateById)
    }

    pub fn expect_remove_by_id(&self) -> ExpectationBuilder<Option<Document>> {
        ExpectationBuilder::new(&self.expectations, Expectation::RemoveById)
    }

    /// Panics if any queued expectation was never consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Queues the reply for one expected request.
pub struct ExpectationBuilder<T> {
    expectations: Queue,
    wrap: fn(Result<T, StorageError>) -> Expectation,
}

impl<T> ExpectationBuilder<T> {
    fn new(expectations: &Queue, wrap: fn(Result<T, StorageError>) -> Expectation) -> Self {
        Self {
            expectations: Arc::clone(expectations),
            wrap,
        }
    }

    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StorageError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, StorageError>) {
        self.expectations.lock().unwrap().push_back((self.wrap)(response));
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
pub fn create_mock_collection(
    collection: &str,
    buffer_size: usize,
) -> (CollectionClient, mpsc::Receiver<CollectionRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(collection, sender), receiver)
}

/// Helper to verify that the next message is an Insert request
pub async fn expect_insert(
    receiver: &mut mpsc::Receiver<CollectionRequest>,
) -> Option<(Params, Response<Document>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Insert { fields, respond_to }) => Some((fields, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a FindById request
pub async fn expect_find_by_id(
    receiver: &mut mpsc::Receiver<CollectionRequest>,
) -> Option<(String, Response<Option<Document>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::FindById { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Find request
pub async fn expect_find(
    receiver: &mut mpsc::Receiver<CollectionRequest>,
) -> Option<(Filter, Response<Vec<Document>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Find { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an UpdateById request
pub async fn expect_update_by_id(
    receiver: &mut mpsc::Receiver<CollectionRequest>,
) -> Option<(String, Params, Response<Option<Document>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::UpdateById {
            id,
            fields,
            respond_to,
        }) => Some((id, fields, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a RemoveById request
pub async fn expect_remove_by_id(
    receiver: &mut mpsc::Receiver<CollectionRequest>,
) -> Option<(String, Response<Option<Document>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::RemoveById { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageAdapter;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_mock_collection_channel() {
        let (client, mut receiver) = create_mock_collection("users", 10);

        let insert_task =
            tokio::spawn(async move { client.insert(fields(json!({ "name": "Ann" }))).await });

        let (payload, responder) = expect_insert(&mut receiver)
            .await
            .expect("Expected Insert request");
        assert_eq!(payload["name"], "Ann");
        responder.send(Ok(Document::new("u1", payload))).unwrap();

        let doc = insert_task.await.unwrap().unwrap();
        assert_eq!(doc.id, "u1");
    }

    #[tokio::test]
    async fn test_mock_collection_with_expectations() {
        let mock = MockCollection::new("users");
        mock.expect_insert().return_err(StorageError::Conflict {
            field: "email".into(),
            value: "a@b.io".into(),
        });
        mock.expect_find().return_ok(vec![]);

        let client = mock.client();
        let err = client.insert(fields(json!({ "email": "a@b.io" }))).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }));
        assert!(client.find(Filter::new()).await.unwrap().is_empty());

        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_surfaces_as_unavailable() {
        let mock = MockCollection::new("users");
        mock.expect_find().return_ok(vec![]);

        let err = mock.client().remove_by_id("u1").await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }
}
