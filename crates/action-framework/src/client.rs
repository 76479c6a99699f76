//! # Collection Client
//!
//! The handle services use to reach a [`CollectionActor`](crate::actor::CollectionActor).

use crate::error::StorageError;
use crate::message::CollectionRequest;
use crate::params::Params;
use crate::storage::{Document, Filter, StorageAdapter};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// ## CollectionClient
///
/// Forwards each [`StorageAdapter`] call over a Tokio mpsc channel and awaits the reply
/// on a oneshot channel. It holds only a sender and the collection name, so cloning is
/// cheap and clones can be shared across tasks.
///
/// When the actor is gone the client reports [`StorageError::Unavailable`].
#[derive(Clone)]
pub struct CollectionClient {
    collection: Arc<str>,
    sender: mpsc::Sender<CollectionRequest>,
}

impl CollectionClient {
    pub fn new(collection: impl Into<Arc<str>>, sender: mpsc::Sender<CollectionRequest>) -> Self {
        Self {
            collection: collection.into(),
            sender,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, StorageError>>) -> CollectionRequest,
    ) -> Result<T, StorageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(build(respond_to)).await.map_err(|_| {
            StorageError::Unavailable(format!("collection '{}' is closed", self.collection))
        })?;
        response.await.map_err(|_| {
            StorageError::Unavailable(format!(
                "collection '{}' dropped the request",
                self.collection
            ))
        })?
    }
}

#[async_trait]
impl StorageAdapter for CollectionClient {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn insert(&self, fields: Params) -> Result<Document, StorageError> {
        self.request(|respond_to| CollectionRequest::Insert { fields, respond_to })
            .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StorageError> {
        let id = id.to_string();
        self.request(|respond_to| CollectionRequest::FindById { id, respond_to })
            .await
    }

    async fn find(&self, filter: Filter) -> Result<Vec<Document>, StorageError> {
        self.request(|respond_to| CollectionRequest::Find { filter, respond_to })
            .await
    }

    async fn update_by_id(
        &self,
        id: &str,
        fields: Params,
    ) -> Result<Option<Document>, StorageError> {
        let id = id.to_string();
        self.request(|respond_to| CollectionRequest::UpdateById {
            id,
            fields,
            respond_to,
        })
        .await
    }

    async fn remove_by_id(&self, id: &str) -> Result<Option<Document>, StorageError> {
        let id = id.to_string();
        self.request(|respond_to| CollectionRequest::RemoveById { id, respond_to })
            .await
    }
}
