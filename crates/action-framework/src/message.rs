//! # Collection Messages
//!
//! The request enum a [`CollectionClient`](crate::client::CollectionClient) sends to its
//! [`CollectionActor`](crate::actor::CollectionActor). One variant per storage
//! operation, each carrying a oneshot sender for the reply.

use crate::error::StorageError;
use crate::params::Params;
use crate::storage::{Document, Filter};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by collection actors.
pub type Response<T> = oneshot::Sender<Result<T, StorageError>>;

/// Internal message type sent to a collection actor.
#[derive(Debug)]
pub enum CollectionRequest {
    Insert {
        fields: Params,
        respond_to: Response<Document>,
    },
    FindById {
        id: String,
        respond_to: Response<Option<Document>>,
    },
    Find {
        filter: Filter,
        respond_to: Response<Vec<Document>>,
    },
    UpdateById {
        id: String,
        fields: Params,
        respond_to: Response<Option<Document>>,
    },
    RemoveById {
        id: String,
        respond_to: Response<Option<Document>>,
    },
}
