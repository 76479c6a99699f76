//! # Action Framework
//!
//! This crate provides the building blocks for small resource services: named actions
//! with declared parameter schemas, a broker that dispatches calls to them, and an
//! actor-backed document store they persist through.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into four layers:
//!
//! 1. **Validation Layer** ([`Schema`], [`validate`]) - declared input rules, checked
//!    before any handler runs. Every violation is reported, not just the first.
//! 2. **Action Layer** ([`ActionDef`], [`ResourceService`]) - named operations and the
//!    standard CRUD set produced by [`crud_actions`].
//! 3. **Dispatch Layer** ([`Broker`], [`RouteTable`]) - `service.action` calls and the
//!    REST alias table that maps verb + path onto them.
//! 4. **Storage Layer** ([`StorageAdapter`], [`CollectionActor`]) - per-resource
//!    document collections behind a narrow async trait.
//!
//! ## Concurrency Model
//!
//! Each collection is a Tokio actor that owns its documents and processes one message
//! at a time, so a single insert, update or delete is atomic. Services run behind a
//! [`ServiceActor`] that spawns every call into its own task, so calls to one service
//! interleave wherever a handler awaits storage.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Example
//!
//! ```rust
//! use action_framework::{
//!     Broker, CollectionActor, CrudSchemas, FieldRule, ResourceService, Schema, ServiceActor,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Storage
//!     let (collection, adapter) = CollectionActor::new("notes", 10);
//!     tokio::spawn(collection.run());
//!
//!     // 2. Service with the standard action set
//!     let service = ResourceService::new("notes", Arc::new(adapter)).with_crud(
//!         "Note",
//!         CrudSchemas {
//!             create: Schema::new().field("title", FieldRule::string().non_empty()),
//!             update: Schema::new().field("title", FieldRule::string().optional()),
//!         },
//!     );
//!     let (actor, client) = ServiceActor::new(service, 10);
//!     tokio::spawn(actor.run());
//!
//!     // 3. Dispatch
//!     let mut broker = Broker::new();
//!     broker.register(client);
//!
//!     let params = json!({ "title": "hello" }).as_object().cloned().unwrap();
//!     let note = broker.call("notes.create", params).await.unwrap();
//!     assert_eq!(note["title"], "hello");
//!
//!     let rejected = broker.call("notes.create", Default::default()).await;
//!     assert!(rejected.is_err());
//! }
//! ```

pub mod action;
pub mod actor;
pub mod broker;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod params;
pub mod route;
pub mod service;
pub mod storage;
pub mod validator;

pub use action::{ActionDef, ActionHandler, ActionResult, Method, RestAlias};
pub use actor::CollectionActor;
pub use broker::{Broker, ServiceActor, ServiceClient};
pub use client::CollectionClient;
pub use error::{FrameworkError, Rule, StorageError, ValidationError, ValidationErrors};
pub use message::CollectionRequest;
pub use params::{Params, ValidatedParams};
pub use route::{Resolution, RouteTable};
pub use service::{crud_actions, CrudSchemas, ResourceService};
pub use storage::{Document, Filter, SharedAdapter, StorageAdapter};
pub use validator::{validate, FieldRule, FieldType, Schema, SchemaError};
