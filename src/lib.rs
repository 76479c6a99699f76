//! # Address Book
//!
//! REST CRUD over two resources, users and their postal addresses, built from
//! declarative actions on top of [`action_framework`].
//!
//! ## Request Flow
//!
//! ```text
//! HTTP request
//!   -> RouteTable::resolve      (verb + path -> "addresses.listByUser", merged params)
//!   -> Broker::call             (service actor, one task per call)
//!   -> validate(schema, params) (every violation collected; handler never runs on failure)
//!   -> action handler           (storage adapter calls)
//!   -> collection actor         (one message at a time, so each write is atomic)
//! ```
//!
//! ## Module Tour
//!
//! ### 1. The Resources ([`model`], [`user_service`], [`address_service`])
//! Typed documents, their parameter schemas, and the services built from them. Both
//! services get the standard `list`/`create`/`get`/`update`/`remove` set; addresses
//! add `listByUser`.
//!
//! ### 2. The Interface ([`clients`], [`http`])
//! [`UserClient`](clients::UserClient) and [`AddressClient`](clients::AddressClient)
//! give typed access to the broker; the [`http`] gateway exposes the same actions as
//! JSON endpoints under the API prefix.
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! Configuration, tracing setup, and [`AppSystem`](lifecycle::AppSystem), which spawns
//! and stops every actor.
//!
//! ## Running
//!
//! ```bash
//! STORAGE_URI=memory://dev RUST_LOG=info cargo run
//! ```

pub mod address_service;
pub mod clients;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod user_service;
