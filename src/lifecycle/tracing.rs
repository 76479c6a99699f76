//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber: compact format, no
//! module targets, level filter taken from `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: every collection and service actor logs `Actor started`
//!   and `Shutdown` with its `collection` / `service` field.
//! - **Storage operations**: `Inserted`, `Updated`, `Removed` at info with `%id` and
//!   the collection `size`; reads and misses at debug.
//! - **Calls**: each broker call runs inside a `call{service, action}` span; failed
//!   calls are logged once at warn by the service actor.
//! - **HTTP**: the gateway logs each resolved request and every 5xx response.
//!
//! Payload contents are never logged, only field counts.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle and writes
//! RUST_LOG=info STORAGE_URI=memory://dev cargo run
//!
//! # Every request, read and validation step
//! RUST_LOG=debug STORAGE_URI=memory://dev cargo run
//!
//! # Only the framework
//! RUST_LOG=action_framework=debug STORAGE_URI=memory://dev cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! `POST /api/users` followed by a duplicate, with `RUST_LOG=info`:
//!
//! ```text
//! INFO Actor started collection="users"
//! INFO Actor started service="users"
//! INFO Request method=POST path="/api/users" action="users.create"
//! INFO call:Inserted collection="users" id="9f0c..." size=1
//! INFO Request method=POST path="/api/users" action="users.create"
//! WARN call:Insert rejected collection="users" field="email"
//! WARN call:Call failed error=Conflict: Duplicate value for unique field 'email'
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
