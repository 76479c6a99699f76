//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the actors behind the service.
//!
//! ## Startup
//!
//! [`AppSystem::start`] creates one collection actor and one service actor per
//! resource, registers the services with a [`Broker`](action_framework::Broker) and
//! mounts their REST aliases in a [`RouteTable`](action_framework::RouteTable).
//! Nothing is wired through globals; every dependency is passed in.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop every broker handle** - closes the service channels.
//! 2. **Service actors drain** - in-flight calls finish, then the actor drops its
//!    storage adapter.
//! 3. **Collections stop** - once their last adapter is gone, `recv()` returns `None`.
//! 4. **Await completion** - [`AppSystem::shutdown`] joins every task.
//!
//! The HTTP server holds a broker clone too, so it must be stopped first.
//!
//! ## Configuration
//!
//! See [`config`] for flags and environment variables, and [`tracing`] for logging.

pub mod config;
pub mod system;
pub mod tracing;

pub use config::*;
pub use system::*;
pub use self::tracing::setup_tracing;
