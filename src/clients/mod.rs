//! Typed wrappers around [`Broker`](action_framework::Broker) calls.
//!
//! Each client serializes its payload into a parameter bag, calls the service's
//! action by name and decodes the reply into the resource type.

pub mod address_client;
pub mod error;
pub mod traits;
pub mod user_client;

pub use address_client::*;
pub use error::*;
pub use traits::*;
pub use user_client::*;
