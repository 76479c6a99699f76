//! HTTP gateway: turns requests into broker calls through the route table.

pub mod error;
pub mod router;

pub use error::ApiError;
pub use router::{router, AppState};
