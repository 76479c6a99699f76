//! Typed resource documents, their request payloads, and the parameter schemas the
//! services validate them with.

pub mod address;
pub mod user;

pub use address::*;
pub use user::*;
