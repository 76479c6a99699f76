//! The `users` resource service.

use crate::model::User;
use action_framework::{CollectionActor, ResourceService, SharedAdapter};
use std::sync::Arc;

/// Service name; also the first path segment under the API prefix.
pub const SERVICE: &str = "users";
/// Entity name used in not-found messages.
pub const ENTITY: &str = "User";

/// Creates the `users` collection actor and the service bound to it.
///
/// The collection enforces unique emails.
pub fn new(buffer_size: usize) -> (CollectionActor, ResourceService) {
    let (actor, adapter) = CollectionActor::new(SERVICE, buffer_size);
    let service = service(Arc::new(adapter));
    (actor.unique("email"), service)
}

/// Builds the service over any storage adapter.
pub fn service(adapter: SharedAdapter) -> ResourceService {
    ResourceService::new(SERVICE, adapter).with_crud(ENTITY, User::schemas())
}
