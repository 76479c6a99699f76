//! The `addresses` resource service: the standard action set plus `listByUser`.

use crate::model::Address;
use action_framework::{
    ActionDef, ActionResult, CollectionActor, Document, FieldRule, Method, ResourceService, Schema,
    SharedAdapter, ValidatedParams,
};
use serde_json::Value;
use std::sync::Arc;

/// Service name; also the first path segment under the API prefix.
pub const SERVICE: &str = "addresses";
/// Entity name used in not-found messages.
pub const ENTITY: &str = "Address";

/// Creates the `addresses` collection actor and the service bound to it.
pub fn new(buffer_size: usize) -> (CollectionActor, ResourceService) {
    let (actor, adapter) = CollectionActor::new(SERVICE, buffer_size);
    (actor, service(Arc::new(adapter)))
}

/// Builds the service over any storage adapter.
pub fn service(adapter: SharedAdapter) -> ResourceService {
    ResourceService::new(SERVICE, adapter)
        .with_crud(ENTITY, Address::schemas())
        .action(
            ActionDef::new("listByUser", list_by_user)
                .rest(Method::Get, "/user/:userId")
                .params(Schema::new().field("userId", FieldRule::string())),
        )
}

/// Every address whose `userId` equals the given one, in insertion order.
async fn list_by_user(params: ValidatedParams, adapter: SharedAdapter) -> ActionResult {
    let docs = adapter.find(params.into_inner()).await?;
    Ok(Value::Array(docs.into_iter().map(Document::into_value).collect()))
}
