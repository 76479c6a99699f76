use action_framework::mock::MockCollection;
use action_framework::{
    ActionDef, Broker, CollectionActor, CrudSchemas, Document, FieldRule, FrameworkError, Method,
    Params, ResourceService, RouteTable, Schema, ServiceActor, SharedAdapter, StorageAdapter,
    StorageError, ValidatedParams,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

async fn by_owner(
    params: ValidatedParams,
    adapter: SharedAdapter,
) -> action_framework::ActionResult {
    let filter = params.into_inner();
    let docs = adapter.find(filter).await?;
    Ok(Value::Array(docs.into_iter().map(Document::into_value).collect()))
}

fn books(adapter: SharedAdapter) -> ResourceService {
    ResourceService::new("books", adapter)
        .with_crud(
            "Book",
            CrudSchemas {
                create: Schema::parse(&[("title", "string|empty:false"), ("owner", "string")])
                    .unwrap(),
                update: Schema::parse(&[("title", "string|empty:false|optional")]).unwrap(),
            },
        )
        .action(
            ActionDef::new("byOwner", by_owner)
                .rest(Method::Get, "/owner/:owner")
                .params(Schema::new().field("owner", FieldRule::string())),
        )
}

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (collection, adapter) = CollectionActor::new("books", 16);
    let collection_handle = tokio::spawn(collection.run());

    let service = books(Arc::new(adapter));
    let mut routes = RouteTable::new("/api");
    routes.mount(&service);
    assert_eq!(routes.len(), 6);

    let (actor, client) = ServiceActor::new(service, 16);
    let service_handle = tokio::spawn(actor.run());
    let mut broker = Broker::new();
    broker.register(client);

    // Create through the alias table, the way an HTTP gateway would.
    let create = routes
        .resolve(
            Method::Post,
            "/api/books",
            Params::new(),
            params(json!({ "title": "Dune", "owner": "ann" })),
        )
        .unwrap();
    assert_eq!(create.action, "books.create");
    let dune = broker.call(&create.action, create.params).await.unwrap();
    let id = dune["id"].as_str().unwrap().to_string();

    broker
        .call("books.create", params(json!({ "title": "Emma", "owner": "bob" })))
        .await
        .unwrap();

    // Custom action behind a nested alias.
    let mine = routes
        .resolve(Method::Get, "/api/books/owner/ann", Params::new(), Params::new())
        .unwrap();
    let owned = broker.call(&mine.action, mine.params).await.unwrap();
    assert_eq!(owned, json!([dune.clone()]));

    // Update merges; id in the path wins over any id in the body.
    let update = routes
        .resolve(
            Method::Put,
            &format!("/api/books/{id}"),
            Params::new(),
            params(json!({ "id": "spoofed", "title": "Dune Messiah" })),
        )
        .unwrap();
    let updated = broker.call(&update.action, update.params).await.unwrap();
    assert_eq!(updated, json!({ "id": id, "title": "Dune Messiah", "owner": "ann" }));

    // Remove, then the id is gone.
    let removed = broker.call("books.remove", params(json!({ "id": id }))).await.unwrap();
    assert_eq!(removed, updated);
    let err = broker.call("books.get", params(json!({ "id": id }))).await.unwrap_err();
    assert_eq!(err, FrameworkError::not_found("Book", id.as_str()));

    drop(broker);
    service_handle.await.unwrap();
    collection_handle.await.unwrap();
}

#[tokio::test]
async fn test_validation_failure_never_reaches_storage() {
    // No expectations queued: any storage call would panic the mock.
    let mock = MockCollection::new("books");
    let service = books(Arc::new(mock.client()));

    let err = service
        .call("create", params(json!({ "title": "", "extra": 1 })))
        .await
        .unwrap_err();
    let FrameworkError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.has_field("title"));
    assert!(errors.has_field("owner"));
    assert_eq!(errors.len(), 2);
    mock.verify();
}

#[tokio::test]
async fn test_storage_failures_map_to_framework_errors() {
    let mock = MockCollection::new("books");
    mock.expect_insert().return_err(StorageError::Conflict {
        field: "title".into(),
        value: "Dune".into(),
    });
    mock.expect_find().return_err(StorageError::Unavailable("disk gone".into()));
    let service = books(Arc::new(mock.client()));

    let err = service
        .call("create", params(json!({ "title": "Dune", "owner": "ann" })))
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::Conflict(_)));

    let err = service.call("list", Params::new()).await.unwrap_err();
    assert_eq!(err, FrameworkError::StorageUnavailable("disk gone".into()));
    mock.verify();
}
