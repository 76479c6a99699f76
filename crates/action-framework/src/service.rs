//! # Resource Services
//!
//! A [`ResourceService`] is a named set of [`ActionDef`]s sharing one storage
//! adapter. Calling an action looks the definition up, validates the raw
//! parameters against its schema and only then runs the handler.
//!
//! The five standard actions (`list`, `create`, `get`, `update`, `remove`) are
//! produced by [`crud_actions`] from a pair of schemas, so every resource gets the
//! same behavior without sharing code through inheritance.

use crate::action::{ActionDef, ActionResult, Method};
use crate::error::FrameworkError;
use crate::params::{Params, ValidatedParams};
use crate::storage::{Filter, SharedAdapter};
use crate::validator::{validate, FieldRule, Schema};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// The schemas that parameterize the standard action set.
#[derive(Debug, Clone)]
pub struct CrudSchemas {
    /// Fields accepted by `create`.
    pub create: Schema,
    /// Mutable fields accepted by `update`, normally all optional. `id` is added.
    pub update: Schema,
}

/// A named set of actions over one storage adapter.
pub struct ResourceService {
    name: String,
    adapter: SharedAdapter,
    actions: IndexMap<String, ActionDef>,
}

impl ResourceService {
    pub fn new(name: impl Into<String>, adapter: SharedAdapter) -> Self {
        Self {
            name: name.into(),
            adapter,
            actions: IndexMap::new(),
        }
    }

    /// Adds the five standard actions for `entity` (used in not-found messages).
    pub fn with_crud(self, entity: &str, schemas: CrudSchemas) -> Self {
        crud_actions(entity, schemas)
            .into_iter()
            .fold(self, |service, def| service.action(def))
    }

    /// Adds an action, replacing any existing action with the same name.
    pub fn action(mut self, def: ActionDef) -> Self {
        self.actions.insert(def.name().to_string(), def);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionDef> {
        self.actions.values()
    }

    pub fn get_action(&self, name: &str) -> Option<&ActionDef> {
        self.actions.get(name)
    }

    /// Validates `raw` against the action's schema and runs its handler.
    #[instrument(skip(self, raw), fields(service = %self.name))]
    pub async fn call(&self, action: &str, raw: Params) -> ActionResult {
        let def = self
            .actions
            .get(action)
            .ok_or_else(|| FrameworkError::UnknownAction(format!("{}.{}", self.name, action)))?;

        let params = validate(def.schema(), &raw)?;
        debug!(fields = params.as_params().len(), "Params validated");

        def.handler().handle(params, Arc::clone(&self.adapter)).await
    }
}

/// Builds the standard `list`/`create`/`get`/`update`/`remove` action set.
pub fn crud_actions(entity: &str, schemas: CrudSchemas) -> Vec<ActionDef> {
    let entity: Arc<str> = Arc::from(entity);
    let id_schema = Schema::new().field("id", FieldRule::string());
    let update_schema = schemas
        .update
        .fields()
        .fold(id_schema.clone(), |schema, (name, rule)| schema.field(name, rule.clone()));

    let get_entity = Arc::clone(&entity);
    let update_entity = Arc::clone(&entity);
    let remove_entity = entity;

    vec![
        ActionDef::new("list", list).rest(Method::Get, "/"),
        ActionDef::new("create", create)
            .rest(Method::Post, "/")
            .params(schemas.create),
        ActionDef::new("get", move |params: ValidatedParams, adapter: SharedAdapter| {
            get(Arc::clone(&get_entity), params, adapter)
        })
        .rest(Method::Get, "/:id")
        .params(id_schema.clone()),
        ActionDef::new("update", move |params: ValidatedParams, adapter: SharedAdapter| {
            update(Arc::clone(&update_entity), params, adapter)
        })
        .rest(Method::Put, "/:id")
        .params(update_schema),
        ActionDef::new("remove", move |params: ValidatedParams, adapter: SharedAdapter| {
            remove(Arc::clone(&remove_entity), params, adapter)
        })
        .rest(Method::Delete, "/:id")
        .params(id_schema),
    ]
}

async fn list(_params: ValidatedParams, adapter: SharedAdapter) -> ActionResult {
    let docs = adapter.find(Filter::new()).await?;
    Ok(Value::Array(docs.into_iter().map(|d| d.into_value()).collect()))
}

async fn create(params: ValidatedParams, adapter: SharedAdapter) -> ActionResult {
    let doc = adapter.insert(params.into_inner()).await?;
    Ok(doc.into_value())
}

async fn get(entity: Arc<str>, params: ValidatedParams, adapter: SharedAdapter) -> ActionResult {
    let id = params.require_str("id")?;
    adapter
        .find_by_id(id)
        .await?
        .map(|d| d.into_value())
        .ok_or_else(|| FrameworkError::not_found(entity.as_ref(), id))
}

async fn update(entity: Arc<str>, params: ValidatedParams, adapter: SharedAdapter) -> ActionResult {
    let id = params.require_str("id")?.to_string();
    let fields = params.without(&["id"]);
    adapter
        .update_by_id(&id, fields)
        .await?
        .map(|d| d.into_value())
        .ok_or_else(|| FrameworkError::not_found(entity.as_ref(), id))
}

async fn remove(entity: Arc<str>, params: ValidatedParams, adapter: SharedAdapter) -> ActionResult {
    let id = params.require_str("id")?;
    adapter
        .remove_by_id(id)
        .await?
        .map(|d| d.into_value())
        .ok_or_else(|| FrameworkError::not_found(entity.as_ref(), id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::CollectionActor;
    use crate::error::Rule;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn notes_service() -> ResourceService {
        let (actor, client) = CollectionActor::new("notes", 10);
        tokio::spawn(actor.run());
        ResourceService::new("notes", Arc::new(client)).with_crud(
            "Note",
            CrudSchemas {
                create: Schema::new()
                    .field("title", FieldRule::string().non_empty())
                    .field("body", FieldRule::string()),
                update: Schema::new()
                    .field("title", FieldRule::string().non_empty().optional())
                    .field("body", FieldRule::string().optional()),
            },
        )
    }

    #[tokio::test]
    async fn test_crud_action_set_is_registered() {
        let service = notes_service();
        let names: Vec<&str> = service.actions().map(|a| a.name()).collect();
        assert_eq!(names, vec!["list", "create", "get", "update", "remove"]);
        assert!(service.get_action("update").unwrap().schema().get("id").is_some());
    }

    #[tokio::test]
    async fn test_update_merges_given_fields() {
        let service = notes_service();
        let created = service
            .call("create", params(json!({ "title": "Draft", "body": "text" })))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let updated = service
            .call("update", params(json!({ "id": id, "title": "Final" })))
            .await
            .unwrap();
        assert_eq!(updated, json!({ "id": id, "title": "Final", "body": "text" }));
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let service = notes_service();
        for action in ["get", "update", "remove"] {
            let err = service.call(action, params(json!({ "id": "missing" }))).await.unwrap_err();
            assert_eq!(err, FrameworkError::not_found("Note", "missing"), "action {action}");
        }
    }

    #[tokio::test]
    async fn test_validation_runs_before_handler() {
        let service = notes_service();
        let err = service.call("create", params(json!({ "title": "" }))).await.unwrap_err();
        let FrameworkError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        let rules: Vec<(String, Rule)> = errors.iter().map(|e| (e.field.clone(), e.rule)).collect();
        assert_eq!(
            rules,
            vec![("title".to_string(), Rule::Empty), ("body".to_string(), Rule::Required)]
        );

        let all = service.call("list", Params::new()).await.unwrap();
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let service = notes_service();
        let err = service.call("archive", Params::new()).await.unwrap_err();
        assert_eq!(err, FrameworkError::UnknownAction("notes.archive".into()));
    }
}
