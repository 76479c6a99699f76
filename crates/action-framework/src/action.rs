//! # Action Definitions
//!
//! An [`ActionDef`] is the unit a resource service is made of: a name, an optional
//! REST alias, a parameter [`Schema`] and a handler. The handler receives the
//! [`ValidatedParams`] and the owning service's [`SharedAdapter`] at call time, so
//! actions never hold storage state themselves.

use crate::error::FrameworkError;
use crate::params::ValidatedParams;
use crate::storage::SharedAdapter;
use crate::validator::Schema;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

/// What every action handler returns.
pub type ActionResult = Result<Value, FrameworkError>;

/// HTTP verbs a REST alias can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl FromStr for Method {
    type Err = FrameworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(FrameworkError::BadRequest(format!("unsupported method: {other}"))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// A verb plus a path template relative to the service's base path, e.g. `GET /:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestAlias {
    pub method: Method,
    pub path: String,
}

/// Executes an action against validated input.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, params: ValidatedParams, adapter: SharedAdapter) -> ActionResult;
}

#[async_trait]
impl<F, Fut> ActionHandler for F
where
    F: Fn(ValidatedParams, SharedAdapter) -> Fut + Send + Sync,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    async fn handle(&self, params: ValidatedParams, adapter: SharedAdapter) -> ActionResult {
        (self)(params, adapter).await
    }
}

/// A named, schema-carrying, handler-carrying operation.
#[derive(Clone)]
pub struct ActionDef {
    name: String,
    rest: Option<RestAlias>,
    params: Schema,
    handler: Arc<dyn ActionHandler>,
}

impl ActionDef {
    pub fn new(name: impl Into<String>, handler: impl ActionHandler + 'static) -> Self {
        Self {
            name: name.into(),
            rest: None,
            params: Schema::new(),
            handler: Arc::new(handler),
        }
    }

    /// Binds the action to a REST alias, e.g. `rest(Method::Get, "/:id")`.
    pub fn rest(mut self, method: Method, path: impl Into<String>) -> Self {
        self.rest = Some(RestAlias {
            method,
            path: path.into(),
        });
        self
    }

    pub fn params(mut self, schema: Schema) -> Self {
        self.params = schema;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rest_alias(&self) -> Option<&RestAlias> {
        self.rest.as_ref()
    }

    pub fn schema(&self) -> &Schema {
        &self.params
    }

    pub(crate) fn handler(&self) -> Arc<dyn ActionHandler> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("name", &self.name)
            .field("rest", &self.rest)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop(_params: ValidatedParams, _adapter: SharedAdapter) -> ActionResult {
        Ok(Value::Null)
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert!(matches!("FETCH".parse::<Method>(), Err(FrameworkError::BadRequest(_))));
    }

    #[test]
    fn test_action_def_builder() {
        let def = ActionDef::new("get", noop).rest(Method::Get, "/:id");
        assert_eq!(def.name(), "get");
        assert_eq!(def.rest_alias().map(|a| a.method), Some(Method::Get));
        assert!(def.schema().is_empty());
    }
}
