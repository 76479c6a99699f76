use super::ClientError;
use action_framework::{Broker, Params};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Trait for resource-specific clients to inherit the standard read and delete calls.
///
/// Implementors name their service and resource type; `list`, `get` and `remove`
/// come for free.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// The document type the service returns.
    type Resource: DeserializeOwned + Send;

    /// Access the broker the calls go through.
    fn broker(&self) -> &Broker;

    /// The service name, e.g. `"users"`.
    fn service(&self) -> &'static str;

    /// Calls `<service>.<action>` and returns the raw reply.
    async fn call(&self, action: &str, params: Params) -> Result<Value, ClientError> {
        let name = format!("{}.{}", self.service(), action);
        Ok(self.broker().call(&name, params).await?)
    }

    /// Fetch every document in the collection.
    #[tracing::instrument(skip(self), fields(service = self.service()))]
    async fn list(&self) -> Result<Vec<Self::Resource>, ClientError> {
        tracing::debug!("Sending request");
        decode(self.call("list", Params::new()).await?)
    }

    /// Fetch a document by id.
    #[tracing::instrument(skip(self), fields(service = self.service()))]
    async fn get(&self, id: &str) -> Result<Self::Resource, ClientError> {
        tracing::debug!("Sending request");
        decode(self.call("get", id_param(id)).await?)
    }

    /// Delete a document by id, returning it.
    #[tracing::instrument(skip(self), fields(service = self.service()))]
    async fn remove(&self, id: &str) -> Result<Self::Resource, ClientError> {
        tracing::debug!("Sending request");
        decode(self.call("remove", id_param(id)).await?)
    }
}

pub(crate) fn id_param(id: &str) -> Params {
    let mut params = Params::new();
    params.insert("id".to_string(), Value::String(id.to_string()));
    params
}

/// Serializes a payload struct into a parameter object.
pub(crate) fn to_params(payload: &impl Serialize) -> Result<Params, ClientError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ClientError::Payload(format!("expected an object, got {other}"))),
        Err(e) => Err(ClientError::Payload(e.to_string())),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}
