//! # Address Client
//!
//! Provides a high-level API for the `addresses` service.

use super::traits::{decode, id_param, to_params};
use super::{ClientError, ResourceClient};
use crate::address_service;
use crate::model::{Address, AddressCreate, AddressUpdate};
use action_framework::{Broker, Params};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

/// Client for the `addresses` service.
#[derive(Clone)]
pub struct AddressClient {
    broker: Broker,
}

impl AddressClient {
    pub fn new(broker: Broker) -> Self {
        Self { broker }
    }

    #[instrument(skip(self, params), fields(user_id = %params.user_id))]
    pub async fn create_address(&self, params: AddressCreate) -> Result<Address, ClientError> {
        debug!("Sending request");
        decode(self.call("create", to_params(&params)?).await?)
    }

    #[instrument(skip(self, update))]
    pub async fn update_address(
        &self,
        id: &str,
        update: AddressUpdate,
    ) -> Result<Address, ClientError> {
        debug!("Sending request");
        let mut params = to_params(&update)?;
        params.extend(id_param(id));
        decode(self.call("update", params).await?)
    }

    /// Every address owned by `user_id`.
    #[instrument(skip(self))]
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Address>, ClientError> {
        debug!("Sending request");
        let mut params = Params::new();
        params.insert("userId".to_string(), Value::String(user_id.to_string()));
        decode(self.call("listByUser", params).await?)
    }
}

#[async_trait]
impl ResourceClient for AddressClient {
    type Resource = Address;

    fn broker(&self) -> &Broker {
        &self.broker
    }

    fn service(&self) -> &'static str {
        address_service::SERVICE
    }
}
