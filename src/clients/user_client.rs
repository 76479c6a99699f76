//! # User Client
//!
//! Provides a high-level API for the `users` service.

use super::traits::{decode, id_param, to_params};
use super::{ClientError, ResourceClient};
use crate::model::{User, UserCreate, UserUpdate};
use crate::user_service;
use action_framework::Broker;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the `users` service.
#[derive(Clone)]
pub struct UserClient {
    broker: Broker,
}

impl UserClient {
    pub fn new(broker: Broker) -> Self {
        Self { broker }
    }

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create_user(&self, params: UserCreate) -> Result<User, ClientError> {
        debug!("Sending request");
        decode(self.call("create", to_params(&params)?).await?)
    }

    /// Applies the set fields of `update`; the rest keep their stored values.
    #[instrument(skip(self, update))]
    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Result<User, ClientError> {
        debug!("Sending request");
        let mut params = to_params(&update)?;
        params.extend(id_param(id));
        decode(self.call("update", params).await?)
    }
}

#[async_trait]
impl ResourceClient for UserClient {
    type Resource = User;

    fn broker(&self) -> &Broker {
        &self.broker
    }

    fn service(&self) -> &'static str {
        user_service::SERVICE
    }
}
