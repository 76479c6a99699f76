use super::config::{AppConfig, StorageUri};
use crate::clients::{AddressClient, UserClient};
use crate::{address_service, user_service};
use action_framework::{Broker, RouteTable, ServiceActor};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running set of actors, plus the handles needed to reach them.
pub struct AppSystem {
    /// Client for the `users` service
    pub user_client: UserClient,

    /// Client for the `addresses` service
    pub address_client: AddressClient,

    broker: Broker,
    routes: Arc<RouteTable>,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl AppSystem {
    /// Spawns the collection and service actors for both resources.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: &AppConfig) -> Self {
        match &config.storage {
            StorageUri::Memory { name } => info!(storage = %name, "Using in-memory document store"),
        }

        let mut broker = Broker::new();
        let mut routes = RouteTable::new(config.api_prefix.as_str());
        let mut handles = Vec::new();

        let resources = [
            user_service::new(config.buffer_size),
            address_service::new(config.buffer_size),
        ];
        for (collection, service) in resources {
            routes.mount(&service);
            let (actor, client) = ServiceActor::new(service, config.buffer_size);
            handles.push(tokio::spawn(collection.run()));
            handles.push(tokio::spawn(actor.run()));
            broker.register(client);
        }
        info!(routes = routes.len(), "System started");

        Self {
            user_client: UserClient::new(broker.clone()),
            address_client: AddressClient::new(broker.clone()),
            broker,
            routes: Arc::new(routes),
            handles,
        }
    }

    pub fn broker(&self) -> &Broker {
        &self.broker
    }

    pub fn routes(&self) -> Arc<RouteTable> {
        Arc::clone(&self.routes)
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Every other broker clone (e.g. the one held by the HTTP router) must already
    /// be dropped, otherwise this waits for it.
    ///
    /// Returns an error if any actor task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.user_client);
        drop(self.address_client);
        drop(self.broker);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
