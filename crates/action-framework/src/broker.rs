//! # Service Broker
//!
//! The dispatch substrate. Each [`ResourceService`] runs behind a [`ServiceActor`];
//! the [`Broker`] routes a fully qualified action name (`"users.get"`) to the
//! right actor and hands the reply back.
//!
//! Unlike a [`CollectionActor`](crate::actor::CollectionActor), a service actor does
//! not run calls one after another: every call is executed in its own task, so calls
//! interleave wherever a handler awaits its storage adapter.

use crate::action::ActionResult;
use crate::error::FrameworkError;
use crate::params::Params;
use crate::service::ResourceService;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn, Instrument};

/// A call addressed to one service.
#[derive(Debug)]
pub struct ServiceRequest {
    pub action: String,
    pub params: Params,
    pub respond_to: oneshot::Sender<ActionResult>,
}

/// Runs one [`ResourceService`] and serves calls from its [`ServiceClient`].
pub struct ServiceActor {
    service: Arc<ResourceService>,
    receiver: mpsc::Receiver<ServiceRequest>,
}

impl ServiceActor {
    pub fn new(service: ResourceService, buffer_size: usize) -> (Self, ServiceClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let name: Arc<str> = Arc::from(service.name());
        let actor = Self {
            service: Arc::new(service),
            receiver,
        };
        (actor, ServiceClient { name, sender })
    }

    /// Runs until every client is dropped, then waits for in-flight calls.
    pub async fn run(mut self) {
        let service = self.service.name().to_string();
        let service = service.as_str();
        info!(service, "Actor started");

        let mut in_flight = JoinSet::new();
        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(ServiceRequest { action, params, respond_to }) = msg else {
                        break;
                    };
                    debug!(service, %action, "Call");
                    let target = Arc::clone(&self.service);
                    let span = tracing::info_span!("call", service, %action);
                    in_flight.spawn(
                        async move {
                            let result = target.call(&action, params).await;
                            if let Err(e) = &result {
                                warn!(error = %e, "Call failed");
                            }
                            let _ = respond_to.send(result);
                        }
                        .instrument(span),
                    );
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        warn!(service, error = %e, "Call task failed");
                    }
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                warn!(service, error = %e, "Call task failed");
            }
        }
        info!(service, "Shutdown");
    }
}

/// Sends calls to one [`ServiceActor`].
#[derive(Clone)]
pub struct ServiceClient {
    name: Arc<str>,
    sender: mpsc::Sender<ServiceRequest>,
}

impl ServiceClient {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn call(&self, action: &str, params: Params) -> ActionResult {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest {
                action: action.to_string(),
                params,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::Internal(format!("service '{}' is closed", self.name)))?;
        response
            .await
            .map_err(|_| {
                FrameworkError::Internal(format!("service '{}' dropped the call", self.name))
            })?
    }
}

/// Routes `service.action` names to registered services.
#[derive(Clone, Default)]
pub struct Broker {
    services: HashMap<String, ServiceClient>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service under its own name.
    pub fn register(&mut self, client: ServiceClient) {
        info!(service = client.name(), "Service registered");
        self.services.insert(client.name().to_string(), client);
    }

    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Calls a fully qualified action such as `"addresses.listByUser"`.
    #[instrument(skip(self, params))]
    pub async fn call(&self, action: &str, params: Params) -> ActionResult {
        let (service, local) = action
            .split_once('.')
            .ok_or_else(|| FrameworkError::UnknownAction(action.to_string()))?;
        let client = self
            .services
            .get(service)
            .ok_or_else(|| FrameworkError::UnknownAction(action.to_string()))?;
        debug!("Sending request");
        client.call(local, params).await
    }
}
