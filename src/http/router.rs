//! Axum router: `/health` plus a fallback that resolves every other request
//! through the [`RouteTable`] and forwards it to the [`Broker`].

use super::ApiError;
use action_framework::{Broker, Method, Params, RouteTable};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{self, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub broker: Broker,
    pub routes: Arc<RouteTable>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(dispatch)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Resolves verb + path to an action, merges query, body and path parameters,
/// and calls the action. `POST` successes answer 201, everything else 200.
async fn dispatch(
    State(state): State<AppState>,
    method: http::Method,
    uri: Uri,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let verb: Method = method.as_str().parse()?;
    let Query(query) = query?;
    let query: Params = query
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
    let body = parse_body(&body)?;

    let resolved = state.routes.resolve(verb, uri.path(), query, body)?;
    info!(method = %verb, path = uri.path(), action = %resolved.action, "Request");

    let result = state.broker.call(&resolved.action, resolved.params).await?;
    let status = match verb {
        Method::Post => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    Ok((status, Json(result)).into_response())
}

/// An empty body is an empty object; anything else must be a JSON object.
fn parse_body(body: &[u8]) -> Result<Params, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Params::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::bad_request("request body must be a JSON object")),
        Err(e) => Err(ApiError::bad_request(format!("invalid JSON body: {e}"))),
    }
}
