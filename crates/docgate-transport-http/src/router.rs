//! Axum router for the document gateway.
//! Every route, `/health` included, sits behind the API key gate.

use axum::extract::State;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use docgate_runtime::AppContext;
use docgate_types::InstanceType;
use serde_json::json;

use crate::auth::{require_api_key, ApiKeyGate};
use crate::envelope::Envelope;
use crate::routes::{
    catalog_routes, datastore_routes, server_routes, user_routes, CONFIGURATION, INSTANCES,
    LOCALIZATION, PROXIES,
};

/// Shared state threaded through all axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Store access for every instance type.
    pub context: AppContext,
    /// The API key gate.
    pub gate: ApiKeyGate,
}

impl AppState {
    pub fn new(context: AppContext, gate: ApiKeyGate) -> Self {
        Self { context, gate }
    }
}

/// Builds the axum `Router` with every resource route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .nest("/datastore/game", datastore_routes(InstanceType::Game))
        .nest("/datastore/network", datastore_routes(InstanceType::Network))
        .nest("/user", user_routes())
        .nest("/server/instance", server_routes(INSTANCES))
        .nest("/server/proxy", server_routes(PROXIES))
        .nest("/configuration", catalog_routes(CONFIGURATION))
        .nest("/localization", catalog_routes(LOCALIZATION))
        .fallback(handle_unknown_route)
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            require_api_key,
        ))
        .with_state(state)
}

async fn handle_health(State(state): State<AppState>) -> Envelope {
    let loaded: Vec<_> = state
        .context
        .registry()
        .loaded_types()
        .into_iter()
        .map(|t| t.config_key())
        .collect();
    Envelope::ok(json!({"status": "ok", "service": "docgate", "instances": loaded}))
}

async fn handle_unknown_route() -> Envelope {
    Envelope::not_found("No such route.")
}
