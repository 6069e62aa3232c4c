//! HTTP surface of the service, nested under `/api`.

pub mod error;
pub mod handlers;

use crate::application::orchestrator::ProvisioningOrchestrator;
use crate::application::registry::TokenRegistry;
use crate::domain::catalog::ReferenceCatalog;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ReferenceCatalog>,
    pub orchestrator: Arc<ProvisioningOrchestrator>,
    pub registry: Arc<TokenRegistry>,
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/cards/details", get(handlers::card_details))
        .route("/cards/transactions", get(handlers::list_transactions))
        .route("/cards/transactions/:id", get(handlers::transaction_details))
        .route("/push-provisioning", post(handlers::provision))
        .route(
            "/push-provisioning/status/:request_id",
            get(handlers::provisioning_status),
        )
        .route("/push-provisioning/merchants", get(handlers::merchants))
        .route("/tokens", get(handlers::list_tokens))
        .route(
            "/tokens/:id",
            get(handlers::get_token)
                .put(handlers::update_token)
                .delete(handlers::delete_token),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
