use axum::{
    Router, middleware,
    routing::{get, patch},
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{
        health::health_check,
        orders::{list_orders, update_order_status},
        webhook::{receive_webhook, verify_webhook},
    },
    middleware::auth::operator_auth_middleware,
    state::AppState,
};

/// Builds the application router with `/api/v1` nesting.
pub fn build_router(state: AppState) -> Router {
    let operator_routes = Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{id}/status", patch(update_order_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            operator_auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .merge(operator_routes);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
