//! Operator authentication middleware.
//!
//! Operator identity management lives outside this service; all it
//! hands us is a per-restaurant API key. This middleware resolves the
//! `X-Api-Key` header to its restaurant and injects an
//! [`OperatorIdentity`] into request extensions, which is what scopes
//! every downstream query to the caller's tenant.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    queries,
    state::AppState,
};

/// The tenant on whose behalf an operator request runs.
#[derive(Debug, Clone)]
pub struct OperatorIdentity {
    pub restaurant_id: Uuid,
}

/// Usage:
///
/// ```ignore
/// Router::new()
///     .route("/orders", get(list_orders))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         operator_auth_middleware,
///     ))
/// ```
pub async fn operator_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let api_key = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Unauthorized("Missing X-Api-Key header".to_string()))?;

    let mut conn = state.pool.acquire().await?;
    let restaurant = queries::catalog::restaurant_by_api_key(&mut conn, api_key)
        .await?
        .ok_or_else(|| Error::Unauthorized("Unknown API key".to_string()))?;

    tracing::debug!(restaurant_id = %restaurant.id, restaurant = %restaurant.name, "operator authenticated");

    request.extensions_mut().insert(OperatorIdentity {
        restaurant_id: restaurant.id,
    });
    Ok(next.run(request).await)
}
