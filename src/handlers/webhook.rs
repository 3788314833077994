//! WhatsApp webhook handlers: registration challenge and inbound
//! message intake.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{models::requests::WebhookPayload, queries, services::conversation::runner, state::AppState};

/// GET /api/v1/webhook
///
/// Webhook registration: the channel sends `hub.mode`,
/// `hub.verify_token`, and `hub.challenge`; we echo the challenge when
/// the token matches.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge").cloned().unwrap_or_default();

    if mode == Some("subscribe") && token == Some(state.webhook_verify_token.as_str()) {
        tracing::info!("webhook verified");
        (StatusCode::OK, challenge).into_response()
    } else {
        StatusCode::FORBIDDEN.into_response()
    }
}

/// POST /api/v1/webhook
///
/// Acknowledges immediately and processes messages on a detached task:
/// the channel expects a fast 200 and retries on anything else, so
/// processing failures are logged rather than returned. Signature
/// verification happens upstream of this service.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> StatusCode {
    for inbound in payload.inbound_messages() {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(error) = process_inbound(&state, &inbound).await {
                tracing::error!(from = %inbound.from, %error, "webhook message processing failed");
            }
        });
    }

    StatusCode::OK
}

async fn process_inbound(
    state: &AppState,
    inbound: &crate::models::requests::InboundMessage,
) -> crate::error::Result<()> {
    let restaurant = {
        let mut conn = state.pool.acquire().await?;
        queries::catalog::restaurant_by_display_phone(&mut conn, &inbound.display_phone_number)
            .await?
    };

    let Some(restaurant) = restaurant else {
        tracing::warn!(
            display_phone = %inbound.display_phone_number,
            "inbound message for an unknown business number, dropping"
        );
        return Ok(());
    };

    runner::handle_message(
        state,
        &restaurant,
        &inbound.from,
        &inbound.input,
        inbound.contact_name.as_deref(),
    )
    .await
}
