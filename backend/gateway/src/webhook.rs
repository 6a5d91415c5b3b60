//! WhatsApp webhook handlers.
//!
//! The platform only ever sees `200 ok` for deliveries: lookup and reply
//! failures are logged here and go no further.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, error, info, warn};

use sheetbot_channels::{parse_delivery, verify_subscription, VerifyQuery};
use sheetbot_logging::mask_sender;

use crate::server::GatewayState;

/// `GET {webhook_path}`: subscription handshake.
pub async fn verify(
    State(state): State<GatewayState>,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query {
        Ok(Query(q)) => q,
        Err(e) => {
            debug!(error = %e, "Unreadable handshake query");
            VerifyQuery::default()
        }
    };

    match verify_subscription(&query, &state.verify_token) {
        Some(challenge) => {
            info!("Webhook subscription verified");
            (StatusCode::OK, challenge)
        }
        None => {
            warn!(mode = query.mode.as_deref().unwrap_or(""), "Webhook verification rejected");
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        }
    }
}

/// `POST {webhook_path}`: message delivery.
pub async fn receive(State(state): State<GatewayState>, body: Bytes) -> impl IntoResponse {
    let Some(message) = parse_delivery(&body) else {
        debug!(bytes = body.len(), "Delivery carried no message");
        return (StatusCode::OK, "ok");
    };

    match state.dispatcher.handle(&message).await {
        Ok(event) => {
            debug!(event_id = %event.id, kind = %event.kind, "Delivery handled");
        }
        Err(e) => {
            error!(
                from = %mask_sender(&message.from),
                upstream = e.is_upstream(),
                error = %e,
                "Failed to answer message"
            );
        }
    }
    (StatusCode::OK, "ok")
}
