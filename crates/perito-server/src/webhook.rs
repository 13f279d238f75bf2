//! Messaging webhook endpoints.
//!
//! Implements the Meta verification handshake and acknowledges incoming
//! payloads. Message parsing and replies are not wired up yet; payloads are
//! only logged.

use crate::handlers::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// GET /webhook - Verification handshake
///
/// Succeeds when `hub.mode` is `subscribe` and `hub.verify_token` matches
/// the configured token; the body echoes `hub.challenge`.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);

    if mode == Some("subscribe") && token == Some(state.config.server.verify_token.as_str()) {
        info!("Webhook verified successfully");
        return match params.get("hub.challenge") {
            Some(challenge) => (StatusCode::OK, challenge.clone()).into_response(),
            None => Json(json!({ "status": "verified" })).into_response(),
        };
    }

    warn!("Webhook verification failed: token mismatch or invalid mode");
    (StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden" }))).into_response()
}

/// POST /webhook - Log and acknowledge a payload
pub async fn receive(body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Error parsing webhook JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON payload", "detail": e.to_string() })),
            )
                .into_response();
        }
    };

    let object = payload.get("object").cloned().unwrap_or(Value::Null);
    info!(object = %object, entries = ?payload.get("entry"), "Received webhook payload");

    Json(json!({
        "status": "received",
        "message": "Webhook payload logged successfully",
        "payload_object": object,
    }))
    .into_response()
}
