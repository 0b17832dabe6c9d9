// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook routes.
//!
//! Handles POST /sms/inbound, POST /sms/status, GET /health.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use solace_core::{ErrorKind, SolaceError};
use solace_sms::TwilioWebhook;

use crate::server::GatewayState;

/// TwiML telling Twilio not to send anything back itself.
pub const EMPTY_TWIML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>";

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Pipeline error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub SolaceError);

impl From<SolaceError> for ApiError {
    fn from(e: SolaceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, kind = %self.0.kind(), "webhook failed");
        } else {
            tracing::info!(error = %self.0, kind = %self.0.kind(), "webhook rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Caller mistakes map to 4xx so Twilio stops retrying; everything else is a
/// 500 so it tries again.
pub fn status_for(error: &SolaceError) -> StatusCode {
    match error.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Dependency | ErrorKind::RetryExceeded | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// POST /sms/inbound
///
/// Records the message and queues it for a reply. The reply itself goes out
/// through the REST API, so the TwiML response is empty.
pub async fn post_inbound(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let webhook = TwilioWebhook::from_form(&body)?;
    let message = state.ingestion.receive(webhook.into_inbound()).await?;
    tracing::debug!(message_id = %message.id, "inbound webhook accepted");

    Ok((
        StatusCode::CREATED,
        [(CONTENT_TYPE, "text/xml")],
        EMPTY_TWIML,
    )
        .into_response())
}

/// POST /sms/status
pub async fn post_status(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let callback = TwilioWebhook::from_form(&body)?.into_status_callback()?;
    state.reconciler.reconcile(callback).await?;
    Ok(StatusCode::OK)
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_status_codes() {
        assert_eq!(
            status_for(&SolaceError::Validation("missing Body".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&SolaceError::not_found("user", "+15550000002")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&SolaceError::Queue {
                message: "down".into(),
                source: None
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&SolaceError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
