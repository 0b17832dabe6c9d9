// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Twilio-facing axum app: two signed webhooks plus a health check.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use solace_core::SolaceError;
use solace_pipeline::{Ingestion, Reconciler};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::signature::{SignatureState, signature_middleware};

#[derive(Clone)]
pub struct HealthState {
    /// When the gateway came up; `/health` reports seconds since.
    pub start_time: std::time::Instant,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

/// Pipeline stages the webhook handlers call into.
#[derive(Clone)]
pub struct GatewayState {
    /// Inbound SMS stage.
    pub ingestion: Ingestion,
    /// Delivery status stage.
    pub reconciler: Reconciler,
    pub health: HealthState,
}

/// Listen address, copied out of `[gateway]`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the gateway router.
///
/// - GET /health (no signature)
/// - POST /sms/inbound (signed)
/// - POST /sms/status (signed)
pub fn router(state: GatewayState, signatures: SignatureState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let webhook_routes = Router::new()
        .route("/sms/inbound", post(handlers::post_inbound))
        .route("/sms/status", post(handlers::post_status))
        .route_layer(axum_middleware::from_fn_with_state(
            signatures,
            signature_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .layer(TraceLayer::new_for_http())
}

/// Serve the gateway until `shutdown` is cancelled. In-flight requests are
/// allowed to finish.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    signatures: SignatureState,
    shutdown: CancellationToken,
) -> Result<(), SolaceError> {
    let app = router(state, signatures);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SolaceError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!(%addr, "webhook gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| SolaceError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }

    #[test]
    fn health_state_starts_now() {
        let health = HealthState::default();
        assert!(health.start_time.elapsed().as_secs() < 5);
    }
}
