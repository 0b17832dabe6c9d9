// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook signature middleware.
//!
//! Twilio signs the full public URL it posted to plus the form parameters.
//! The body is buffered, checked against `X-Twilio-Signature`, and handed on
//! unchanged. When no verifier is configured every request passes.

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{StatusCode, header::HOST},
    middleware::Next,
    response::Response,
};
use solace_core::SignatureVerifier;
use solace_sms::{SIGNATURE_HEADER, parse_form_params};

/// Largest webhook body accepted. Twilio payloads are a few KiB.
const MAX_WEBHOOK_BODY: usize = 64 * 1024;

/// Signature verification settings for webhook routes.
#[derive(Clone, Default)]
pub struct SignatureState {
    /// `None` disables verification (local development).
    pub verifier: Option<Arc<dyn SignatureVerifier>>,
    /// Public base URL Twilio posts to, e.g. `https://solace.example.com`.
    /// Falls back to `https://<Host>` when unset.
    pub public_base_url: Option<String>,
}

impl std::fmt::Debug for SignatureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureState")
            .field("verifier", &self.verifier.is_some())
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl SignatureState {
    /// Verification off.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(verifier: Arc<dyn SignatureVerifier>, public_base_url: Option<String>) -> Self {
        Self {
            verifier: Some(verifier),
            public_base_url,
        }
    }

    fn signed_url(&self, request: &Request) -> Option<String> {
        let path = request
            .uri()
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or_else(|| request.uri().path());
        match &self.public_base_url {
            Some(base) => Some(format!("{}{path}", base.trim_end_matches('/'))),
            None => {
                let host = request.headers().get(HOST)?.to_str().ok()?;
                Some(format!("https://{host}{path}"))
            }
        }
    }
}

/// Reject webhook requests whose signature does not match.
pub async fn signature_middleware(
    State(state): State<SignatureState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(verifier) = state.verifier.clone() else {
        return Ok(next.run(request).await);
    };

    let Some(url) = state.signed_url(&request) else {
        tracing::warn!("webhook rejected: cannot determine signed URL");
        return Err(StatusCode::FORBIDDEN);
    };
    let Some(signature) = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        tracing::warn!(%url, "webhook rejected: missing signature header");
        return Err(StatusCode::FORBIDDEN);
    };

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_WEBHOOK_BODY)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;
    let params = parse_form_params(&bytes).map_err(|e| {
        tracing::debug!(error = %e, "webhook body is not a form");
        StatusCode::BAD_REQUEST
    })?;

    if !verifier.verify(&url, &params, &signature) {
        tracing::warn!(%url, "webhook rejected: signature mismatch");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcceptAll;

    impl SignatureVerifier for AcceptAll {
        fn verify(&self, _url: &str, _params: &[(String, String)], _signature: &str) -> bool {
            true
        }
    }

    fn request(uri: &str, host: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(host) = host {
            builder = builder.header(HOST, host);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn signed_url_prefers_public_base() {
        let state = SignatureState::new(
            Arc::new(AcceptAll),
            Some("https://solace.example.com/".into()),
        );
        let url = state.signed_url(&request("/sms/inbound?x=1", Some("internal:3000")));
        assert_eq!(url.as_deref(), Some("https://solace.example.com/sms/inbound?x=1"));
    }

    #[test]
    fn signed_url_falls_back_to_host() {
        let state = SignatureState::new(Arc::new(AcceptAll), None);
        assert_eq!(
            state
                .signed_url(&request("/sms/status", Some("solace.example.com")))
                .as_deref(),
            Some("https://solace.example.com/sms/status")
        );
        assert!(state.signed_url(&request("/sms/status", None)).is_none());
    }

    #[test]
    fn debug_hides_verifier() {
        let rendered = format!("{:?}", SignatureState::new(Arc::new(AcceptAll), None));
        assert!(rendered.contains("verifier: true"));
    }
}
