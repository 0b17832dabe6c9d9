// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound SMS transport and inbound webhook authenticity.

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::SendReceipt;

/// Sends SMS messages through an external carrier API.
#[async_trait]
pub trait SmsTransport: PluginAdapter {
    /// Send `body` from `from` to `to`. The receipt carries the transport's
    /// delivery id, used later to correlate status callbacks.
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<SendReceipt, SolaceError>;
}

/// Verifies that a webhook request really came from the transport.
pub trait SignatureVerifier: Send + Sync + 'static {
    /// `url` is the full public URL the transport posted to and `params` the
    /// decoded form body.
    fn verify(&self, url: &str, params: &[(String, String)], signature: &str) -> bool;
}
