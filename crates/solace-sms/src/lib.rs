// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twilio integration for the Solace SMS agent.
//!
//! - [`TwilioTransport`] sends messages through the REST API.
//! - [`TwilioWebhook`] decodes inbound-message and status-callback forms.
//! - [`TwilioSignatureVerifier`] checks `X-Twilio-Signature` headers.

pub mod signature;
pub mod transport;
pub mod webhook;

pub use signature::{TwilioSignatureVerifier, compute_signature};
pub use transport::TwilioTransport;
pub use webhook::{TwilioWebhook, parse_form_params};

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-twilio-signature";
