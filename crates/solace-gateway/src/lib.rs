// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook gateway for the Solace SMS agent.
//!
//! Exposes the Twilio inbound and status webhooks plus an unauthenticated
//! health endpoint. Webhook routes sit behind signature verification.

pub mod handlers;
pub mod server;
pub mod signature;

pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
pub use signature::SignatureState;
