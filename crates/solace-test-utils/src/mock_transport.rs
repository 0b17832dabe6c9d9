// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock SMS transport that records outbound messages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use solace_core::types::{AdapterType, HealthStatus, SendReceipt};
use solace_core::{MessageStatus, PluginAdapter, SmsTransport, SolaceError};

/// One message handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub from: String,
    pub to: String,
    pub body: String,
    pub delivery_id: String,
}

/// Assigns delivery ids `SM-mock-1`, `SM-mock-2`, ... and reports `queued`,
/// like a carrier API that accepted the message.
pub struct MockTransport {
    sent: Arc<Mutex<Vec<SentSms>>>,
    next_id: AtomicU64,
    fail: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
            fail: AtomicBool::new(false),
        }
    }

    /// A transport that rejects every send.
    pub fn failing() -> Self {
        let transport = Self::new();
        transport.set_failing(true);
        transport
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Messages accepted so far, in send order.
    pub async fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        Ok(())
    }
}

#[async_trait]
impl SmsTransport for MockTransport {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<SendReceipt, SolaceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SolaceError::Transport {
                message: "mock transport unavailable".into(),
                source: None,
            });
        }

        let delivery_id = format!("SM-mock-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.sent.lock().await.push(SentSms {
            from: from.to_string(),
            to: to.to_string(),
            body: body.to_string(),
            delivery_id: delivery_id.clone(),
        });
        Ok(SendReceipt {
            delivery_id,
            status: MessageStatus::Queued,
        })
    }
}
