// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Solace integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockCompletion`] - completion provider with pre-configured responses
//! - [`MockTransport`] - SMS transport that records sends and can be made to fail
//! - [`MockEmotion`] - emotion analyzer with fixed scores or failures
//! - [`TestStorage`] - temp SQLite storage seeded with the system account
//! - [`TestHarness`] - the whole pipeline wired to the above

pub mod harness;
pub mod mock_completion;
pub mod mock_emotion;
pub mod mock_transport;
pub mod storage;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_completion::{CompletionCall, MockCompletion};
pub use mock_emotion::MockEmotion;
pub use mock_transport::{MockTransport, SentSms};
pub use storage::TestStorage;

/// Phone number of the seeded system account.
pub const SYSTEM_PHONE: &str = "+15550000001";
