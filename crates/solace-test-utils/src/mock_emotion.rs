// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock emotion analyzer.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use solace_core::types::{AdapterType, EmotionScores, HealthStatus, NrcScores, VaderScores};
use solace_core::{EmotionAnalyzer, PluginAdapter, SolaceError};

/// Returns fixed scores, or `RetryExceeded` when built with [`MockEmotion::failing`].
pub struct MockEmotion {
    fail: bool,
    calls: AtomicUsize,
}

impl MockEmotion {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The scores every successful call returns.
    pub fn scores() -> EmotionScores {
        EmotionScores {
            nrc: NrcScores {
                joy: 0.5,
                trust: 0.25,
                positive: 0.75,
                ..NrcScores::default()
            },
            vader: VaderScores {
                compound: 0.6,
                neg: 0.0,
                neu: 0.4,
                pos: 0.6,
            },
        }
    }
}

impl Default for MockEmotion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEmotion {
    fn name(&self) -> &str {
        "mock-emotion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Analyzer
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        Ok(())
    }
}

#[async_trait]
impl EmotionAnalyzer for MockEmotion {
    async fn analyze(&self, _text: &str) -> Result<EmotionScores, SolaceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SolaceError::RetryExceeded {
                attempts: 4,
                last_error: "HTTP 503".into(),
            });
        }
        Ok(Self::scores())
    }
}
