// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Window sizes for the reply and nudge paths.

use solace_config::model::MemoryConfig;

/// How much history to retrieve for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWindow {
    /// Most-recent messages to include.
    pub recent_limit: usize,
    /// Older messages to sample at random.
    pub historical_limit: usize,
    /// Only sample messages written by the user.
    pub authored_only: bool,
}

impl MemoryWindow {
    /// Window used when replying to an inbound message.
    pub fn reply(config: &MemoryConfig) -> Self {
        Self {
            recent_limit: config.reply_recent,
            historical_limit: config.reply_historical,
            authored_only: true,
        }
    }

    /// Window used when composing a nudge.
    pub fn nudge(config: &MemoryConfig) -> Self {
        Self {
            recent_limit: config.nudge_recent,
            historical_limit: config.nudge_historical,
            authored_only: false,
        }
    }

    /// Upper bound on the number of messages returned.
    pub fn capacity(&self) -> usize {
        self.recent_limit + self.historical_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_configured_paths() {
        let config = MemoryConfig::default();
        let reply = MemoryWindow::reply(&config);
        assert_eq!((reply.recent_limit, reply.historical_limit), (250, 25));
        assert!(reply.authored_only);

        let nudge = MemoryWindow::nudge(&config);
        assert_eq!(nudge.capacity(), 35);
        assert!(!nudge.authored_only);
    }
}
