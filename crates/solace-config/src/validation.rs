// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SolaceConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &SolaceConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.agent.timezone.parse::<chrono_tz::Tz>().is_err() {
        errors.push(ConfigError::validation(format!(
            "agent.timezone `{}` is not an IANA timezone",
            config.agent.timezone
        )));
    }

    if config.system.user_id <= 0 {
        errors.push(ConfigError::validation(format!(
            "system.user_id must be positive, got {}",
            config.system.user_id
        )));
    }

    let phone = config.system.phone_number.trim();
    if !phone.is_empty() && !solace_core::phone::is_e164(phone) {
        errors.push(ConfigError::validation(format!(
            "system.phone_number `{phone}` is not an E.164 number"
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    }

    if config.queue.name.trim().is_empty() {
        errors.push(ConfigError::validation("queue.name must not be empty"));
    }

    if config.memory.reply_recent == 0 {
        errors.push(ConfigError::validation(
            "memory.reply_recent must be at least 1",
        ));
    }

    if config.nudge.max_concurrency == 0 {
        errors.push(ConfigError::validation(
            "nudge.max_concurrency must be at least 1",
        ));
    }

    if config.nudge.interval_secs == 0 {
        errors.push(ConfigError::validation(
            "nudge.interval_secs must be at least 1",
        ));
    }

    if config.emotion.max_backoff_ms < config.emotion.initial_backoff_ms {
        errors.push(ConfigError::validation(format!(
            "emotion.max_backoff_ms ({}) must not be below emotion.initial_backoff_ms ({})",
            config.emotion.max_backoff_ms, config.emotion.initial_backoff_ms
        )));
    }

    if config.sweep.interval_secs == 0 {
        errors.push(ConfigError::validation(
            "sweep.interval_secs must be at least 1",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SolaceConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let mut config = SolaceConfig::default();
        config.agent.log_level = "loud".into();
        config.agent.timezone = "Mars/Olympus".into();
        config.nudge.max_concurrency = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3, "{:?}", messages(&errors));
    }

    #[test]
    fn rejects_malformed_system_phone() {
        let mut config = SolaceConfig::default();
        config.system.phone_number = "555-0100".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("system.phone_number"));

        config.system.phone_number = "+1 555 010 0000".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_inverted_backoff_bounds() {
        let mut config = SolaceConfig::default();
        config.emotion.initial_backoff_ms = 5000;
        config.emotion.max_backoff_ms = 1000;
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("max_backoff_ms"));
    }
}
