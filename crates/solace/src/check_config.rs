// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace check-config` command.

use solace_config::SolaceConfig;
use solace_core::SolaceError;

const REDACTED: &str = "[REDACTED]";

/// A copy of `config` safe to print.
fn redacted(config: &SolaceConfig) -> SolaceConfig {
    let mut config = config.clone();
    if config.anthropic.api_key.is_some() {
        config.anthropic.api_key = Some(REDACTED.to_string());
    }
    if config.sms.auth_token.is_some() {
        config.sms.auth_token = Some(REDACTED.to_string());
    }
    config
}

/// Render the effective configuration as TOML with secrets replaced.
pub fn render(config: &SolaceConfig) -> Result<String, SolaceError> {
    toml::to_string_pretty(&redacted(config))
        .map_err(|e| SolaceError::Internal(format!("failed to render config: {e}")))
}

/// Runs the `solace check-config` command. Loading already validated the
/// configuration, so this only reports it.
pub fn run_check_config(config: &SolaceConfig) -> Result<(), SolaceError> {
    println!("# configuration is valid");
    print!("{}", render(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_redacted() {
        let mut config = SolaceConfig::default();
        config.anthropic.api_key = Some("sk-ant-secret".into());
        config.sms.auth_token = Some("twilio-secret".into());
        config.sms.account_sid = Some("AC123".into());

        let rendered = render(&config).unwrap();
        assert!(!rendered.contains("sk-ant-secret"));
        assert!(!rendered.contains("twilio-secret"));
        assert!(rendered.contains(REDACTED));
        assert!(rendered.contains("AC123"));
    }

    #[test]
    fn rendered_config_loads_back() {
        let rendered = render(&SolaceConfig::default()).unwrap();
        let reloaded = solace_config::load_config_from_str(&rendered).unwrap();
        assert_eq!(reloaded.gateway.port, SolaceConfig::default().gateway.port);
    }
}
