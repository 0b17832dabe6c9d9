// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace serve` command implementation.
//!
//! Starts the webhook gateway with SQLite storage, the Anthropic completion
//! provider, and the Twilio transport, plus three background tasks: the
//! generation queue worker, the nudge scheduler, and the unsent sweeper.
//! Everything shares one cancellation token driven by SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use solace_anthropic::AnthropicProvider;
use solace_config::SolaceConfig;
use solace_core::types::{SystemAccount, UserId};
use solace_core::{SolaceError, StorageAdapter};
use solace_emotion::EmotionClient;
use solace_gateway::{GatewayState, HealthState, ServerConfig, SignatureState};
use solace_pipeline::{
    EmotionSink, Generation, Ingestion, NudgeScheduler, PipelineContext, QueueWorker, Reconciler,
    shutdown,
};
use solace_sms::{TwilioSignatureVerifier, TwilioTransport};
use solace_storage::SqliteStorage;
use tracing::{info, warn};

/// Storage plus the pipeline context wired on top of it.
pub(crate) struct Services {
    pub storage: Arc<SqliteStorage>,
    pub ctx: PipelineContext,
}

impl Services {
    /// Open storage, make sure the system user exists, and construct every
    /// adapter from `config`.
    pub async fn build(config: &SolaceConfig) -> Result<Self, SolaceError> {
        if config.system.phone_number.trim().is_empty() {
            return Err(SolaceError::Config(
                "system.phone_number must be set to send or receive SMS".into(),
            ));
        }

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;

        let system = SystemAccount {
            user_id: UserId(config.system.user_id),
            phone_number: config.system.phone_number.clone(),
        };
        storage
            .ensure_system_user(&system, &config.agent.name)
            .await?;

        let completion = Arc::new(AnthropicProvider::new(&config.anthropic)?);
        let transport = Arc::new(TwilioTransport::new(&config.sms)?);
        let mut ctx =
            PipelineContext::from_storage(storage.clone(), completion, transport, config)?;

        if config.emotion.enabled {
            let analyzer = Arc::new(EmotionClient::new(&config.emotion)?);
            ctx = ctx.with_emotion(EmotionSink::new(analyzer, storage.clone()));
            info!(base_url = %config.emotion.base_url, "emotion analysis enabled");
        }

        Ok(Self { storage, ctx })
    }

    /// Flush and close storage.
    pub async fn close(&self) {
        if let Err(e) = self.storage.close().await {
            warn!(error = %e, "failed to close storage");
        }
    }
}

fn signature_state(config: &SolaceConfig) -> Result<SignatureState, SolaceError> {
    if !config.sms.validate_signatures {
        warn!("webhook signature validation is disabled");
        return Ok(SignatureState::disabled());
    }
    let token = config.sms.auth_token.as_deref().ok_or_else(|| {
        SolaceError::Config(
            "sms.auth_token is required when sms.validate_signatures is on".into(),
        )
    })?;
    Ok(SignatureState::new(
        Arc::new(TwilioSignatureVerifier::new(token)),
        config.sms.public_base_url.clone(),
    ))
}

/// Runs the `solace serve` command.
pub async fn run_serve(config: SolaceConfig) -> Result<(), SolaceError> {
    init_tracing(&config.agent.log_level);

    info!("starting solace serve");

    let signatures = signature_state(&config)?;
    let services = Services::build(&config).await?;
    let ctx = services.ctx.clone();
    let cancel = shutdown::install_signal_handler();

    let mut background = Vec::new();

    let worker = QueueWorker::new(
        services.storage.clone(),
        config.queue.name.clone(),
        Generation::new(ctx.clone()),
        Duration::from_millis(config.queue.poll_interval_ms),
    );
    let worker_cancel = cancel.clone();
    background.push(tokio::spawn(async move { worker.run(worker_cancel).await }));

    if config.nudge.enabled {
        let scheduler = NudgeScheduler::new(ctx.clone(), config.nudge.max_concurrency);
        let interval = Duration::from_secs(config.nudge.interval_secs);
        let idle_for = Duration::from_secs(u64::from(config.nudge.idle_hours) * 3600);
        let nudge_cancel = cancel.clone();
        info!(
            interval_secs = config.nudge.interval_secs,
            idle_hours = config.nudge.idle_hours,
            max_concurrency = config.nudge.max_concurrency,
            "nudge scheduler enabled"
        );
        background.push(tokio::spawn(async move {
            scheduler.run(interval, idle_for, nudge_cancel).await
        }));
    }

    let reconciler = Reconciler::new(ctx.clone());
    if config.sweep.enabled {
        let sweeper = reconciler.clone();
        let interval = Duration::from_secs(config.sweep.interval_secs);
        let older_than = Duration::from_secs(config.sweep.stale_after_secs);
        let sweep_cancel = cancel.clone();
        background.push(tokio::spawn(async move {
            sweeper.run_sweeper(interval, older_than, sweep_cancel).await
        }));
    }

    let state = GatewayState {
        ingestion: Ingestion::new(ctx),
        reconciler,
        health: HealthState::default(),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let served =
        solace_gateway::start_server(&server_config, state, signatures, cancel.clone()).await;

    // The server also returns on bind failure; stop the background tasks too.
    cancel.cancel();
    for handle in background {
        if let Err(e) = handle.await {
            warn!(error = %e, "background task ended abnormally");
        }
    }
    services.close().await;

    info!("solace serve stopped");
    served
}

/// Initialize the tracing subscriber with env-filter support.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solace={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
