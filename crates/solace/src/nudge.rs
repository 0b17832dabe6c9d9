// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace nudge` command: one nudge batch, for running from cron instead
//! of the serve loop.

use chrono::Utc;
use solace_config::SolaceConfig;
use solace_core::SolaceError;
use solace_pipeline::NudgeScheduler;
use tracing::info;

use crate::serve::{Services, init_tracing};

/// Runs the `solace nudge` command.
pub async fn run_nudge(config: SolaceConfig, idle_hours: Option<u32>) -> Result<(), SolaceError> {
    init_tracing(&config.agent.log_level);

    let idle_hours = idle_hours.unwrap_or(config.nudge.idle_hours);
    let idle_since = Utc::now() - chrono::Duration::hours(i64::from(idle_hours));
    info!(idle_hours, %idle_since, "running one nudge batch");

    let services = Services::build(&config).await?;
    let scheduler = NudgeScheduler::new(services.ctx.clone(), config.nudge.max_concurrency);
    let report = scheduler.run_batch(idle_since).await;
    services.close().await;
    let report = report?;

    println!(
        "nudges: {} eligible, {} sent, {} skipped, {} failed",
        report.eligible, report.sent, report.skipped, report.failed
    );
    Ok(())
}
