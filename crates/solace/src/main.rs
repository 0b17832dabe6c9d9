// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Solace - an SMS companion agent that remembers.
//!
//! This is the binary entry point for the Solace agent.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check_config;
mod nudge;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use solace_config::SolaceConfig;

/// Solace - an SMS companion agent that remembers.
#[derive(Parser, Debug)]
#[command(name = "solace", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook gateway, queue worker, nudge scheduler, and sweeper.
    Serve,
    /// Run a single nudge batch and exit.
    Nudge {
        /// Treat users silent for this many hours as idle (defaults to nudge.idle_hours).
        #[arg(long)]
        idle_hours: Option<u32>,
    },
    /// Validate configuration and print the effective values with secrets redacted.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> SolaceConfig {
    let loaded = match path {
        Some(path) => solace_config::load_and_validate_path(path),
        None => solace_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            solace_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Nudge { idle_hours }) => nudge::run_nudge(config, idle_hours).await,
        Some(Commands::CheckConfig) => check_config::run_check_config(&config),
        None => {
            println!("solace: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
