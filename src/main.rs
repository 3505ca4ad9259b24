// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span};
use valet::{
    ChangeState, ChangeStatus, ClientConfig, Convergence, Route53Client, WaitOptions, Zone,
};

/// Command-line client for Route53 hosted zones.
#[derive(Parser)]
#[command(name = "valet")]
#[command(version)]
#[command(about = "Manage Route53 hosted zones and follow change propagation")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Give up waiting for propagation after this many seconds.
    ///
    /// Overrides VALET_MAX_WAIT_SECS.
    #[arg(long, global = true)]
    max_wait_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List hosted zones
    Zones,

    /// Show one hosted zone with its name servers
    Zone {
        /// Hosted zone id, with or without the /hostedzone/ prefix
        id: String,
    },

    /// List every record set in a zone
    Records {
        zone_id: String,
    },

    /// Create a hosted zone
    CreateZone {
        /// Fully qualified domain name, ending with a dot
        domain: String,

        #[arg(long, default_value = "")]
        comment: String,

        /// Wait until the new zone is INSYNC
        #[arg(long)]
        wait: bool,
    },

    /// Delete a hosted zone
    DeleteZone {
        zone_id: String,

        #[arg(long, default_value = "")]
        comment: String,

        /// Delete every record except the apex SOA and NS first, and wait for that change
        #[arg(long)]
        purge: bool,
    },

    /// Show the propagation status of a change
    Status {
        zone_id: String,

        /// Change id, with or without the /change/ prefix
        change_id: String,

        /// Poll until the change is INSYNC (Ctrl+C stops waiting)
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaitReport {
    #[serde(flatten)]
    status: ChangeStatus,
    cancelled: bool,
}

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("valet")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG (default info) and RUST_LOG_FORMAT=json|text.
    // Logs go to stderr so stdout only carries command output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    let mut config = ClientConfig::from_env().context("Invalid configuration")?;
    if let Some(secs) = cli.max_wait_secs {
        config.max_wait = Some(Duration::from_secs(secs));
    }
    debug!(endpoint = %config.endpoint, signed = config.credentials.is_some(), "Configuration loaded");

    let client = Route53Client::from_config(&config)?
        .with_span(info_span!("valet", endpoint = %config.endpoint));

    run(cli.command, &client, &config).await
}

async fn run(command: Command, client: &Route53Client, config: &ClientConfig) -> Result<()> {
    match command {
        Command::Zones => print_json(&client.list_zones().await?),
        Command::Zone { id } => print_json(&client.zone_details(zone_id(&id)).await?),
        Command::Records { zone_id: id } => print_json(&client.list_records(zone_id(&id)).await?),
        Command::CreateZone {
            domain,
            comment,
            wait,
        } => {
            let status = client.create_zone(&domain, &comment).await?;
            if wait {
                print_wait(client, status, config).await
            } else {
                print_json(&status)
            }
        }
        Command::DeleteZone {
            zone_id: id,
            comment,
            purge,
        } => {
            let zone = Zone::with_id(zone_id(&id));
            if purge {
                let purged = client.delete_zone_records(&zone, &comment).await?;
                let outcome = client
                    .await_convergence(purged, &wait_options(config))
                    .await?;
                if let Convergence::Cancelled(status) = outcome {
                    info!(change_id = %status.change_id, "Record purge not confirmed, zone left in place");
                    return print_json(&WaitReport {
                        status,
                        cancelled: true,
                    });
                }
            }
            print_json(&client.delete_zone(&zone, &comment).await?)
        }
        Command::Status {
            zone_id: id,
            change_id: change,
            wait,
        } => {
            let known = ChangeStatus {
                zone_id: zone_id(&id).to_string(),
                change_id: change_id(&change).to_string(),
                status: ChangeState::PENDING,
                submitted_at: Utc::now(),
            };
            let status = client.query_status(&known).await?;
            if wait {
                print_wait(client, status, config).await
            } else {
                print_json(&status)
            }
        }
    }
}

fn zone_id(id: &str) -> &str {
    let id = id.trim();
    id.strip_prefix(valet::constants::HOSTED_ZONE_ID_PREFIX)
        .unwrap_or(id)
}

fn change_id(id: &str) -> &str {
    let id = id.trim();
    id.strip_prefix(valet::constants::CHANGE_ID_PREFIX)
        .unwrap_or(id)
}

/// Wait options that stop on Ctrl+C.
fn wait_options(config: &ClientConfig) -> WaitOptions {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, no longer waiting for propagation");
            on_signal.cancel();
        }
    });
    config.wait_options().with_cancel(cancel)
}

async fn print_wait(client: &Route53Client, status: ChangeStatus, config: &ClientConfig) -> Result<()> {
    let outcome = client.await_convergence(status, &wait_options(config)).await?;
    let cancelled = outcome.is_cancelled();
    print_json(&WaitReport {
        status: outcome.into_status(),
        cancelled,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
