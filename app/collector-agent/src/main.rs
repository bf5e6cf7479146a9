//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Collector agent binary
//!
//! Loads the collector configuration, installs logging and the optional
//! Prometheus recorder, wires the built-in components and runs every enabled
//! pipeline until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

use collector_core::config::DEFAULT_CONFIG_PATH;
use collector_core::exporters::{ConsoleExporter, StorageExporter};
use collector_core::logging::init_logging;
use collector_core::processors::ModifierProcessor;
use collector_core::receivers::{ChannelHandle, ChannelReceiver};
use collector_core::storage::MemoryStorage;
use collector_core::utils::now_nanos;
use collector_core::{
    CollectorConfig, ComponentRegistry, Pipeline, PipelineMetrics, TelemetryItem,
    COLLECTOR_NAME, COLLECTOR_VERSION,
};

/// Built-in component names
const CONSOLE_EXPORTER: &str = "console";
const MEMORY_STORAGE_EXPORTER: &str = "memory-storage";
const CHANNEL_RECEIVER: &str = "channel";

/// `options.type` value selecting a modifier processor
const MODIFIER_TYPE: &str = "modifier";

#[derive(Parser)]
#[command(name = "collector-agent")]
#[command(about = "Telemetry collector agent")]
#[command(version = COLLECTOR_VERSION)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "COLLECTOR_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Feed JSON encoded items from stdin into the `channel` receiver
    #[arg(long)]
    stdin: bool,

    /// Validate the configuration and build pipelines without running them
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CollectorConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_logging(&config.logging)?;

    info!(
        "Starting {} agent v{} ({})",
        COLLECTOR_NAME, COLLECTOR_VERSION, config.name
    );

    if config.metrics.enabled {
        if let Some(endpoint) = &config.metrics.prometheus_endpoint {
            install_prometheus(endpoint)?;
        }
    }

    let (registry, channel) = register_components(&config)?;
    let metrics = Arc::new(if config.metrics.enabled {
        PipelineMetrics::new(config.metrics.clone())
    } else {
        PipelineMetrics::disabled()
    });
    let pipelines = registry.build_from_config(&config, metrics)?;

    if cli.check {
        info!(pipelines = pipelines.len(), "Configuration is valid");
        return Ok(());
    }
    if pipelines.is_empty() {
        warn!("No enabled pipelines configured");
    }

    let mut started = Vec::with_capacity(pipelines.len());
    for pipeline in pipelines {
        if let Err(e) = pipeline.start_stream().await {
            error!(pipeline = pipeline.name(), error = %e, "Failed to start pipeline");
            close_all(&started).await;
            return Err(e.into());
        }
        started.push(pipeline);
    }
    info!(pipelines = started.len(), "Agent started");

    if cli.stdin {
        tokio::spawn(feed_stdin(channel.handle()));
    }

    shutdown_signal().await;

    info!("Shutting down agent");
    close_all(&started).await;
    info!("Agent shutdown completed");
    Ok(())
}

fn install_prometheus(endpoint: &str) -> Result<()> {
    let addr: SocketAddr = endpoint
        .parse()
        .with_context(|| format!("invalid prometheus endpoint {}", endpoint))?;
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("installing Prometheus recorder")?;
    info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

/// Register built-in components plus every modifier declared in config
fn register_components(config: &CollectorConfig) -> Result<(ComponentRegistry, ChannelReceiver)> {
    let mut registry = ComponentRegistry::new().with_settings(config.components.clone());

    let channel = ChannelReceiver::new();
    registry.register_receiver(CHANNEL_RECEIVER, Arc::new(channel.clone()))?;
    registry.register_exporter(CONSOLE_EXPORTER, Arc::new(ConsoleExporter::new()))?;
    registry.register_exporter(
        MEMORY_STORAGE_EXPORTER,
        Arc::new(StorageExporter::new(Arc::new(MemoryStorage::new()))),
    )?;

    for (name, settings) in &config.components {
        let Some(options) = &settings.options else {
            continue;
        };
        match options.get("type").and_then(serde_json::Value::as_str) {
            Some(MODIFIER_TYPE) => {
                let processor = ModifierProcessor::from_options(options)
                    .with_context(|| format!("building modifier {}", name))?;
                registry.register_processor(name.clone(), Arc::new(processor))?;
            }
            Some(other) => warn!(component = %name, kind = other, "Unknown component type, ignoring"),
            None => debug!(component = %name, "Component options without a type"),
        }
    }

    Ok((registry, channel))
}

/// Read one JSON item per line until EOF
async fn feed_stdin(handle: ChannelHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let mut item: TelemetryItem = match serde_json::from_str(&line) {
            Ok(item) => item,
            Err(e) => {
                warn!(error = %e, "Skipping malformed input line");
                continue;
            }
        };
        item.fill_timestamp(now_nanos());
        if let Err(e) = handle.send(item).await {
            warn!(error = %e, "Item rejected");
        }
    }
    info!("Stdin closed");
}

async fn close_all(pipelines: &[Pipeline]) {
    for pipeline in pipelines {
        if let Err(e) = pipeline.close().await {
            error!(pipeline = pipeline.name(), error = %e, "Error closing pipeline");
        }
    }
}

/// Handle shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
