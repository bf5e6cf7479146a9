//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Tracing subscriber installation

use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{CollectorError, CollectorResult};

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `config.level`. Calling this again once a subscriber is set is a no-op.
pub fn init_logging(config: &LoggingConfig) -> CollectorResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            CollectorError::configuration_with_source(
                format!("Invalid log level directive: {}", config.level),
                e,
            )
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    };

    if let Err(e) = result {
        debug!(error = %e, "Tracing subscriber already installed");
    }
    Ok(())
}
