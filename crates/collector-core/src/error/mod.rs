//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Error handling for the telemetry collector

pub mod context;
pub mod conversions;
pub mod types;

pub use context::ErrorContext;
pub use types::{CollectorError, CollectorResult};
