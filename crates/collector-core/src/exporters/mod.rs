//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Built-in telemetry exporters

pub mod console;
pub mod storage;

pub use console::ConsoleExporter;
pub use storage::StorageExporter;
