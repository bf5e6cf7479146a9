//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Built-in telemetry processors

pub mod modifier;

pub use modifier::{ModifierAction, ModifierConfig, ModifierProcessor, ModifierRule};
