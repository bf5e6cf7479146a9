//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Declarative keep/drop rules attached to every pipeline component

pub mod config;
pub mod data_filter;

pub use config::FilterConfig;
pub use data_filter::DataFilter;
