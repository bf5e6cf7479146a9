//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Built-in telemetry receivers

pub mod channel;

pub use channel::{ChannelHandle, ChannelReceiver};
