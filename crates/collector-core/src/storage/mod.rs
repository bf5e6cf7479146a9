//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Storage backends implementing the [`Storage`](crate::traits::Storage) contract

pub mod memory;

pub use memory::MemoryStorage;
