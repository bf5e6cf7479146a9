//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Capability contracts implemented by pipeline components
//!
//! Receivers, processors and exporters are opaque to the pipeline beyond
//! these traits. Storage contracts are consumed by storage-backed exporters.

pub mod component;
pub mod exporter;
pub mod processor;
pub mod receiver;
pub mod storage;

// Re-export commonly used traits
pub use component::*;
pub use exporter::*;
pub use processor::*;
pub use receiver::*;
pub use storage::*;
