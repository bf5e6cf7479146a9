//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Component handles and the configuration every component exposes

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{Exporter, Processor, Receiver};
use crate::error::CollectorResult;
use crate::filter::FilterConfig;
use crate::types::TelemetryItem;

/// Callback a receiver invokes once per ingested item.
///
/// The returned future resolves once the item has been handed to the
/// pipeline, so awaiting it propagates back-pressure to the producer.
pub type Consumer = Arc<dyn Fn(TelemetryItem) -> BoxFuture<'static, CollectorResult<()>> + Send + Sync>;

/// Wiring-level configuration a component declares about itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Filter gating which items reach the component
    #[serde(default)]
    pub filter: FilterConfig,
}

impl ComponentConfig {
    pub fn with_filter(filter: FilterConfig) -> Self {
        Self { filter }
    }
}

/// A registered component before the pipeline checks its capability
#[derive(Clone)]
pub enum ComponentHandle {
    Receiver(Arc<dyn Receiver>),
    Processor(Arc<dyn Processor>),
    Exporter(Arc<dyn Exporter>),
}

impl ComponentHandle {
    /// Capability name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ComponentHandle::Receiver(_) => "receiver",
            ComponentHandle::Processor(_) => "processor",
            ComponentHandle::Exporter(_) => "exporter",
        }
    }

    pub fn component_config(&self) -> ComponentConfig {
        match self {
            ComponentHandle::Receiver(r) => r.component_config(),
            ComponentHandle::Processor(p) => p.component_config(),
            ComponentHandle::Exporter(e) => e.component_config(),
        }
    }

    pub fn as_receiver(&self) -> Option<Arc<dyn Receiver>> {
        match self {
            ComponentHandle::Receiver(r) => Some(Arc::clone(r)),
            _ => None,
        }
    }

    pub fn as_processor(&self) -> Option<Arc<dyn Processor>> {
        match self {
            ComponentHandle::Processor(p) => Some(Arc::clone(p)),
            _ => None,
        }
    }

    pub fn as_exporter(&self) -> Option<Arc<dyn Exporter>> {
        match self {
            ComponentHandle::Exporter(e) => Some(Arc::clone(e)),
            _ => None,
        }
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentHandle::{}", self.kind())
    }
}
