//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! In-process receiver fed through a cloneable producer handle

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{CollectorError, CollectorResult};
use crate::filter::FilterConfig;
use crate::traits::{ComponentConfig, Consumer, Receiver};
use crate::types::TelemetryItem;

#[derive(Default)]
struct Shared {
    consumers: Mutex<Vec<Consumer>>,
    closed: AtomicBool,
}

/// Receiver whose items come from application code rather than the network
#[derive(Clone, Default)]
pub struct ChannelReceiver {
    shared: Arc<Shared>,
    filter: FilterConfig,
}

impl ChannelReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate items with `filter` before they enter any pipeline
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Producer side; clones share the same consumers
    pub fn handle(&self) -> ChannelHandle {
        ChannelHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of pipelines this receiver feeds
    pub fn consumer_count(&self) -> usize {
        self.shared.consumers.lock().len()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Receiver for ChannelReceiver {
    fn register_consumer(&self, consumer: Consumer) {
        let mut consumers = self.shared.consumers.lock();
        consumers.push(consumer);
        debug!(consumers = consumers.len(), "Registered channel consumer");
    }

    fn component_config(&self) -> ComponentConfig {
        ComponentConfig::with_filter(self.filter.clone())
    }

    async fn close(&self) -> CollectorResult<()> {
        if !self.shared.closed.swap(true, Ordering::AcqRel) {
            info!("Channel receiver closed");
        }
        Ok(())
    }
}

/// Cloneable producer for a [`ChannelReceiver`]
#[derive(Clone)]
pub struct ChannelHandle {
    shared: Arc<Shared>,
}

impl ChannelHandle {
    /// Deliver `item` to every registered consumer.
    ///
    /// Resolves once every pipeline has accepted the item, so a full pipeline
    /// slows the caller down. Every consumer is tried and the first real error
    /// is returned. A consumer answering `KindMismatch` carries another kind
    /// and is skipped; the mismatch is only reported when no consumer took
    /// the item.
    pub async fn send(&self, item: TelemetryItem) -> CollectorResult<()> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(CollectorError::receive("channel receiver is closed"));
        }

        let consumers: Vec<Consumer> = self.shared.consumers.lock().clone();
        if consumers.is_empty() {
            warn!("No consumers registered, item discarded");
            return Ok(());
        }

        let mut first_error = None;
        let mut mismatch = None;
        let mut delivered = false;
        for consumer in consumers {
            match consumer(item.clone()).await {
                Ok(()) => delivered = true,
                Err(e @ CollectorError::KindMismatch { .. }) => {
                    debug!(error = %e, "Consumer skipped item of another kind");
                    mismatch.get_or_insert(e);
                }
                Err(e) => {
                    debug!(error = %e, "Consumer rejected item");
                    first_error.get_or_insert(e);
                }
            }
        }

        match (first_error, mismatch) {
            (Some(e), _) => Err(e),
            (None, Some(e)) if !delivered => Err(e),
            _ => Ok(()),
        }
    }

    /// Send items one after another, stopping at the first error
    pub async fn send_all<I>(&self, items: I) -> CollectorResult<usize>
    where
        I: IntoIterator<Item = TelemetryItem>,
    {
        let mut sent = 0;
        for item in items {
            self.send(item).await?;
            sent += 1;
        }
        Ok(sent)
    }
}
