//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Pipeline lifecycle state

use serde::{Deserialize, Serialize};

/// Pipeline state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Pipeline running status
    pub running: bool,

    /// Pipeline start time
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,

    /// Pipeline stop time
    pub stop_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl PipelineState {
    /// A closed pipeline cannot be started again
    pub fn is_closed(&self) -> bool {
        self.stop_time.is_some()
    }
}
