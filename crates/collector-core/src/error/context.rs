//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Classification fields attached to error log events.
//!
//! Stage loops log `error_type` and `retryable` next to the error message so
//! failures can be grouped without parsing the text.

use super::CollectorError;

/// Error classification for log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorContext {
    pub error_type: &'static str,
    pub retryable: bool,
    pub permanent: bool,
}

impl From<&CollectorError> for ErrorContext {
    fn from(error: &CollectorError) -> Self {
        Self {
            error_type: error.error_type(),
            retryable: error.is_retryable(),
            permanent: error.is_permanent(),
        }
    }
}
