// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for flow validation outcomes.
//!
//! This module contains message types for logging events related to:
//! * Successful flow validation
//! * Accumulated validation failures

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Flow passed structural validation.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use millrace::observability::messages::validation::FlowValidated;
///
/// let msg = FlowValidated {
///     flow: "traffic-rollup",
///     flowlet_count: 3,
///     connection_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct FlowValidated<'a> {
    pub flow: &'a str,
    pub flowlet_count: usize,
    pub connection_count: usize,
}

impl Display for FlowValidated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Flow '{}' validated: {} flowlets, {} connections",
            self.flow, self.flowlet_count, self.connection_count
        )
    }
}

impl StructuredLog for FlowValidated<'_> {
    fn log(&self) {
        tracing::info!(
            flow = self.flow,
            flowlet_count = self.flowlet_count,
            connection_count = self.connection_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "flow_validated",
            span_name = name,
            flow = self.flow,
            flowlet_count = self.flowlet_count,
            connection_count = self.connection_count,
        )
    }
}

/// Flow failed structural validation.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use millrace::observability::messages::validation::FlowValidationFailed;
///
/// let msg = FlowValidationFailed {
///     flow: "traffic-rollup",
///     error_count: 2,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct FlowValidationFailed<'a> {
    pub flow: &'a str,
    pub error_count: usize,
}

impl Display for FlowValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Flow '{}' failed validation with {} error(s)",
            self.flow, self.error_count
        )
    }
}

impl StructuredLog for FlowValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            flow = self.flow,
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "flow_validation_failed",
            span_name = name,
            flow = self.flow,
            error_count = self.error_count,
        )
    }
}
