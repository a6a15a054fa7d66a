// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for activation and reconfiguration lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Flow activation lifecycle (start, per-queue configuration, completion, failure)
//! * Consumer group reconfiguration outcomes

use crate::observability::messages::StructuredLog;
use crate::topology::{ConsumerGroupId, QueueName};
use crate::traits::GroupCounts;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Flow activation started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use millrace::observability::messages::coordinator::ActivationStarted;
///
/// let msg = ActivationStarted {
///     flow: "traffic-rollup",
///     flowlet_count: 3,
///     queue_count: 2,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ActivationStarted<'a> {
    pub flow: &'a str,
    pub flowlet_count: usize,
    pub queue_count: usize,
    pub max_concurrency: usize,
}

impl Display for ActivationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Activating flow '{}': {} flowlets across {} queues, max_concurrency={}",
            self.flow, self.flowlet_count, self.queue_count, self.max_concurrency
        )
    }
}

impl StructuredLog for ActivationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            flow = self.flow,
            flowlet_count = self.flowlet_count,
            queue_count = self.queue_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "activation",
            span_name = name,
            flow = self.flow,
            flowlet_count = self.flowlet_count,
            queue_count = self.queue_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// Per-queue configuration about to be pushed to the admin.
///
/// Emitted before the admin call so the attempted configuration is on
/// record even when the call fails.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use millrace::observability::messages::coordinator::QueueConfigurationAttempt;
/// use millrace::topology::{ConsumerGroupId, QueueName};
/// use millrace::traits::GroupCounts;
/// use std::collections::BTreeMap;
///
/// let queue = QueueName::new("traffic-rollup", "ingest", "events");
/// let groups: GroupCounts = BTreeMap::from([(ConsumerGroupId(42), 3)]);
/// let msg = QueueConfigurationAttempt {
///     queue: &queue,
///     groups: &groups,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct QueueConfigurationAttempt<'a> {
    pub queue: &'a QueueName,
    pub groups: &'a GroupCounts,
}

impl Display for QueueConfigurationAttempt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Queue config for {}: ", self.queue)?;
        for (i, (group, count)) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", group, count)?;
        }
        Ok(())
    }
}

impl StructuredLog for QueueConfigurationAttempt<'_> {
    fn log(&self) {
        tracing::info!(
            queue = %self.queue,
            group_count = self.groups.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "queue_configuration",
            span_name = name,
            queue = %self.queue,
            group_count = self.groups.len(),
        )
    }
}

/// Flow activation completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use millrace::observability::messages::coordinator::ActivationCompleted;
/// use std::time::Duration;
///
/// let msg = ActivationCompleted {
///     flow: "traffic-rollup",
///     queue_count: 2,
///     duration: Duration::from_millis(12),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ActivationCompleted<'a> {
    pub flow: &'a str,
    pub queue_count: usize,
    pub duration: std::time::Duration,
}

impl Display for ActivationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Flow '{}' activated: {} queues configured in {:?}",
            self.flow, self.queue_count, self.duration
        )
    }
}

impl StructuredLog for ActivationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            flow = self.flow,
            queue_count = self.queue_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "activation_completed",
            span_name = name,
            flow = self.flow,
            queue_count = self.queue_count,
            duration = ?self.duration,
        )
    }
}

/// Flow activation failed.
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use millrace::observability::messages::coordinator::ActivationFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = ActivationFailed {
///     flow: "traffic-rollup",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ActivationFailed<'a> {
    pub flow: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ActivationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Flow '{}' activation failed: {}", self.flow, self.error)
    }
}

impl StructuredLog for ActivationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            flow = self.flow,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "activation_failed",
            span_name = name,
            flow = self.flow,
            error = %self.error,
        )
    }
}

/// Consumer group reconfiguration applied to every queue.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use millrace::observability::messages::coordinator::ReconfigurationApplied;
/// use millrace::topology::ConsumerGroupId;
///
/// let msg = ReconfigurationApplied {
///     group: ConsumerGroupId(42),
///     instances: 5,
///     queue_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ReconfigurationApplied {
    pub group: ConsumerGroupId,
    pub instances: usize,
    pub queue_count: usize,
}

impl Display for ReconfigurationApplied {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Consumer group {} reconfigured to {} instances on {} queue(s)",
            self.group, self.instances, self.queue_count
        )
    }
}

impl StructuredLog for ReconfigurationApplied {
    fn log(&self) {
        tracing::info!(
            group = %self.group,
            instances = self.instances,
            queue_count = self.queue_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "reconfiguration",
            span_name = name,
            group = %self.group,
            instances = self.instances,
            queue_count = self.queue_count,
        )
    }
}

/// Consumer group reconfiguration failed on some queues.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use millrace::observability::messages::coordinator::ReconfigurationPartialFailure;
/// use millrace::topology::ConsumerGroupId;
///
/// let msg = ReconfigurationPartialFailure {
///     group: ConsumerGroupId(42),
///     applied: 1,
///     failed: 1,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ReconfigurationPartialFailure {
    pub group: ConsumerGroupId,
    pub applied: usize,
    pub failed: usize,
}

impl Display for ReconfigurationPartialFailure {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Consumer group {} reconfiguration applied to {} queue(s), failed on {}",
            self.group, self.applied, self.failed
        )
    }
}

impl StructuredLog for ReconfigurationPartialFailure {
    fn log(&self) {
        tracing::error!(
            group = %self.group,
            applied = self.applied,
            failed = self.failed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "reconfiguration_failed",
            span_name = name,
            group = %self.group,
            applied = self.applied,
            failed = self.failed,
        )
    }
}
