// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for topology activation and reconfiguration.

use crate::errors::{AdminError, TopologyError};
use crate::topology::QueueName;
use std::collections::BTreeSet;
use thiserror::Error;

/// Error type for flow activation.
///
/// Activation is fail-fast: the first per-queue failure aborts the pass and
/// surfaces here. Re-running activation against a healthy admin is the
/// recovery path; there is no compensating rollback.
#[derive(Error, Debug)]
pub enum ActivationError {
    /// The flow graph failed to compile into queue specifications.
    #[error("flow topology is invalid: {0}")]
    Topology(#[from] TopologyError),

    /// A per-queue `configure_groups` call failed.
    #[error("queue configuration failed for {queue}: {source}")]
    QueueConfig {
        queue: QueueName,
        source: AdminError,
    },

    /// Activation was cancelled before every queue was configured.
    #[error("flow activation was cancelled")]
    Cancelled,

    /// An activation task failed outside the admin call itself.
    #[error("activation task failed: {message}")]
    Internal { message: String },
}

/// Error type for consumer group reconfiguration.
///
/// Reconfiguration is best-effort: every queue in the set is attempted, and
/// `Partial` reports exactly which queues carry the new instance count and
/// which do not.
#[derive(Error, Debug)]
pub enum ReconfigureError {
    /// The requested instance count is outside the valid range.
    #[error("instance count must be at least 1, got {instances}")]
    InvalidInstanceCount { instances: usize },

    /// Some queues accepted the new instance count and some did not.
    #[error(
        "reconfiguration applied to {} of {} queue(s)",
        .applied.len(),
        .applied.len() + .failed.len()
    )]
    Partial {
        /// Queues that reflect the new instance count.
        applied: BTreeSet<QueueName>,
        /// Queues that failed, with the admin error for each.
        failed: Vec<(QueueName, AdminError)>,
    },

    /// A reconfiguration task failed outside the admin call itself.
    #[error("reconfiguration task failed: {message}")]
    Internal { message: String },
}
