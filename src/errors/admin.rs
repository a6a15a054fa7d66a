// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for queue admin operations.
//!
//! This module defines the error surface of the queue admin seam. Every
//! backend (in-process or remote) maps its failures onto these variants so
//! the coordinators can treat backends uniformly. All errors implement
//! `std::error::Error` via the `thiserror` crate.

use crate::topology::{ConsumerGroupId, QueueName};
use std::time::Duration;
use thiserror::Error;

/// Error type for all queue admin operations.
///
/// Admin calls are idempotent, so every variant here is safe to retry at the
/// caller's discretion; none of them leaves a queue half-configured.
#[derive(Error, Debug)]
pub enum AdminError {
    /// The backing store refused the configuration change.
    #[error("queue configuration rejected: {0}")]
    Rejected(String),

    /// An instance update addressed a queue the admin has never configured.
    #[error("unknown queue: {0}")]
    UnknownQueue(QueueName),

    /// An instance update addressed a consumer group absent from the queue's
    /// configuration.
    #[error("unknown consumer group {group} on queue {queue}")]
    UnknownGroup {
        queue: QueueName,
        group: ConsumerGroupId,
    },

    /// The admin call exceeded its caller-imposed deadline.
    #[error("admin call timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error from the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for admin operations.
pub type AdminResult<T> = Result<T, AdminError>;
