// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! This module contains all message types used throughout millrace for
//! diagnostic and operational logging. Each message type implements the
//! `Display` trait for human-readable output and [`StructuredLog`] for
//! emission with structured fields attached.
//!
//! # Organization
//!
//! Messages are organized by subsystem:
//!
//! * `coordinator` - Activation and reconfiguration lifecycle events
//! * `validation` - Flow validation outcomes
//!
//! # Usage Pattern
//!
//! ```rust
//! use millrace::observability::messages::coordinator::ActivationStarted;
//!
//! let msg = ActivationStarted {
//!     flow: "traffic-rollup",
//!     flowlet_count: 3,
//!     queue_count: 2,
//!     max_concurrency: 4,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use std::fmt::Display;
use tracing::Span;

pub mod coordinator;
pub mod validation;

/// Behavior shared by all structured log message types.
///
/// `log` emits the message at its appropriate level with structured fields
/// attached; `span` builds a span carrying the same fields so follow-on work
/// can be traced under it.
pub trait StructuredLog: Display {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
