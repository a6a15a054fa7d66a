// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in millrace. Message types follow a struct-based
//! pattern with `Display` trait implementation to:
//!
//! * Keep log strings out of the coordinator and validation code paths
//! * Attach the same structured fields to every emission of an event
//! * Give each lifecycle event exactly one owner type
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::coordinator` - Activation and reconfiguration lifecycle events
//! * `messages::validation` - Flow validation outcomes
//!
//! # Usage
//!
//! ```rust
//! use millrace::observability::messages::validation::FlowValidationFailed;
//!
//! let msg = FlowValidationFailed {
//!     flow: "traffic-rollup",
//!     error_count: 2,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
