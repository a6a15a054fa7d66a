// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Queue admin backend implementations.
//!
//! This module provides the backends that sit behind the `QueueAdmin` trait.
//! Each backend owns the durable (or in this crate, in-process) side of queue
//! configuration; the coordinators only ever talk to the trait.
//!
//! # Available Backends
//!
//! ## Memory Backend
//! In-process reference implementation:
//! - **State**: Per-queue consumer group tables held in memory
//! - **Contract**: Full-membership replacement, no implicit creation on updates
//! - **Use Case**: Demo binary, coordinator tests, embedders without a store
//!
//! ## Stub Backends (Test-Only)
//! Admin doubles for coordinator testing (only available in test builds):
//! - **RejectingQueueAdmin**: Rejects every call and counts the attempts
//! - **FlakyQueueAdmin**: Fails one chosen queue, delegates the rest to memory
//! - **Note**: NOT available in production builds

pub mod memory;
#[cfg(test)]
pub mod stub;
