// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod admin;
mod coordinator;
mod topology;

pub use admin::{AdminError, AdminResult};
pub use coordinator::{ActivationError, ReconfigureError};
pub use topology::TopologyError;
