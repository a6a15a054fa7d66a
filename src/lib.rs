// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;    // queue admin backends
pub mod coordinator; // activation + reconfiguration
pub mod errors;      // error handling
pub mod flow;        // flow graph model + loading
pub mod observability;
pub mod topology;    // queue spec compilation
pub mod traits;      // unified abstractions
