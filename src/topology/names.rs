// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Globally unique name of a queue within a deployment.
///
/// A queue is owned by the flow whose producer writes to it, and the name is
/// derived entirely from the producing side of the connection. The printable
/// form is a URI:
///
/// ```text
/// queue:///<flow>/<producer flowlet>/<output port>
/// ```
///
/// Connections that read from the same producer port resolve to the same
/// `QueueName`, which is how fan-out becomes multiple consumer groups on one
/// queue. Names are ordered so queue tables iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueueName {
    flow: String,
    flowlet: String,
    port: String,
}

impl QueueName {
    pub fn new(
        flow: impl Into<String>,
        flowlet: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            flow: flow.into(),
            flowlet: flowlet.into(),
            port: port.into(),
        }
    }

    /// The flow that owns this queue.
    pub fn flow_id(&self) -> &str {
        &self.flow
    }

    /// The flowlet whose output feeds this queue.
    pub fn flowlet_id(&self) -> &str {
        &self.flowlet
    }

    /// The producer output port this queue is bound to.
    pub fn port(&self) -> &str {
        &self.port
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue:///{}/{}/{}", self.flow, self.flowlet, self.port)
    }
}
