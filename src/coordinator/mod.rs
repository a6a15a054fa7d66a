//! Coordinators that drive queue state toward a flow's declared topology.
//!
//! Two write paths with deliberately different failure semantics:
//!
//! - [`TopologyCoordinator`] activates a whole flow. It is fail-fast: the
//!   first queue that cannot be configured aborts the pass, and the caller
//!   re-runs activation rather than reasoning about partial state.
//! - [`ReconfigurationCoordinator`] rescales one consumer group on an
//!   already-activated flow. It is best-effort: every queue is attempted and
//!   the caller receives a full accounting of what was applied.

pub mod activation;
pub mod reconfigure;

#[cfg(test)]
pub mod integration_tests;

pub use activation::{ConsumedQueues, TopologyCoordinator};
pub use reconfigure::ReconfigurationCoordinator;
