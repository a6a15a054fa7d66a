use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::errors::AdminResult;
use crate::topology::{ConsumerGroupId, QueueName};

/// Complete group membership for one queue, group id -> instance count
pub type GroupCounts = BTreeMap<ConsumerGroupId, usize>;

#[async_trait]
pub trait QueueAdmin: Send + Sync {
    /// Replace a queue's consumer group configuration wholesale.
    ///
    /// - `queue`: the queue being configured; backends create it on first sight
    /// - `groups`: complete membership for the queue, so groups absent from
    ///   the map are evicted
    ///
    /// Idempotent: reapplying an identical map is a no-op.
    async fn configure_groups(&self, queue: &QueueName, groups: &GroupCounts) -> AdminResult<()>;

    /// Update a single group's instance count on an already configured queue.
    ///
    /// Never creates queues or groups: addressing an unconfigured target is
    /// an `UnknownQueue` or `UnknownGroup` error, not a silent success.
    async fn configure_instances(
        &self,
        queue: &QueueName,
        group: ConsumerGroupId,
        instances: usize,
    ) -> AdminResult<()>;

    fn name(&self) -> &'static str;
}
