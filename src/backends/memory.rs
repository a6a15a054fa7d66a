// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::errors::{AdminError, AdminResult};
use crate::topology::{ConsumerGroupId, QueueName};
use crate::traits::{GroupCounts, QueueAdmin};

/// In-process queue admin backed by a table in memory.
///
/// This is the reference backend: it holds the per-queue consumer group
/// configuration the coordinators would push to a real queue store, and it
/// enforces the same contract (full-membership replacement on
/// `configure_groups`, no implicit creation on `configure_instances`).
/// The demo binary and the coordinator tests run against it.
pub struct MemoryQueueAdmin {
    queues: Mutex<BTreeMap<QueueName, GroupCounts>>,
}

impl MemoryQueueAdmin {
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(BTreeMap::new()),
        }
    }

    /// The current group configuration of one queue, if it exists.
    pub async fn group_counts(&self, queue: &QueueName) -> Option<GroupCounts> {
        self.queues.lock().await.get(queue).cloned()
    }

    /// Copy of the entire queue configuration table.
    pub async fn snapshot(&self) -> BTreeMap<QueueName, GroupCounts> {
        self.queues.lock().await.clone()
    }

    /// Number of queues the admin has configured.
    pub async fn queue_count(&self) -> usize {
        self.queues.lock().await.len()
    }
}

impl Default for MemoryQueueAdmin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueAdmin for MemoryQueueAdmin {
    async fn configure_groups(&self, queue: &QueueName, groups: &GroupCounts) -> AdminResult<()> {
        if groups.is_empty() {
            return Err(AdminError::Rejected(format!(
                "group configuration for {} must not be empty",
                queue
            )));
        }
        if let Some((group, _)) = groups.iter().find(|(_, count)| **count == 0) {
            return Err(AdminError::Rejected(format!(
                "group {} on {} must have at least one instance",
                group, queue
            )));
        }

        // Full membership per call: groups absent from the map are evicted
        let mut queues = self.queues.lock().await;
        queues.insert(queue.clone(), groups.clone());
        Ok(())
    }

    async fn configure_instances(
        &self,
        queue: &QueueName,
        group: ConsumerGroupId,
        instances: usize,
    ) -> AdminResult<()> {
        if instances == 0 {
            return Err(AdminError::Rejected(format!(
                "group {} on {} must have at least one instance",
                group, queue
            )));
        }

        let mut queues = self.queues.lock().await;
        let counts = queues
            .get_mut(queue)
            .ok_or_else(|| AdminError::UnknownQueue(queue.clone()))?;
        let count = counts.get_mut(&group).ok_or(AdminError::UnknownGroup {
            queue: queue.clone(),
            group,
        })?;
        *count = instances;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
