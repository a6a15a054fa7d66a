// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::backends::memory::MemoryQueueAdmin;
use crate::errors::{AdminError, AdminResult};
use crate::topology::{ConsumerGroupId, QueueName};
use crate::traits::{GroupCounts, QueueAdmin};

/// An admin that rejects every call, for testing failure scenarios
///
/// Counts the calls it rejects so tests can assert how many were attempted,
/// including asserting that none were.
pub struct RejectingQueueAdmin {
    calls: AtomicUsize,
}

impl RejectingQueueAdmin {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of admin calls attempted against this backend
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueAdmin for RejectingQueueAdmin {
    async fn configure_groups(&self, _queue: &QueueName, _groups: &GroupCounts) -> AdminResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AdminError::Rejected("simulated rejection".to_string()))
    }

    async fn configure_instances(
        &self,
        _queue: &QueueName,
        _group: ConsumerGroupId,
        _instances: usize,
    ) -> AdminResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AdminError::Rejected("simulated rejection".to_string()))
    }

    fn name(&self) -> &'static str {
        "rejecting"
    }
}

/// An admin that fails for one specific queue and behaves normally otherwise
///
/// Wraps a shared `MemoryQueueAdmin` so tests can check exactly which queues
/// were configured around the failure, and replay passes against the same
/// state once the fault is gone.
pub struct FlakyQueueAdmin {
    inner: Arc<MemoryQueueAdmin>,
    fail_queue: QueueName,
}

impl FlakyQueueAdmin {
    pub fn failing_on(fail_queue: QueueName) -> Self {
        Self {
            inner: Arc::new(MemoryQueueAdmin::new()),
            fail_queue,
        }
    }

    /// The wrapped in-memory admin, for inspection or fault-free replay
    pub fn inner(&self) -> Arc<MemoryQueueAdmin> {
        self.inner.clone()
    }
}

#[async_trait]
impl QueueAdmin for FlakyQueueAdmin {
    async fn configure_groups(&self, queue: &QueueName, groups: &GroupCounts) -> AdminResult<()> {
        if *queue == self.fail_queue {
            return Err(AdminError::Rejected("simulated queue failure".to_string()));
        }
        self.inner.configure_groups(queue, groups).await
    }

    async fn configure_instances(
        &self,
        queue: &QueueName,
        group: ConsumerGroupId,
        instances: usize,
    ) -> AdminResult<()> {
        if *queue == self.fail_queue {
            return Err(AdminError::Rejected("simulated queue failure".to_string()));
        }
        self.inner.configure_instances(queue, group, instances).await
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}
