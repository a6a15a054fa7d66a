use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::{AdminError, ReconfigureError};
use crate::observability::messages::coordinator::{
    ReconfigurationApplied, ReconfigurationPartialFailure,
};
use crate::observability::messages::StructuredLog;
use crate::topology::{ConsumerGroupId, QueueName};
use crate::traits::QueueAdmin;

/// Coordinator for rescaling one consumer group across its queues.
///
/// Where activation is all-or-nothing, reconfiguration is best-effort: every
/// queue is attempted regardless of earlier failures, and the caller gets an
/// exact accounting of which queues now carry the new instance count. A
/// running flow with a half-applied rescale is still a running flow, so
/// abandoning the remaining queues on first error would only widen the skew.
pub struct ReconfigurationCoordinator {
    /// Maximum number of concurrent per-queue admin calls
    max_concurrency: usize,
}

impl ReconfigurationCoordinator {
    /// Create a new reconfiguration coordinator with the specified concurrency limit
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1), // Ensure at least 1
        }
    }

    /// Set one consumer group's instance count on every given queue.
    ///
    /// Attempts all queues even when some fail. Returns `Ok(())` only when
    /// every queue accepted the new count; otherwise returns
    /// [`ReconfigureError::Partial`] listing exactly which queues were
    /// updated and which were not.
    pub async fn reconfigure(
        &self,
        queues: &BTreeSet<QueueName>,
        group: ConsumerGroupId,
        instances: usize,
        admin: Arc<dyn QueueAdmin>,
    ) -> Result<(), ReconfigureError> {
        // Zero instances would erase the group; that is a topology change,
        // not a rescale, and it is rejected before any admin traffic
        if instances == 0 {
            return Err(ReconfigureError::InvalidInstanceCount { instances });
        }

        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.max_concurrency));
        let mut tasks = Vec::new();

        for queue in queues {
            let queue = queue.clone();
            let admin_clone = admin.clone();
            let semaphore_clone = semaphore.clone();

            let task = tokio::spawn(async move {
                let result = match semaphore_clone.acquire().await {
                    Ok(_permit) => {
                        admin_clone
                            .configure_instances(&queue, group, instances)
                            .await
                    }
                    Err(e) => Err(AdminError::Rejected(format!(
                        "Failed to acquire semaphore permit: {}",
                        e
                    ))),
                };
                (queue, result)
            });

            tasks.push(task);
        }

        // Every task is awaited; failures are collected, never short-circuited
        let mut applied = BTreeSet::new();
        let mut failed = Vec::new();

        for task in tasks {
            match task.await {
                Ok((queue, Ok(()))) => {
                    applied.insert(queue);
                }
                Ok((queue, Err(e))) => {
                    failed.push((queue, e));
                }
                Err(join_error) => {
                    return Err(ReconfigureError::Internal {
                        message: format!("Task join error: {}", join_error),
                    });
                }
            }
        }

        if failed.is_empty() {
            ReconfigurationApplied {
                group,
                instances,
                queue_count: applied.len(),
            }
            .log();
            Ok(())
        } else {
            ReconfigurationPartialFailure {
                group,
                applied: applied.len(),
                failed: failed.len(),
            }
            .log();
            Err(ReconfigureError::Partial { applied, failed })
        }
    }
}
