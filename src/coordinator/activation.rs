// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::{ActivationError, TopologyError};
use crate::flow::FlowSpecification;
use crate::observability::messages::coordinator::{
    ActivationCompleted, ActivationFailed, ActivationStarted, QueueConfigurationAttempt,
};
use crate::observability::messages::StructuredLog;
use crate::topology::{consumer_group_id, generate_queue_specs, QueueName};
use crate::traits::{GroupCounts, QueueAdmin};

/// Newtype wrapper for the flowlet-to-consumed-queues index
///
/// This is what activation hands back to the supervisor: for each flowlet,
/// the set of queues it consumes. A later reconfiguration pass feeds one
/// flowlet's entry straight into the reconfiguration coordinator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumedQueues(pub BTreeMap<String, BTreeSet<QueueName>>);

impl ConsumedQueues {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// The queues a flowlet consumes, if it consumes any
    pub fn queues_for(&self, flowlet_id: &str) -> Option<&BTreeSet<QueueName>> {
        self.0.get(flowlet_id)
    }

    /// All flowlet ids that consume at least one queue
    pub fn flowlet_ids(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

/// Topology coordinator that activates a flow's queue configuration.
///
/// Activation compiles the flow into its queue spec table, derives each
/// flowlet's consumer group id, folds both into one configuration table per
/// queue, and pushes every queue's complete group membership through the
/// queue admin. It is the write path that makes a declared flow real.
///
/// ## Activation Pass
///
/// The pass runs in distinct phases:
/// 1. **Compilation**: The pure generator resolves every connection; any
///    topology violation surfaces here, before admin traffic
/// 2. **Table Construction**: Per queue, the complete group id to instance
///    count map, so one admin call carries full membership
/// 3. **Fan-Out**: One `configure_groups` call per queue, concurrent across
///    queues and bounded by a semaphore
///
/// ## Concurrency Control
/// - Uses tokio::sync::Semaphore to limit concurrent admin calls
/// - Queues are independent, so call ordering carries no meaning
/// - The pass completes only when every per-queue call has finished
///
/// ## Failure Semantics
/// - Fail-fast: the first per-queue failure cancels the remaining calls and
///   fails the whole pass
/// - No partial activation is ever reported as success; the recovery path is
///   re-running activation, which is idempotent against a healthy admin
/// - The attempted configuration is logged before each admin call, so failed
///   passes leave a record of what was pushed
pub struct TopologyCoordinator {
    /// Maximum number of concurrent per-queue admin calls
    max_concurrency: usize,
}

impl TopologyCoordinator {
    /// Create a new topology coordinator with the specified concurrency limit
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1), // Ensure at least 1
        }
    }


    /// Activate a flow against the given queue admin.
    ///
    /// Compiles the flow, builds the per-queue consumer group tables, and
    /// issues one `configure_groups` call per distinct queue. Returns the
    /// flowlet-to-consumed-queues index on success.
    ///
    /// Cancelling the token abandons the pass: outstanding admin calls are
    /// not awaited and the flow must be treated as not activated.
    pub async fn configure_flow(
        &self,
        flow: &FlowSpecification,
        admin: Arc<dyn QueueAdmin>,
        cancellation_token: &CancellationToken,
    ) -> Result<ConsumedQueues, ActivationError> {
        let start_time = Instant::now();

        // Compile the topology before any admin traffic
        let spec_table = generate_queue_specs(flow)?;

        // Fold flowlet group ids and instance counts into per-queue tables
        let mut queue_configs: BTreeMap<QueueName, GroupCounts> = BTreeMap::new();
        let mut consumed = ConsumedQueues::new();

        for flowlet in &flow.flowlets {
            let over_cap = flowlet
                .max_instances
                .is_some_and(|max| flowlet.instances > max);
            if flowlet.instances == 0 || over_cap {
                return Err(ActivationError::Topology(
                    TopologyError::InvalidInstanceCount {
                        flowlet_id: flowlet.id.clone(),
                        instances: flowlet.instances,
                        max_instances: flowlet.max_instances,
                    },
                ));
            }

            let group = consumer_group_id(&flow.name, &flowlet.id);
            for spec in spec_table.specs_consumed_by(&flowlet.id) {
                queue_configs
                    .entry(spec.name.clone())
                    .or_default()
                    .insert(group, flowlet.instances);
                consumed
                    .0
                    .entry(flowlet.id.clone())
                    .or_default()
                    .insert(spec.name.clone());
            }
        }

        let queue_count = queue_configs.len();
        ActivationStarted {
            flow: &flow.name,
            flowlet_count: flow.flowlets.len(),
            queue_count,
            max_concurrency: self.max_concurrency,
        }
        .log();

        // One configure_groups call per queue, bounded fan-out
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.max_concurrency));
        let cancel = cancellation_token.child_token();
        let mut tasks = Vec::new();

        for (queue, groups) in queue_configs {
            let admin_clone = admin.clone();
            let semaphore_clone = semaphore.clone();
            let cancel_clone = cancel.clone();

            let task = tokio::spawn(async move {
                // Acquire semaphore permit with proper error handling
                let _permit = semaphore_clone.acquire().await.map_err(|e| {
                    ActivationError::Internal {
                        message: format!(
                            "Failed to acquire semaphore permit for queue '{}': {}",
                            queue, e
                        ),
                    }
                })?;

                // The attempted configuration goes on record before the call
                QueueConfigurationAttempt {
                    queue: &queue,
                    groups: &groups,
                }
                .log();

                // Biased so a cancelled pass never reports a late success
                tokio::select! {
                    biased;
                    _ = cancel_clone.cancelled() => Err(ActivationError::Cancelled),
                    result = admin_clone.configure_groups(&queue, &groups) => {
                        result.map_err(|source| ActivationError::QueueConfig { queue, source })
                    }
                }
            });

            tasks.push(task);
        }

        // Fail fast: the first error cancels the remaining calls
        for task in tasks {
            match task.await {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => {
                    cancel.cancel();
                    ActivationFailed {
                        flow: &flow.name,
                        error: &e,
                    }
                    .log();
                    return Err(e);
                }
                Err(join_error) => {
                    cancel.cancel();
                    let e = ActivationError::Internal {
                        message: format!("Task join error: {}", join_error),
                    };
                    ActivationFailed {
                        flow: &flow.name,
                        error: &e,
                    }
                    .log();
                    return Err(e);
                }
            }
        }

        ActivationCompleted {
            flow: &flow.name,
            queue_count,
            duration: start_time.elapsed(),
        }
        .log();

        Ok(consumed)
    }
}
