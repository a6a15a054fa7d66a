use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::backends::memory::MemoryQueueAdmin;
use crate::backends::stub::{FlakyQueueAdmin, RejectingQueueAdmin};
use crate::coordinator::{ReconfigurationCoordinator, TopologyCoordinator};
use crate::errors::{ActivationError, TopologyError};
use crate::flow::{
    Connection, FieldType, FlowSpecification, FlowletDefinition, Node, PartitionStrategy, Schema,
};
use crate::topology::{consumer_group_id, QueueName};
use crate::traits::GroupCounts;

/// Integration tests for the topology coordinators using the in-memory queue admin
#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, port: &str, instances: usize) -> FlowletDefinition {
        let mut flowlet = FlowletDefinition::new(id, "demo.Source");
        flowlet.instances = instances;
        flowlet.outputs.insert(
            port.to_string(),
            Schema(BTreeMap::from([
                ("vehicle_id".to_string(), FieldType::String),
                ("speed".to_string(), FieldType::Double),
            ])),
        );
        flowlet
    }

    fn stage(id: &str, in_port: &str, out_port: &str, instances: usize) -> FlowletDefinition {
        let mut flowlet = source(id, out_port, instances);
        flowlet.class = "demo.Stage".to_string();
        flowlet.inputs.push(in_port.to_string());
        flowlet
    }

    fn sink(id: &str, port: &str, instances: usize) -> FlowletDefinition {
        let mut flowlet = FlowletDefinition::new(id, "demo.Sink");
        flowlet.instances = instances;
        flowlet.inputs.push(port.to_string());
        flowlet
    }

    fn connect(from: (&str, &str), to: (&str, &str), strategy: PartitionStrategy) -> Connection {
        Connection {
            from: Node::new(from.0, from.1),
            to: Node::new(to.0, to.1),
            strategy,
        }
    }

    fn counts(entries: &[((&str, &str), usize)]) -> GroupCounts {
        entries
            .iter()
            .map(|((flow, flowlet), instances)| (consumer_group_id(flow, flowlet), *instances))
            .collect()
    }

    #[tokio::test]
    async fn test_linear_pipeline_lands_expected_snapshot() {
        // ingest -> normalize -> archive, one queue per hop
        let flow = FlowSpecification {
            name: "telemetry".to_string(),
            flowlets: vec![
                source("ingest", "raw", 2),
                stage("normalize", "raw", "clean", 4),
                sink("archive", "clean", 1),
            ],
            connections: vec![
                connect(("ingest", "raw"), ("normalize", "raw"), PartitionStrategy::Fifo),
                connect(
                    ("normalize", "clean"),
                    ("archive", "clean"),
                    PartitionStrategy::RoundRobin,
                ),
            ],
        };

        let admin = Arc::new(MemoryQueueAdmin::new());
        let consumed = TopologyCoordinator::new(4)
            .configure_flow(&flow, admin.clone(), &CancellationToken::new())
            .await
            .unwrap();

        // Every queue carries exactly its consumer's group at its instance count
        let expected = BTreeMap::from([
            (
                QueueName::new("telemetry", "ingest", "raw"),
                counts(&[(("telemetry", "normalize"), 4)]),
            ),
            (
                QueueName::new("telemetry", "normalize", "clean"),
                counts(&[(("telemetry", "archive"), 1)]),
            ),
        ]);
        assert_eq!(admin.snapshot().await, expected);

        // The index tells each consumer which queues to read
        assert_eq!(
            consumed.queues_for("normalize").unwrap(),
            &BTreeSet::from([QueueName::new("telemetry", "ingest", "raw")])
        );
        assert_eq!(
            consumed.queues_for("archive").unwrap(),
            &BTreeSet::from([QueueName::new("telemetry", "normalize", "clean")])
        );
    }

    #[tokio::test]
    async fn test_fan_out_rescale_touches_only_target_group() {
        // One output consumed by two flowlets: a single shared queue
        let flow = FlowSpecification {
            name: "telemetry".to_string(),
            flowlets: vec![
                source("ingest", "raw", 1),
                sink("rollup", "raw", 2),
                sink("alert", "raw", 3),
            ],
            connections: vec![
                connect(
                    ("ingest", "raw"),
                    ("rollup", "raw"),
                    PartitionStrategy::Hash {
                        key: "vehicle_id".to_string(),
                    },
                ),
                connect(("ingest", "raw"), ("alert", "raw"), PartitionStrategy::Broadcast),
            ],
        };

        let admin = Arc::new(MemoryQueueAdmin::new());
        let consumed = TopologyCoordinator::new(4)
            .configure_flow(&flow, admin.clone(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(admin.queue_count().await, 1);

        // Rescale rollup through its consumed-queues entry
        ReconfigurationCoordinator::new(4)
            .reconfigure(
                consumed.queues_for("rollup").unwrap(),
                consumer_group_id("telemetry", "rollup"),
                8,
                admin.clone(),
            )
            .await
            .unwrap();

        // alert's group is untouched by rollup's rescale
        let queue = QueueName::new("telemetry", "ingest", "raw");
        assert_eq!(
            admin.group_counts(&queue).await.unwrap(),
            counts(&[(("telemetry", "rollup"), 8), (("telemetry", "alert"), 3)])
        );
    }

    #[tokio::test]
    async fn test_failed_activation_replays_to_convergence() {
        let flow = FlowSpecification {
            name: "telemetry".to_string(),
            flowlets: vec![
                source("ingest", "raw", 2),
                stage("normalize", "raw", "clean", 4),
                sink("archive", "clean", 1),
            ],
            connections: vec![
                connect(("ingest", "raw"), ("normalize", "raw"), PartitionStrategy::Fifo),
                connect(
                    ("normalize", "clean"),
                    ("archive", "clean"),
                    PartitionStrategy::Fifo,
                ),
            ],
        };

        // First pass fails on one queue and reports no partial success
        let doomed = QueueName::new("telemetry", "ingest", "raw");
        let flaky = Arc::new(FlakyQueueAdmin::failing_on(doomed));
        let coordinator = TopologyCoordinator::new(4);
        let result = coordinator
            .configure_flow(&flow, flaky.clone(), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(ActivationError::QueueConfig { .. })));

        // Replaying against the same state once the fault clears converges
        coordinator
            .configure_flow(&flow, flaky.inner(), &CancellationToken::new())
            .await
            .unwrap();

        let expected = BTreeMap::from([
            (
                QueueName::new("telemetry", "ingest", "raw"),
                counts(&[(("telemetry", "normalize"), 4)]),
            ),
            (
                QueueName::new("telemetry", "normalize", "clean"),
                counts(&[(("telemetry", "archive"), 1)]),
            ),
        ]);
        assert_eq!(flaky.inner().snapshot().await, expected);
    }

    #[tokio::test]
    async fn test_duplicate_connection_fails_before_any_admin_call() {
        // Same producer node wired to the same consumer twice
        let flow = FlowSpecification {
            name: "telemetry".to_string(),
            flowlets: vec![source("ingest", "raw", 1), sink("rollup", "raw", 2)],
            connections: vec![
                connect(("ingest", "raw"), ("rollup", "raw"), PartitionStrategy::Fifo),
                connect(
                    ("ingest", "raw"),
                    ("rollup", "raw"),
                    PartitionStrategy::Broadcast,
                ),
            ],
        };

        let admin = Arc::new(RejectingQueueAdmin::new());
        let result = TopologyCoordinator::new(4)
            .configure_flow(&flow, admin.clone(), &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(ActivationError::Topology(
                TopologyError::DuplicateConnection { .. }
            ))
        ));
        assert_eq!(admin.calls(), 0);
    }

    #[tokio::test]
    async fn test_hash_key_missing_from_schema_fails_before_any_admin_call() {
        let flow = FlowSpecification {
            name: "telemetry".to_string(),
            flowlets: vec![source("ingest", "raw", 1), sink("rollup", "raw", 2)],
            connections: vec![connect(
                ("ingest", "raw"),
                ("rollup", "raw"),
                PartitionStrategy::Hash {
                    key: "license_plate".to_string(),
                },
            )],
        };

        let admin = Arc::new(RejectingQueueAdmin::new());
        let result = TopologyCoordinator::new(4)
            .configure_flow(&flow, admin.clone(), &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(ActivationError::Topology(TopologyError::SchemaMismatch { .. }))
        ));
        assert_eq!(admin.calls(), 0);
    }

    #[tokio::test]
    async fn test_diamond_flow_with_mixed_strategies() {
        // ingest fans out to rollup and alert; both feed report
        let flow = FlowSpecification {
            name: "traffic".to_string(),
            flowlets: vec![
                source("ingest", "events", 2),
                stage("rollup", "events", "totals", 3),
                stage("alert", "events", "alerts", 1),
                sink("report", "in", 2),
            ],
            connections: vec![
                connect(
                    ("ingest", "events"),
                    ("rollup", "events"),
                    PartitionStrategy::Hash {
                        key: "vehicle_id".to_string(),
                    },
                ),
                connect(
                    ("ingest", "events"),
                    ("alert", "events"),
                    PartitionStrategy::Broadcast,
                ),
                connect(("rollup", "totals"), ("report", "in"), PartitionStrategy::Fifo),
                connect(("alert", "alerts"), ("report", "in"), PartitionStrategy::Fifo),
            ],
        };

        let admin = Arc::new(MemoryQueueAdmin::new());
        let consumed = TopologyCoordinator::new(2)
            .configure_flow(&flow, admin.clone(), &CancellationToken::new())
            .await
            .unwrap();

        // Three distinct queues: the shared fan-out queue and one per join edge
        let expected = BTreeMap::from([
            (
                QueueName::new("traffic", "ingest", "events"),
                counts(&[(("traffic", "rollup"), 3), (("traffic", "alert"), 1)]),
            ),
            (
                QueueName::new("traffic", "rollup", "totals"),
                counts(&[(("traffic", "report"), 2)]),
            ),
            (
                QueueName::new("traffic", "alert", "alerts"),
                counts(&[(("traffic", "report"), 2)]),
            ),
        ]);
        assert_eq!(admin.snapshot().await, expected);

        // report consumes from both of its upstream queues
        assert_eq!(
            consumed.queues_for("report").unwrap(),
            &BTreeSet::from([
                QueueName::new("traffic", "rollup", "totals"),
                QueueName::new("traffic", "alert", "alerts"),
            ])
        );
    }
}
