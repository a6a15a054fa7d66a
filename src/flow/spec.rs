// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TopologyError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Declarative description of a dataflow application.
///
/// A flow is a graph of flowlets wired together by typed queues. The
/// specification carries everything the topology compiler needs: the flowlet
/// declarations (with their ports and schemas) and the connections between
/// them. It is immutable once built; the only sanctioned mutation is
/// [`FlowSpecification::scale_flowlet`], which produces an updated copy.
///
/// It is typically loaded from a YAML flow file.
///
/// # Fields
/// * `name` - Flow name, unique within a deployment (YAML key `flow`)
/// * `flowlets` - The processing units that make up the flow
/// * `connections` - Producer port to consumer port wiring
///
/// # Example
/// ```yaml
/// flow: traffic-rollup
/// flowlets:
///   - id: ingest
///     class: traffic.IngestFlowlet
///     instances: 2
///     outputs:
///       events: { vehicle_id: string, ts: long, speed: double }
///   - id: rollup
///     class: traffic.RollupFlowlet
///     instances: 3
///     inputs: [in]
/// connections:
///   - from: { flowlet: ingest, port: events }
///     to: { flowlet: rollup, port: in }
///     strategy: { hash: { key: vehicle_id } }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlowSpecification {
    #[serde(rename = "flow")]
    pub name: String,
    pub flowlets: Vec<FlowletDefinition>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl FlowSpecification {
    /// Build a flow specification and validate it in one step.
    ///
    /// This is the constructor for hand-built flows (tests, embedders). Flows
    /// loaded from YAML go through `load_and_validate_flow` instead, which
    /// ends up running the same validation.
    ///
    /// # Returns
    /// * `Ok(FlowSpecification)` - The flow is structurally valid
    /// * `Err(Vec<TopologyError>)` - Every violation found, accumulated
    pub fn try_new(
        name: impl Into<String>,
        flowlets: Vec<FlowletDefinition>,
        connections: Vec<Connection>,
    ) -> Result<Self, Vec<TopologyError>> {
        let flow = Self {
            name: name.into(),
            flowlets,
            connections,
        };
        crate::flow::validate_flow(&flow)?;
        Ok(flow)
    }

    /// Look up a flowlet definition by id.
    pub fn flowlet(&self, id: &str) -> Option<&FlowletDefinition> {
        self.flowlets.iter().find(|f| f.id == id)
    }

    /// Produce a copy of this flow with one flowlet's instance count changed.
    ///
    /// This is the controlled mutation point used by the supervisor when a
    /// flowlet is scaled. The new count must be at least 1 and must not
    /// exceed the flowlet's `max_instances` cap when one is declared.
    ///
    /// # Returns
    /// * `Ok(FlowSpecification)` - Updated copy, everything else unchanged
    /// * `Err(TopologyError)` - Unknown flowlet or out-of-range count
    pub fn scale_flowlet(&self, id: &str, instances: usize) -> Result<Self, TopologyError> {
        let mut flow = self.clone();
        let flowlet = flow
            .flowlets
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| TopologyError::UnknownFlowlet {
                flowlet_id: id.to_string(),
            })?;

        if instances == 0 || flowlet.max_instances.is_some_and(|max| instances > max) {
            return Err(TopologyError::InvalidInstanceCount {
                flowlet_id: id.to_string(),
                instances,
                max_instances: flowlet.max_instances,
            });
        }

        flowlet.instances = instances;
        Ok(flow)
    }
}

/// Declaration of a single flowlet in the flow.
///
/// Each flowlet is an independently scalable processing unit. The definition
/// names the implementation, declares how many parallel instances run, and
/// lists the named ports the flowlet reads from and writes to. Output ports
/// carry the schema of the events they emit; hash partitioning keys are
/// validated against that schema when the topology is compiled.
///
/// # Fields
/// * `id` - Unique identifier within the flow
/// * `class` - Implementation reference, opaque to the topology compiler
/// * `description` - Human-readable description (optional)
/// * `instances` - Number of parallel instances (defaults to 1)
/// * `max_instances` - Upper bound for scaling (optional, no cap when absent)
/// * `failure_policy` - How instance failures are handled (defaults to retry)
/// * `resources` - Per-instance resource demand (defaults to basic)
/// * `inputs` - Named input ports
/// * `outputs` - Named output ports with the schema each one emits
///
/// # Example
/// ```yaml
/// id: rollup
/// class: traffic.RollupFlowlet
/// instances: 3
/// max_instances: 8
/// inputs: [in]
/// outputs:
///   totals: { vehicle_id: string, count: long }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlowletDefinition {
    pub id: String,
    pub class: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_instances")]
    pub instances: usize,
    pub max_instances: Option<usize>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub resources: ResourceSpecification,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: BTreeMap<String, Schema>,
}

impl FlowletDefinition {
    /// Create a definition with defaults for everything but id and class.
    ///
    /// Ports and counts are plain public fields; callers set them directly.
    pub fn new(id: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
            description: String::new(),
            instances: default_instances(),
            max_instances: None,
            failure_policy: FailurePolicy::default(),
            resources: ResourceSpecification::default(),
            inputs: Vec::new(),
            outputs: BTreeMap::new(),
        }
    }
}

fn default_instances() -> usize {
    1
}

/// How a flowlet instance failure is handled by the runtime.
///
/// # Variants
/// * `Retry` - Re-deliver the input that was being processed (default)
/// * `Ignore` - Drop the input and move on
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    Retry,
    Ignore,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Retry
    }
}

/// Per-instance resource demand for a flowlet.
///
/// # Fields
/// * `virtual_cores` - CPU cores per instance (defaults to 1)
/// * `memory_mb` - Memory per instance in megabytes (defaults to 512)
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ResourceSpecification {
    #[serde(default = "default_virtual_cores")]
    pub virtual_cores: u16,
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u32,
}

/// The basic resource profile: one virtual core, 512 MB.
pub const BASIC_RESOURCES: ResourceSpecification = ResourceSpecification {
    virtual_cores: 1,
    memory_mb: 512,
};

impl Default for ResourceSpecification {
    fn default() -> Self {
        BASIC_RESOURCES
    }
}

fn default_virtual_cores() -> u16 {
    BASIC_RESOURCES.virtual_cores
}

fn default_memory_mb() -> u32 {
    BASIC_RESOURCES.memory_mb
}

/// One endpoint of a connection, a (flowlet, port) pair.
///
/// On the producer side of a connection the node names an output port; on
/// the consumer side it names an input port. Producer nodes are the join key
/// of the queue spec table: connections that share a producer node share a
/// queue.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Node {
    pub flowlet: String,
    pub port: String,
}

impl Node {
    pub fn new(flowlet: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            flowlet: flowlet.into(),
            port: port.into(),
        }
    }
}

/// A directed edge from a producer output port to a consumer input port.
///
/// The partitioning strategy is declared here, on the edge, and is never
/// inferred from the shape of the endpoints.
///
/// # Example
/// ```yaml
/// from: { flowlet: ingest, port: events }
/// to: { flowlet: rollup, port: in }
/// strategy: { hash: { key: vehicle_id } }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Connection {
    pub from: Node,
    pub to: Node,
    #[serde(default)]
    pub strategy: PartitionStrategy,
}

/// How events on a queue are divided among a consumer group's instances.
///
/// # Variants
/// * `Fifo` - Any instance may claim any event, first come first served (default)
/// * `RoundRobin` - Events are dealt to instances in rotation
/// * `Hash` - Events are routed by hashing the named schema field, so all
///   events with the same key reach the same instance
/// * `Broadcast` - Every instance receives every event
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    Fifo,
    RoundRobin,
    Hash { key: String },
    Broadcast,
}

impl Default for PartitionStrategy {
    fn default() -> Self {
        PartitionStrategy::Fifo
    }
}

/// Ordered field-name-to-type mapping for the events a port emits.
///
/// Field order is deterministic (BTreeMap) so schemas compare and print
/// identically across runs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Schema(pub BTreeMap<String, FieldType>);

impl Schema {
    /// Whether the schema declares a field with this name.
    pub fn has_field(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

/// Primitive type of a schema field.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Long,
    Int,
    Double,
    Bool,
    Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_flow() {
        let yaml = r#"
flow: traffic-rollup
flowlets:
  - id: ingest
    class: traffic.IngestFlowlet
    instances: 2
    outputs:
      events: { vehicle_id: string, ts: long }
  - id: rollup
    class: traffic.RollupFlowlet
    inputs: [in]
connections:
  - from: { flowlet: ingest, port: events }
    to: { flowlet: rollup, port: in }
    strategy: { hash: { key: vehicle_id } }
"#;

        let flow: FlowSpecification = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(flow.name, "traffic-rollup");
        assert_eq!(flow.flowlets.len(), 2);
        assert_eq!(flow.connections.len(), 1);
        assert_eq!(
            flow.connections[0].strategy,
            PartitionStrategy::Hash {
                key: "vehicle_id".to_string()
            }
        );
    }

    #[test]
    fn test_flowlet_defaults() {
        let yaml = r#"
flow: minimal
flowlets:
  - id: only
    class: Only
"#;

        let flow: FlowSpecification = serde_yaml::from_str(yaml).unwrap();
        let flowlet = &flow.flowlets[0];

        assert_eq!(flowlet.instances, 1);
        assert_eq!(flowlet.max_instances, None);
        assert_eq!(flowlet.failure_policy, FailurePolicy::Retry);
        assert_eq!(flowlet.resources, BASIC_RESOURCES);
        assert!(flowlet.inputs.is_empty());
        assert!(flowlet.outputs.is_empty());
    }

    #[test]
    fn test_strategy_parse_forms() {
        let fifo: PartitionStrategy = serde_yaml::from_str("fifo").unwrap();
        assert_eq!(fifo, PartitionStrategy::Fifo);

        let round_robin: PartitionStrategy = serde_yaml::from_str("round_robin").unwrap();
        assert_eq!(round_robin, PartitionStrategy::RoundRobin);

        let broadcast: PartitionStrategy = serde_yaml::from_str("broadcast").unwrap();
        assert_eq!(broadcast, PartitionStrategy::Broadcast);

        let hash: PartitionStrategy = serde_yaml::from_str("hash: { key: user }").unwrap();
        assert_eq!(
            hash,
            PartitionStrategy::Hash {
                key: "user".to_string()
            }
        );
    }

    #[test]
    fn test_schema_field_lookup() {
        let schema: Schema = serde_yaml::from_str("{ vehicle_id: string, ts: long }").unwrap();
        assert!(schema.has_field("vehicle_id"));
        assert!(schema.has_field("ts"));
        assert!(!schema.has_field("speed"));
        assert_eq!(schema.0.get("ts"), Some(&FieldType::Long));
    }

    #[test]
    fn test_scale_flowlet() {
        let mut flowlet = FlowletDefinition::new("rollup", "RollupFlowlet");
        flowlet.instances = 3;
        flowlet.max_instances = Some(8);
        let flow = FlowSpecification {
            name: "scale-test".to_string(),
            flowlets: vec![flowlet],
            connections: vec![],
        };

        let scaled = flow.scale_flowlet("rollup", 5).unwrap();
        assert_eq!(scaled.flowlet("rollup").unwrap().instances, 5);
        // Original is untouched
        assert_eq!(flow.flowlet("rollup").unwrap().instances, 3);
    }

    #[test]
    fn test_scale_flowlet_rejects_zero() {
        let flow = FlowSpecification {
            name: "scale-test".to_string(),
            flowlets: vec![FlowletDefinition::new("a", "A")],
            connections: vec![],
        };

        let result = flow.scale_flowlet("a", 0);
        assert!(matches!(
            result,
            Err(TopologyError::InvalidInstanceCount { instances: 0, .. })
        ));
    }

    #[test]
    fn test_scale_flowlet_respects_cap() {
        let mut flowlet = FlowletDefinition::new("a", "A");
        flowlet.max_instances = Some(4);
        let flow = FlowSpecification {
            name: "scale-test".to_string(),
            flowlets: vec![flowlet],
            connections: vec![],
        };

        let result = flow.scale_flowlet("a", 9);
        assert!(matches!(
            result,
            Err(TopologyError::InvalidInstanceCount {
                instances: 9,
                max_instances: Some(4),
                ..
            })
        ));
    }

    #[test]
    fn test_scale_unknown_flowlet() {
        let flow = FlowSpecification {
            name: "scale-test".to_string(),
            flowlets: vec![FlowletDefinition::new("a", "A")],
            connections: vec![],
        };

        let result = flow.scale_flowlet("missing", 2);
        assert!(matches!(result, Err(TopologyError::UnknownFlowlet { .. })));
    }
}
