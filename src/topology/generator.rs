//! Queue specification generation, the pure half of topology compilation.
//!
//! The generator turns a flow specification into the concrete set of queues
//! the flow needs, resolving each declared connection against the producer's
//! output ports and the consumer's input ports. It performs no I/O and holds
//! no state; identical flows compile to identical tables on every run, which
//! is what lets activation be replayed safely after a failure.

use crate::errors::TopologyError;
use crate::flow::{FlowSpecification, Node, PartitionStrategy, Schema};
use crate::topology::QueueName;
use std::collections::{BTreeMap, BTreeSet};

/// A fully resolved description of one queue as one consumer sees it.
///
/// Carries the queue's name, the partitioning strategy the consumer declared,
/// and the schema of the producer port feeding the queue. Specifications are
/// generated fresh on every compilation pass and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueueSpecification {
    pub name: QueueName,
    pub strategy: PartitionStrategy,
    pub schema: Schema,
}

/// Queue specifications keyed by (producer node, consumer flowlet id).
///
/// Connections that share a producer node produce entries under different
/// consumer columns but carry the same `QueueName`, which is how fan-out
/// becomes multiple consumer groups on a single queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueSpecTable(pub BTreeMap<(Node, String), BTreeSet<QueueSpecification>>);

impl QueueSpecTable {
    /// Iterate the specifications for every queue a flowlet consumes.
    pub fn specs_consumed_by<'a>(
        &'a self,
        flowlet_id: &'a str,
    ) -> impl Iterator<Item = &'a QueueSpecification> {
        self.0
            .iter()
            .filter(move |((_, consumer), _)| consumer == flowlet_id)
            .flat_map(|(_, specs)| specs.iter())
    }

    /// The distinct queue names appearing anywhere in the table.
    pub fn queue_names(&self) -> BTreeSet<QueueName> {
        self.0
            .values()
            .flat_map(|specs| specs.iter().map(|spec| spec.name.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compile a flow specification into its queue spec table.
///
/// One `QueueSpecification` is produced per declared connection. The
/// function fails on the first topology violation it finds: a connection
/// endpoint that does not resolve, a second connection for the same
/// (producer node, consumer flowlet) pair, or a hash partitioning key that
/// is not a field of the producer port's schema.
///
/// The checks are repeated here even though `validate_flow` covers them,
/// because generation must hold its own contract for hand-built flows that
/// never went through the loader.
pub fn generate_queue_specs(flow: &FlowSpecification) -> Result<QueueSpecTable, TopologyError> {
    let mut table: BTreeMap<(Node, String), BTreeSet<QueueSpecification>> = BTreeMap::new();

    for connection in &flow.connections {
        let producer = flow.flowlet(&connection.from.flowlet).ok_or_else(|| {
            TopologyError::UnknownFlowlet {
                flowlet_id: connection.from.flowlet.clone(),
            }
        })?;
        let schema = producer.outputs.get(&connection.from.port).ok_or_else(|| {
            TopologyError::UnknownOutputPort {
                flowlet_id: producer.id.clone(),
                port: connection.from.port.clone(),
            }
        })?;
        let consumer = flow.flowlet(&connection.to.flowlet).ok_or_else(|| {
            TopologyError::UnknownFlowlet {
                flowlet_id: connection.to.flowlet.clone(),
            }
        })?;
        if !consumer.inputs.contains(&connection.to.port) {
            return Err(TopologyError::UnknownInputPort {
                flowlet_id: consumer.id.clone(),
                port: connection.to.port.clone(),
            });
        }

        if let PartitionStrategy::Hash { key } = &connection.strategy {
            if !schema.has_field(key) {
                return Err(TopologyError::SchemaMismatch {
                    flowlet_id: producer.id.clone(),
                    port: connection.from.port.clone(),
                    key: key.clone(),
                });
            }
        }

        let cell = (connection.from.clone(), consumer.id.clone());
        if table.contains_key(&cell) {
            return Err(TopologyError::DuplicateConnection {
                producer_id: connection.from.flowlet.clone(),
                port: connection.from.port.clone(),
                consumer_id: consumer.id.clone(),
            });
        }

        let spec = QueueSpecification {
            name: QueueName::new(&flow.name, &producer.id, &connection.from.port),
            strategy: connection.strategy.clone(),
            schema: schema.clone(),
        };
        table.insert(cell, BTreeSet::from([spec]));
    }

    Ok(QueueSpecTable(table))
}
