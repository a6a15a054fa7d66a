//! Flow graph validation for topology integrity and correctness.
//!
//! This module validates flow specifications before they reach the topology
//! compiler, ensuring flowlet declarations are coherent and every connection
//! resolves to real ports. Validation accumulates errors so users see all
//! violations at once rather than fixing them one by one.
//!
//! # Validation Pipeline
//!
//! The validation process runs in stages:
//!
//! 1. **Uniqueness**: Flowlet ids are unique within the flow
//! 2. **Endpoint Resolution**: Connections reference declared flowlets and ports
//! 3. **Connection Uniqueness**: No producer port is wired to the same consumer twice
//! 4. **Instance Counts**: Declared counts are at least 1 and within any cap
//! 5. **Hash Keys**: Hash partitioning keys exist in the producer port's schema
//!
//! The hash key stage only runs when endpoint resolution passed, since it
//! needs the producer's schema to check against.
//!
//! # Examples
//!
//! ```rust
//! use millrace::flow::{validate_flow, Connection, FlowSpecification, FlowletDefinition, Node};
//!
//! let flow = FlowSpecification {
//!     name: "example".to_string(),
//!     flowlets: vec![FlowletDefinition::new("source", "Source")],
//!     connections: vec![],
//! };
//!
//! match validate_flow(&flow) {
//!     Ok(()) => println!("Flow is valid"),
//!     Err(errors) => {
//!         for error in errors {
//!             eprintln!("Validation error: {}", error);
//!         }
//!     }
//! }
//! ```

use crate::errors::TopologyError;
use crate::flow::{FlowSpecification, PartitionStrategy};
use std::collections::HashSet;

/// Validates a flow specification's structure and wiring.
///
/// This is the main validation entry point, run by `load_and_validate_flow`
/// and by `FlowSpecification::try_new`. The topology compiler re-checks the
/// same conditions one connection at a time; this function exists to report
/// everything wrong with a flow in a single pass.
///
/// # Arguments
///
/// * `flow` - The flow specification to validate
///
/// # Returns
///
/// * `Ok(())` - Flow is valid and ready for compilation
/// * `Err(Vec<TopologyError>)` - List of all violations found
pub fn validate_flow(flow: &FlowSpecification) -> Result<(), Vec<TopologyError>> {
    let mut errors = Vec::new();

    // Check for duplicate flowlet ids
    if let Err(duplicate_errors) = validate_unique_flowlet_ids(flow) {
        errors.extend(duplicate_errors);
    }

    // Check that every connection endpoint resolves to a declared port
    let endpoints_ok = match validate_connection_endpoints(flow) {
        Ok(()) => true,
        Err(endpoint_errors) => {
            errors.extend(endpoint_errors);
            false
        }
    };

    // Check for duplicate connections
    if let Err(duplicate_errors) = validate_unique_connections(flow) {
        errors.extend(duplicate_errors);
    }

    // Check declared instance counts
    if let Err(count_errors) = validate_instance_counts(flow) {
        errors.extend(count_errors);
    }

    // Check hash keys against producer schemas (needs resolved endpoints)
    if endpoints_ok {
        if let Err(key_errors) = validate_hash_keys(flow) {
            errors.extend(key_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that all flowlet ids are unique within the flow.
///
/// Flowlet ids are the primary key for connection endpoints, consumer group
/// identity, and scaling operations, so a duplicate would make the rest of
/// the pipeline ambiguous.
fn validate_unique_flowlet_ids(flow: &FlowSpecification) -> Result<(), Vec<TopologyError>> {
    let mut seen_ids = HashSet::new();
    let mut errors = Vec::new();

    for flowlet in &flow.flowlets {
        if !seen_ids.insert(&flowlet.id) {
            errors.push(TopologyError::DuplicateFlowlet {
                flowlet_id: flowlet.id.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that every connection endpoint names a declared flowlet and port.
///
/// The producer side must name one of the flowlet's output ports and the
/// consumer side one of its input ports. Port checks are skipped for
/// endpoints whose flowlet is unknown, since there is no declaration to
/// check against.
fn validate_connection_endpoints(flow: &FlowSpecification) -> Result<(), Vec<TopologyError>> {
    let mut errors = Vec::new();

    for connection in &flow.connections {
        match flow.flowlet(&connection.from.flowlet) {
            None => errors.push(TopologyError::UnknownFlowlet {
                flowlet_id: connection.from.flowlet.clone(),
            }),
            Some(producer) => {
                if !producer.outputs.contains_key(&connection.from.port) {
                    errors.push(TopologyError::UnknownOutputPort {
                        flowlet_id: producer.id.clone(),
                        port: connection.from.port.clone(),
                    });
                }
            }
        }

        match flow.flowlet(&connection.to.flowlet) {
            None => errors.push(TopologyError::UnknownFlowlet {
                flowlet_id: connection.to.flowlet.clone(),
            }),
            Some(consumer) => {
                if !consumer.inputs.contains(&connection.to.port) {
                    errors.push(TopologyError::UnknownInputPort {
                        flowlet_id: consumer.id.clone(),
                        port: connection.to.port.clone(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that no producer node is wired to the same consumer flowlet twice.
///
/// Two such connections would describe the same queue with potentially
/// conflicting strategies, so they are rejected outright.
fn validate_unique_connections(flow: &FlowSpecification) -> Result<(), Vec<TopologyError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for connection in &flow.connections {
        let edge = (
            connection.from.flowlet.as_str(),
            connection.from.port.as_str(),
            connection.to.flowlet.as_str(),
        );
        if !seen.insert(edge) {
            errors.push(TopologyError::DuplicateConnection {
                producer_id: connection.from.flowlet.clone(),
                port: connection.from.port.clone(),
                consumer_id: connection.to.flowlet.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that declared instance counts are within range for every flowlet.
fn validate_instance_counts(flow: &FlowSpecification) -> Result<(), Vec<TopologyError>> {
    let mut errors = Vec::new();

    for flowlet in &flow.flowlets {
        let over_cap = flowlet.max_instances.is_some_and(|max| flowlet.instances > max);
        if flowlet.instances == 0 || over_cap {
            errors.push(TopologyError::InvalidInstanceCount {
                flowlet_id: flowlet.id.clone(),
                instances: flowlet.instances,
                max_instances: flowlet.max_instances,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates hash partitioning keys against producer port schemas.
///
/// Only runs once endpoints are known to resolve; the producer's declared
/// schema is the source of truth for which keys are hashable.
fn validate_hash_keys(flow: &FlowSpecification) -> Result<(), Vec<TopologyError>> {
    let mut errors = Vec::new();

    for connection in &flow.connections {
        let PartitionStrategy::Hash { key } = &connection.strategy else {
            continue;
        };

        // Endpoint validation has already run, so both lookups succeed here
        let Some(producer) = flow.flowlet(&connection.from.flowlet) else {
            continue;
        };
        let Some(schema) = producer.outputs.get(&connection.from.port) else {
            continue;
        };

        if !schema.has_field(key) {
            errors.push(TopologyError::SchemaMismatch {
                flowlet_id: producer.id.clone(),
                port: connection.from.port.clone(),
                key: key.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
