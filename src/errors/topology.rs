// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur while compiling a flow graph into queue specifications
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// A connection endpoint references a flowlet that is not declared in the flow
    UnknownFlowlet {
        /// The flowlet id that could not be resolved
        flowlet_id: String,
    },
    /// A connection reads from an output port the producer flowlet does not declare
    UnknownOutputPort {
        /// The producer flowlet
        flowlet_id: String,
        /// The missing output port
        port: String,
    },
    /// A connection writes to an input port the consumer flowlet does not declare
    UnknownInputPort {
        /// The consumer flowlet
        flowlet_id: String,
        /// The missing input port
        port: String,
    },
    /// The same flowlet id is declared more than once
    DuplicateFlowlet {
        /// The duplicate flowlet id
        flowlet_id: String,
    },
    /// Two connections wire the same producer port to the same consumer flowlet
    DuplicateConnection {
        /// The producer flowlet
        producer_id: String,
        /// The producer output port
        port: String,
        /// The consumer flowlet
        consumer_id: String,
    },
    /// A hash partitioning key is not a field of the producer port's schema
    SchemaMismatch {
        /// The producer flowlet
        flowlet_id: String,
        /// The producer output port
        port: String,
        /// The hash key that could not be resolved against the schema
        key: String,
    },
    /// A flowlet declares an instance count outside its valid range
    InvalidInstanceCount {
        /// The offending flowlet
        flowlet_id: String,
        /// The declared instance count
        instances: usize,
        /// The declared upper bound, when one is set
        max_instances: Option<usize>,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::UnknownFlowlet { flowlet_id } => {
                write!(f, "Connection references flowlet '{}' which is not declared", flowlet_id)
            }
            TopologyError::UnknownOutputPort { flowlet_id, port } => {
                write!(
                    f,
                    "Flowlet '{}' does not declare an output port named '{}'",
                    flowlet_id, port
                )
            }
            TopologyError::UnknownInputPort { flowlet_id, port } => {
                write!(
                    f,
                    "Flowlet '{}' does not declare an input port named '{}'",
                    flowlet_id, port
                )
            }
            TopologyError::DuplicateFlowlet { flowlet_id } => {
                write!(f, "Duplicate flowlet id: '{}'", flowlet_id)
            }
            TopologyError::DuplicateConnection {
                producer_id,
                port,
                consumer_id,
            } => {
                write!(
                    f,
                    "Duplicate connection from '{}:{}' to flowlet '{}'",
                    producer_id, port, consumer_id
                )
            }
            TopologyError::SchemaMismatch { flowlet_id, port, key } => {
                write!(
                    f,
                    "Hash key '{}' is not a field of output '{}' on flowlet '{}'",
                    key, port, flowlet_id
                )
            }
            TopologyError::InvalidInstanceCount {
                flowlet_id,
                instances,
                max_instances,
            } => match max_instances {
                Some(max) => write!(
                    f,
                    "Flowlet '{}' declares {} instances but allows at most {}",
                    flowlet_id, instances, max
                ),
                None => write!(
                    f,
                    "Flowlet '{}' declares {} instances (must be at least 1)",
                    flowlet_id, instances
                ),
            },
        }
    }
}

impl std::error::Error for TopologyError {}
