// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod spec;
mod validation;


pub use loader::{load_and_validate_flow, load_flow};
pub use spec::{
    Connection, FailurePolicy, FieldType, FlowSpecification, FlowletDefinition, Node,
    PartitionStrategy, ResourceSpecification, Schema, BASIC_RESOURCES,
};
pub use validation::validate_flow;
