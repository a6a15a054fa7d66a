// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::flow::{validate_flow, FlowSpecification};
use crate::observability::messages::validation::{FlowValidated, FlowValidationFailed};
use crate::observability::messages::StructuredLog;
use std::fs;
use std::path::Path;

/// Load a flow specification from a YAML file
pub fn load_flow<P: AsRef<Path>>(path: P) -> Result<FlowSpecification, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let flow: FlowSpecification = serde_yaml::from_str(&content)?;
    Ok(flow)
}

/// Load and validate a flow specification from a YAML file
///
/// This function loads the flow and validates its wiring so that dangling
/// ports, duplicate connections, and bad hash keys are reported before the
/// flow reaches the topology coordinator.
pub fn load_and_validate_flow<P: AsRef<Path>>(
    path: P,
) -> Result<FlowSpecification, Box<dyn std::error::Error>> {
    let flow = load_flow(path)?;

    // Validate the flow graph
    if let Err(validation_errors) = validate_flow(&flow) {
        FlowValidationFailed {
            flow: &flow.name,
            error_count: validation_errors.len(),
        }
        .log();

        // Convert validation errors into a single error message
        let error_messages: Vec<String> = validation_errors.iter().map(|e| e.to_string()).collect();
        let combined_error = format!(
            "Flow validation failed:\n{}",
            error_messages.join("\n")
        );
        return Err(combined_error.into());
    }

    FlowValidated {
        flow: &flow.name,
        flowlet_count: flow.flowlets.len(),
        connection_count: flow.connections.len(),
    }
    .log();

    Ok(flow)
}
