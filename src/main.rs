// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use millrace::backends::memory::MemoryQueueAdmin;
use millrace::coordinator::{ReconfigurationCoordinator, TopologyCoordinator};
use millrace::flow::load_and_validate_flow;
use millrace::topology::consumer_group_id;
use millrace::traits::QueueAdmin;

/// Get the default concurrency level based on system capabilities
///
/// Returns the number of available CPU cores, falling back to 4 if detection fails.
/// This provides a sensible default for concurrent queue configuration calls.
fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("millrace=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <flow1.yaml> [flow2.yaml ...]", args[0]);
        eprintln!("Example: {} flows/traffic-rollup.yaml", args[0]);
        eprintln!("Example: {} flows/traffic-rollup.yaml flows/linear-pipeline.yaml", args[0]);
        std::process::exit(1);
    }

    let flow_files = &args[1..];

    println!("🚀 Millrace Topology Activation Demo");
    println!("═════════════════════════════════════");
    println!("Flow files: {:?}", flow_files);

    for (i, flow_file) in flow_files.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(80));
        }

        match run_single_flow(flow_file).await {
            Ok(_) => {}
            Err(e) => {
                eprintln!("❌ Failed to activate {}: {}", flow_file, e);
            }
        }
    }

    println!("\n🎉 Demo complete!");
}

async fn run_single_flow(flow_file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    // Load and validate the flow
    let flow = load_and_validate_flow(flow_file)?;

    println!("\n📋 Flow: {} ({})", flow.name, flow_file);
    println!("🧩 Flowlets: {}", flow.flowlets.len());
    for flowlet in &flow.flowlets {
        println!("   • {} ({}) x{}", flowlet.id, flowlet.class, flowlet.instances);
    }
    println!("🔗 Connections: {}", flow.connections.len());

    // Activate against a fresh in-memory queue admin
    let admin = Arc::new(MemoryQueueAdmin::new());
    let concurrency = default_concurrency();
    let coordinator = TopologyCoordinator::new(concurrency);
    println!("🔌 Queue Admin: {}", admin.name());
    println!("⚙️  Max Concurrency: {}", concurrency);

    let activation_start = Instant::now();
    let consumed = coordinator
        .configure_flow(&flow, admin.clone(), &CancellationToken::new())
        .await?;
    let activation_time = activation_start.elapsed();

    println!("\n📊 Activation Results:");
    println!("⏱️  Activation Time: {:?}", activation_time);
    println!("🔢 Queues Configured: {}", admin.queue_count().await);
    println!("\n🗺️  Queue Table:");
    println!("{}", render_queue_table(&admin).await?);

    // Rescale one consumer to show reconfiguration converging the queues
    if let Some((flowlet_id, queues)) = consumed.0.iter().next_back() {
        let current = flow.flowlet(flowlet_id).map(|f| f.instances).unwrap_or(1);
        let target = current * 2;

        println!("\n🔁 Rescaling '{}' from {} to {} instances...", flowlet_id, current, target);
        match flow.scale_flowlet(flowlet_id, target) {
            Ok(scaled) => {
                let group = consumer_group_id(&scaled.name, flowlet_id);
                ReconfigurationCoordinator::new(concurrency)
                    .reconfigure(queues, group, target, admin.clone())
                    .await?;

                println!("✅ Rescaled. Updated queue table:");
                println!("{}", render_queue_table(&admin).await?);
            }
            Err(e) => {
                println!("⚠️  Rescale rejected by the flow's declared caps: {}", e);
            }
        }
    }

    let total_time = start_time.elapsed();
    println!("\n⏱️  Total Time (including flow load): {:?}", total_time);

    Ok(())
}

/// Render the admin's queue table as pretty-printed JSON, one object per
/// queue keyed by consumer group id.
async fn render_queue_table(admin: &MemoryQueueAdmin) -> Result<String, serde_json::Error> {
    let mut table = serde_json::Map::new();
    for (queue, groups) in admin.snapshot().await {
        let mut entry = serde_json::Map::new();
        for (group, instances) in groups {
            entry.insert(group.to_string(), serde_json::Value::from(instances));
        }
        table.insert(queue.to_string(), serde_json::Value::Object(entry));
    }
    serde_json::to_string_pretty(&serde_json::Value::Object(table))
}
