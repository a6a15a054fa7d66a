// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod generator;
mod group_id;
mod names;

pub use generator::{generate_queue_specs, QueueSpecTable, QueueSpecification};
pub use group_id::{consumer_group_id, ConsumerGroupId};
pub use names::QueueName;
