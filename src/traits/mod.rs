pub mod queue_admin;

pub use queue_admin::{GroupCounts, QueueAdmin};
