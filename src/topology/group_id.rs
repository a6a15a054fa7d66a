use sha2::{Digest, Sha256};
use std::fmt;

/// Stable 64-bit identity of a consumer group.
///
/// Every instance of a flowlet consuming a queue shares one group id, and
/// the id is derived rather than allocated: any coordinator computes the
/// same id for the same (flow, flowlet) pair, across processes and
/// restarts. That stability is what keeps a queue's consumer state attached
/// to the right flowlet through scaling and redeployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsumerGroupId(pub u64);

impl fmt::Display for ConsumerGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive the consumer group id for a flowlet within a flow.
///
/// The id is the first eight bytes of a SHA-256 digest over the flow id and
/// flowlet id, read little-endian. The flow id is length-prefixed so the
/// pair boundaries are unambiguous in the digest input. Callers must treat
/// the value as opaque; the bit pattern is not part of any contract.
pub fn consumer_group_id(flow_id: &str, flowlet_id: &str) -> ConsumerGroupId {
    let mut hasher = Sha256::new();
    hasher.update((flow_id.len() as u64).to_le_bytes());
    hasher.update(flow_id.as_bytes());
    hasher.update(flowlet_id.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    ConsumerGroupId(u64::from_le_bytes(bytes))
}
