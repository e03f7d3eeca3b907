use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Participant that became eligible at the given block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Whitelist {
    pub user: Address,
    /// Unix timestamp of the block, in seconds.
    pub time: u64,
    pub block_number: u64,
}
