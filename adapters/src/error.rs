use alloy::{primitives::B256, transports::TransportError};
use thiserror::Error;

/// Failure reported by a [`crate::ChainReader`] implementation.
#[derive(Debug, Error)]
pub enum ChainReaderError {
    #[error("RPC request failed: {0}")]
    Rpc(#[from] TransportError),
    #[error("Block {0} not found")]
    BlockNotFound(u64),
}

impl ChainReaderError {
    /// Network failures may succeed on a later attempt, a missing block will not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to get block by number ({block_number}): {source}")]
    BlockLookup {
        block_number: u64,
        #[source]
        source: ChainReaderError,
    },
    #[error(
        "Log with signature {signature} in block {block_number:?} has {found} topics, expected at least {expected}"
    )]
    MalformedTopics {
        block_number: Option<u64>,
        signature: B256,
        expected: usize,
        found: usize,
    },
    #[error("Log with signature {signature} has no block number")]
    MissingBlockNumber { signature: B256 },
    #[error("Indexing cancelled")]
    Cancelled,
}

impl IndexError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::BlockLookup { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}
