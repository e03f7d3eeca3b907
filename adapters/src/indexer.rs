use alloy::{
    primitives::{Address, ChainId, B256},
    rpc::types::Log,
    sol_types::SolEvent,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{chain_reader::ChainReader, error::IndexError, whitelist::Whitelist};

/// Common interface of every project adapter.
///
/// The orchestrator scopes log retrieval to [`LogIndexer::addresses`] and
/// hands each fetched batch to [`LogIndexer::index_logs`].
#[async_trait]
pub trait LogIndexer: Send + Sync {
    fn addresses(&self) -> &[Address];

    /// Converts the relevant logs of a batch into whitelist records, in input order.
    /// The first failure aborts the batch and no records are returned.
    async fn index_logs(
        &self,
        cancel_token: &CancellationToken,
        chain_id: ChainId,
        chain_reader: &dyn ChainReader,
        logs: &[Log],
    ) -> Result<Vec<Whitelist>, IndexError>;
}

/// An event an adapter understands, with the topic carrying the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedEvent {
    pub signature: &'static str,
    pub signature_hash: B256,
    pub owner_topic: usize,
}

impl TrackedEvent {
    pub fn of<E: SolEvent>(owner_topic: usize) -> Self {
        Self {
            signature: E::SIGNATURE,
            signature_hash: E::SIGNATURE_HASH,
            owner_topic,
        }
    }
}

/// Fixed set of events matched by raw hash equality on topic 0.
#[derive(Debug, Clone)]
pub struct EventSignatureSet {
    events: Vec<TrackedEvent>,
}

impl EventSignatureSet {
    pub fn new(events: Vec<TrackedEvent>) -> Self {
        Self { events }
    }

    pub fn find(&self, signature_hash: &B256) -> Option<&TrackedEvent> {
        self.events
            .iter()
            .find(|event| event.signature_hash == *signature_hash)
    }
}
