use alloy::{
    primitives::{address, Address, ChainId, B256},
    rpc::types::Log,
    sol,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    chain_reader::ChainReader,
    error::IndexError,
    indexer::{EventSignatureSet, LogIndexer, TrackedEvent},
    whitelist::Whitelist,
};

sol! {
    event MintedDomain(string name, uint256 indexed tokenId, address indexed owner, uint256 expires);

    event NameRegistered(
        uint256 indexed tokenId,
        string name,
        bytes32 label,
        address indexed owner,
        uint256 cost,
        uint256 expires
    );

    event ProfileCreated(
        uint256 indexed profileId,
        address indexed owner,
        address creator,
        string handle,
        string imageURI,
        address followModule,
        bytes followModuleReturnData,
        string followNFTURI,
        uint256 timestamp
    );
}

/// Domain registrar, name registry and profile hub of the .taiko name service.
pub const DOT_TAIKO_ADDRESSES: [Address; 3] = [
    address!("0xD7b837A0E388B4c25200983bdAa3EF3A83ca86b7"),
    address!("0xFb2Cd41a8aeC89EFBb19575C6c48d872cE97A0A5"),
    address!("0x01412AAba531Cc6ef630CE5059120999f824CDAF"),
];

// All three events index exactly two parameters, the id first and the owner second
const OWNER_TOPIC: usize = 2;

/// Whitelists every account that minted a .taiko domain, registered a name
/// or created a profile.
pub struct DotTaikoIndexer {
    target_addresses: Vec<Address>,
    events: EventSignatureSet,
}

impl Default for DotTaikoIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl DotTaikoIndexer {
    pub fn new() -> Self {
        Self::with_addresses(DOT_TAIKO_ADDRESSES.to_vec())
    }

    pub fn with_addresses(target_addresses: Vec<Address>) -> Self {
        Self {
            target_addresses,
            events: EventSignatureSet::new(vec![
                TrackedEvent::of::<MintedDomain>(OWNER_TOPIC),
                TrackedEvent::of::<NameRegistered>(OWNER_TOPIC),
                TrackedEvent::of::<ProfileCreated>(OWNER_TOPIC),
            ]),
        }
    }

    /// Event matching the signature topic of a log, if this adapter tracks it.
    pub fn classify(&self, topic: &B256) -> Option<&TrackedEvent> {
        self.events.find(topic)
    }

    pub fn is_relevant_log(&self, topic: &B256) -> bool {
        self.classify(topic).is_some()
    }

    /// Builds the record for a log already matched to `event`.
    pub async fn process_log(
        &self,
        cancel_token: &CancellationToken,
        chain_reader: &dyn ChainReader,
        event: &TrackedEvent,
        log: &Log,
    ) -> Result<Whitelist, IndexError> {
        let topics = log.topics();
        let owner_topic = topics
            .get(event.owner_topic)
            .ok_or(IndexError::MalformedTopics {
                block_number: log.block_number,
                signature: event.signature_hash,
                expected: event.owner_topic.saturating_add(1),
                found: topics.len(),
            })?;
        let user = Address::from_word(*owner_topic);

        let block_number = log.block_number.ok_or(IndexError::MissingBlockNumber {
            signature: event.signature_hash,
        })?;

        let block = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => return Err(IndexError::Cancelled),
            result = chain_reader.block_by_number(block_number) => {
                result.map_err(|source| IndexError::BlockLookup { block_number, source })?
            }
        };

        debug!(
            "{} by {} in block {} at {}",
            event.signature, user, block.number, block.timestamp
        );

        Ok(Whitelist {
            user,
            time: block.timestamp,
            block_number: block.number,
        })
    }
}

#[async_trait]
impl LogIndexer for DotTaikoIndexer {
    fn addresses(&self) -> &[Address] {
        &self.target_addresses
    }

    async fn index_logs(
        &self,
        cancel_token: &CancellationToken,
        chain_id: ChainId,
        chain_reader: &dyn ChainReader,
        logs: &[Log],
    ) -> Result<Vec<Whitelist>, IndexError> {
        let mut result = Vec::new();
        for log in logs {
            let Some(event) = log.topics().first().and_then(|topic| self.classify(topic)) else {
                continue;
            };
            result.push(
                self.process_log(cancel_token, chain_reader, event, log)
                    .await?,
            );
        }
        info!(
            "DotTaiko: {} of {} logs whitelisted on chain {}",
            result.len(),
            logs.len(),
            chain_id
        );
        Ok(result)
    }
}
