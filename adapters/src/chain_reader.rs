use alloy::{providers::Provider, rpc::types::BlockNumberOrTag};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::error::ChainReaderError;

/// Header fields of a block that the adapters need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub timestamp: u64,
    pub number: u64,
}

/// Read access to the chain, injected into the adapters so they can be
/// driven by any RPC client.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn block_by_number(&self, number: u64) -> Result<BlockInfo, ChainReaderError>;
}

/// [`ChainReader`] backed by an alloy provider.
pub struct RpcChainReader<P> {
    provider: P,
}

impl<P: Provider> RpcChainReader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: Provider> ChainReader for RpcChainReader<P> {
    async fn block_by_number(&self, number: u64) -> Result<BlockInfo, ChainReaderError> {
        debug!("Fetching block {}", number);
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await?
            .ok_or(ChainReaderError::BlockNotFound(number))?;
        Ok(BlockInfo {
            timestamp: block.header.timestamp,
            number: block.header.number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::ProviderBuilder;
    use mockito::Matcher;
    use serde_json::json;

    const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

    fn block_json(number: u64, timestamp: u64) -> serde_json::Value {
        json!({
            "hash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "parentHash": ZERO_HASH,
            "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
            "miner": "0x0000000000000000000000000000000000000000",
            "stateRoot": ZERO_HASH,
            "transactionsRoot": ZERO_HASH,
            "receiptsRoot": ZERO_HASH,
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "difficulty": "0x0",
            "number": format!("{number:#x}"),
            "gasLimit": "0x1c9c380",
            "gasUsed": "0x0",
            "timestamp": format!("{timestamp:#x}"),
            "extraData": "0x",
            "mixHash": ZERO_HASH,
            "nonce": "0x0000000000000000",
            "baseFeePerGas": "0x7",
            "uncles": [],
            "transactions": []
        })
    }

    async fn mock_get_block(
        server: &mut mockito::ServerGuard,
        result: serde_json::Value,
    ) -> mockito::Mock {
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "method": "eth_getBlockByNumber"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "jsonrpc": "2.0", "id": 0, "result": result }).to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_block_fields_from_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = mock_get_block(&mut server, block_json(100, 1_700_000_000)).await;

        let provider = ProviderBuilder::new().connect_http(server.url().parse().unwrap());
        let reader = RpcChainReader::new(provider);

        let block = reader.block_by_number(100).await.unwrap();
        assert_eq!(
            block,
            BlockInfo {
                timestamp: 1_700_000_000,
                number: 100,
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_block_is_permanent() {
        let mut server = mockito::Server::new_async().await;
        let mock = mock_get_block(&mut server, serde_json::Value::Null).await;

        let provider = ProviderBuilder::new().connect_http(server.url().parse().unwrap());
        let reader = RpcChainReader::new(provider);

        let err = reader.block_by_number(100).await.unwrap_err();
        assert!(matches!(err, ChainReaderError::BlockNotFound(100)));
        assert!(!err.is_transient());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rpc_failure_is_transient() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let provider = ProviderBuilder::new().connect_http(server.url().parse().unwrap());
        let reader = RpcChainReader::new(provider);

        let err = reader.block_by_number(100).await.unwrap_err();
        assert!(matches!(err, ChainReaderError::Rpc(_)));
        assert!(err.is_transient());
        mock.assert_async().await;
    }
}
