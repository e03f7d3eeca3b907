use alloy::{
    primitives::{Address, ChainId},
    providers::Provider,
    rpc::types::Filter,
};
use anyhow::Error;
use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    sync::Arc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use trailblazer_adapters::{IndexError, LogIndexer, RpcChainReader, Whitelist};

use crate::{config::Config, retry::backoff_retry_with_timeout};

/// Scans a block range with one adapter and appends its records to the output file.
pub struct Runner<P> {
    reader: RpcChainReader<P>,
    indexer: Arc<dyn LogIndexer>,
    config: Config,
    cancel_token: CancellationToken,
}

impl<P: Provider> Runner<P> {
    pub fn new(
        provider: P,
        indexer: Arc<dyn LogIndexer>,
        config: Config,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            reader: RpcChainReader::new(provider),
            indexer,
            config,
            cancel_token,
        }
    }

    /// Returns the number of records written.
    pub async fn run(&self) -> Result<usize, Error> {
        let provider = self.reader.provider();
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get chain id: {e}"))?;
        let end_block = match self.config.end_block {
            Some(end_block) => end_block,
            None => provider
                .get_block_number()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to get latest block number: {e}"))?,
        };
        info!(
            "Indexing blocks {}..={} on chain {} into {}",
            self.config.start_block, end_block, chain_id, self.config.output_file
        );

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_file)
            .map_err(|e| {
                anyhow::anyhow!("Failed to open output file {}: {e}", self.config.output_file)
            })?;
        let mut output = BufWriter::new(file);

        let mut total = 0usize;
        for (from_block, to_block) in
            block_ranges(self.config.start_block, end_block, self.config.block_step)
        {
            let result = backoff_retry_with_timeout(
                move || self.index_range(chain_id, from_block, to_block),
                is_transient,
                self.config.retry_base_delay,
                self.config.retry_max_delay,
                self.config.retry_timeout,
            )
            .await;

            let records = match result {
                Ok(records) => records,
                Err(e) if is_cancelled(&e) => {
                    warn!(
                        "Cancelled, blocks from {} onwards were not indexed",
                        from_block
                    );
                    break;
                }
                Err(e) => {
                    return Err(e.context(format!(
                        "Failed to index blocks {from_block}..={to_block}"
                    )))
                }
            };

            write_records(&mut output, &records)?;
            total = total.saturating_add(records.len());
            debug!(
                "Blocks {}..={}: {} records, {} total",
                from_block,
                to_block,
                records.len(),
                total
            );
        }

        info!("Indexing finished, {} records written", total);
        Ok(total)
    }

    async fn index_range(
        &self,
        chain_id: ChainId,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Whitelist>, Error> {
        let filter = logs_filter(self.indexer.addresses(), from_block, to_block);

        let logs = tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => return Err(IndexError::Cancelled.into()),
            logs = self.reader.provider().get_logs(&filter) => logs?,
        };

        Ok(self
            .indexer
            .index_logs(&self.cancel_token, chain_id, &self.reader, &logs)
            .await?)
    }
}

fn logs_filter(addresses: &[Address], from_block: u64, to_block: u64) -> Filter {
    Filter::new()
        .address(addresses.to_vec())
        .from_block(from_block)
        .to_block(to_block)
}

/// Splits `start..=end` into consecutive inclusive ranges of at most `step` blocks.
pub fn block_ranges(start: u64, end: u64, step: u64) -> Vec<(u64, u64)> {
    let mut ranges = Vec::new();
    if step == 0 {
        return ranges;
    }
    let mut from_block = start;
    while from_block <= end {
        let to_block = from_block.saturating_add(step.saturating_sub(1)).min(end);
        ranges.push((from_block, to_block));
        match to_block.checked_add(1) {
            Some(next) => from_block = next,
            None => break,
        }
    }
    ranges
}

// Log fetch failures carry no IndexError and count as transient
fn is_transient(err: &Error) -> bool {
    err.downcast_ref::<IndexError>()
        .map_or(true, IndexError::is_transient)
}

fn is_cancelled(err: &Error) -> bool {
    matches!(err.downcast_ref::<IndexError>(), Some(IndexError::Cancelled))
}

fn write_records(output: &mut impl Write, records: &[Whitelist]) -> Result<(), Error> {
    for record in records {
        serde_json::to_writer(&mut *output, record)?;
        output.write_all(b"\n")?;
    }
    output.flush()?;
    Ok(())
}
