use anyhow::Error;
use std::time::Duration;
use tracing::warn;

pub struct Config {
    pub rpc_url: String,
    pub start_block: u64,
    /// Latest block of the chain when not set.
    pub end_block: Option<u64>,
    pub block_step: u64,
    pub output_file: String,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
    pub retry_timeout: Duration,
}

impl Config {
    pub fn read_env_variables() -> Result<Self, Error> {
        // Load environment variables from .env file
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        const RPC_URL: &str = "RPC_URL";
        let rpc_url = lookup(RPC_URL).unwrap_or_else(|| {
            warn!("No RPC URL found in {} env var, using default", RPC_URL);
            "http://localhost:8545".to_string()
        });

        let start_block = parse_u64(&lookup, "START_BLOCK")?.unwrap_or(0);
        let end_block = parse_u64(&lookup, "END_BLOCK")?;
        if let Some(end_block) = end_block {
            if end_block < start_block {
                return Err(anyhow::anyhow!(
                    "END_BLOCK ({end_block}) must not be lower than START_BLOCK ({start_block})"
                ));
            }
        }

        let block_step = parse_u64(&lookup, "BLOCK_STEP")?.unwrap_or(1000);
        if block_step == 0 {
            return Err(anyhow::anyhow!("BLOCK_STEP must be a positive number"));
        }

        let output_file = lookup("OUTPUT_FILE").unwrap_or_else(|| "whitelist.jsonl".to_string());

        let retry_base_delay =
            Duration::from_millis(parse_u64(&lookup, "RETRY_BASE_DELAY_MS")?.unwrap_or(500));
        let retry_max_delay =
            Duration::from_millis(parse_u64(&lookup, "RETRY_MAX_DELAY_MS")?.unwrap_or(10_000));
        let retry_timeout =
            Duration::from_secs(parse_u64(&lookup, "RETRY_TIMEOUT_SEC")?.unwrap_or(60));

        Ok(Self {
            rpc_url,
            start_block,
            end_block,
            block_step,
            output_file,
            retry_base_delay,
            retry_max_delay,
            retry_timeout,
        })
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>, Error> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("{key} must be a number, got {value:?}: {e}"))
        })
        .transpose()
}
