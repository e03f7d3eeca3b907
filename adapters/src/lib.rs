// Log adapters that turn contract events into whitelist records
pub mod chain_reader;
pub mod error;
pub mod indexer;
pub mod projects;
pub mod whitelist;

pub use chain_reader::{BlockInfo, ChainReader, RpcChainReader};
pub use error::{ChainReaderError, IndexError};
pub use indexer::LogIndexer;
pub use whitelist::Whitelist;
