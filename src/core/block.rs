//! Blocks for the fixture chain
//!
//! A block contains a header referencing the previous block and an ordered
//! list of transactions. Its id is the double SHA-256 of the header.

use crate::core::transaction::Transaction;
use crate::crypto::{merkle_root, Hash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Block version stamped when none is configured
pub const DEFAULT_BLOCK_VERSION: u32 = 4;

/// Block assembly errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("Cannot build a block without transactions")]
    EmptyBlock,
    #[error("Block does not extend the tip: expected previous {expected}, found {found}")]
    NotOnTip { expected: Hash, found: Hash },
    #[error("Block height overflows past {0}")]
    HeightOverflow(u64),
}

/// Block header containing metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u32,
    pub previous_hash: Hash,
    /// Merkle root of all transaction ids
    pub merkle_root: Hash,
    /// Unix timestamp in seconds
    pub timestamp: u64,
    pub target: u32,
    pub nonce: u64,
}

impl BlockHeader {
    /// Calculate the hash of the block header
    pub fn hash(&self) -> Hash {
        let data = format!(
            "{}{}{}{}{}{}",
            self.version,
            self.previous_hash,
            self.merkle_root,
            self.timestamp,
            self.target,
            self.nonce
        );
        Hash::digest(data.as_bytes())
    }
}

/// An immutable block
///
/// Deserialization recomputes the cached hash from the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    header: BlockHeader,
    /// Block hash (cached)
    hash: Hash,
    transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(header: BlockHeader, transactions: Vec<Transaction>) -> Self {
        let hash = header.hash();
        Self {
            header,
            hash,
            transactions,
        }
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Verify the header's merkle root against the transactions
    pub fn verify_merkle_root(&self) -> bool {
        Self::calculate_merkle_root(&self.transactions) == self.header.merkle_root
    }

    fn calculate_merkle_root(transactions: &[Transaction]) -> Hash {
        let ids: Vec<Hash> = transactions.iter().map(|tx| tx.hash()).collect();
        merkle_root(&ids)
    }
}

/// Serialized form of a [`Block`] without its cached hash
#[derive(Deserialize)]
struct RawBlock {
    header: BlockHeader,
    transactions: Vec<Transaction>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block::new(raw.header, raw.transactions)
    }
}

/// Accumulates transactions and builds a block on top of a given hash
#[derive(Debug, Default)]
pub struct BlockBuilder {
    transactions: Vec<Transaction>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    pub fn build(
        self,
        previous_hash: Hash,
        timestamp: u64,
        version: u32,
        target: u32,
        nonce: u64,
    ) -> Result<Block, BlockError> {
        if self.transactions.is_empty() {
            return Err(BlockError::EmptyBlock);
        }

        let header = BlockHeader {
            version,
            previous_hash,
            merkle_root: Block::calculate_merkle_root(&self.transactions),
            timestamp,
            target,
            nonce,
        };

        Ok(Block::new(header, self.transactions))
    }
}
