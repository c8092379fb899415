//! Chain index: best block tip and transaction lookup
//!
//! Tracks the best block hash/height and every registered transaction. The
//! height of an accepted block is always derived from the current tip.

use crate::core::block::{Block, BlockError};
use crate::core::transaction::Transaction;
use crate::crypto::Hash;
use std::collections::HashMap;

/// Height of the tip before any block has been accepted
pub const GENESIS_HEIGHT: u64 = 0;

/// A block paired with the height it was accepted at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBlock {
    pub height: u64,
    pub block: Block,
}

/// Read access to the ledger state
pub trait BlockchainView {
    fn best_block_hash(&self) -> Hash;

    fn best_block_height(&self) -> u64;

    fn transaction(&self, hash: &Hash) -> Option<&Transaction>;

    fn block_by_hash(&self, hash: &Hash) -> Option<&ChainBlock>;

    fn block_at(&self, height: u64) -> Option<&ChainBlock>;
}

/// In-memory record of accepted blocks and known transactions
#[derive(Debug, Clone)]
pub struct ChainIndex {
    genesis_height: u64,
    best_block_hash: Hash,
    best_block_height: u64,
    transactions: HashMap<Hash, Transaction>,
    /// Accepted blocks in height order
    blocks: Vec<ChainBlock>,
    by_hash: HashMap<Hash, usize>,
}

impl ChainIndex {
    pub fn new(genesis_height: u64, genesis_hash: Hash) -> Self {
        Self {
            genesis_height,
            best_block_hash: genesis_hash,
            best_block_height: genesis_height,
            transactions: HashMap::new(),
            blocks: Vec::new(),
            by_hash: HashMap::new(),
        }
    }

    pub fn add_transaction(&mut self, hash: Hash, transaction: Transaction) {
        self.transactions.insert(hash, transaction);
    }

    /// Accept `block` on top of the current tip and return its height
    ///
    /// The block must name the current best hash as its previous hash.
    pub fn add_block(&mut self, block: Block) -> Result<u64, BlockError> {
        let previous = block.header().previous_hash;
        if previous != self.best_block_hash {
            return Err(BlockError::NotOnTip {
                expected: self.best_block_hash,
                found: previous,
            });
        }
        let height = self
            .best_block_height
            .checked_add(1)
            .ok_or(BlockError::HeightOverflow(self.best_block_height))?;
        let hash = block.hash();

        for tx in block.transactions() {
            self.transactions.insert(tx.hash(), tx.clone());
        }

        self.best_block_hash = hash;
        self.best_block_height = height;
        self.by_hash.insert(hash, self.blocks.len());
        self.blocks.push(ChainBlock { height, block });

        log::debug!("Block {} accepted at height {}", hash, height);
        Ok(height)
    }

    pub fn genesis_height(&self) -> u64 {
        self.genesis_height
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn best_block(&self) -> Option<&ChainBlock> {
        self.blocks.last()
    }
}

impl Default for ChainIndex {
    fn default() -> Self {
        Self::new(GENESIS_HEIGHT, Hash::zero())
    }
}

impl BlockchainView for ChainIndex {
    fn best_block_hash(&self) -> Hash {
        self.best_block_hash
    }

    fn best_block_height(&self) -> u64 {
        self.best_block_height
    }

    fn transaction(&self, hash: &Hash) -> Option<&Transaction> {
        self.transactions.get(hash)
    }

    fn block_by_hash(&self, hash: &Hash) -> Option<&ChainBlock> {
        self.by_hash.get(hash).and_then(|i| self.blocks.get(*i))
    }

    fn block_at(&self, height: u64) -> Option<&ChainBlock> {
        let offset = height.checked_sub(self.genesis_height.checked_add(1)?)?;
        self.blocks.get(usize::try_from(offset).ok()?)
    }
}
