//! Builds transactions and blocks against the session's output set
//!
//! Every registered transaction is announced once without block context;
//! every transaction of an accepted block is announced again with the block
//! and its position.

use super::ChainSampleConfig;
use crate::core::{
    Block, BlockBuilder, BlockError, BlockchainView, ChainIndex, NamedTransaction, NewOutput,
    OutputOwnership, OutputSet, OutputSetError, Spend, Transaction, TransactionBuilder,
    TransactionError,
};
use crate::crypto::Hash;
use crate::events::{ChainEventListener, EventDispatcher};
use chrono::Utc;
use thiserror::Error;

/// Errors returned by a fixture session
///
/// After an error the session's output set may already be partially
/// mutated; start a fresh session instead of continuing.
#[derive(Error, Debug, PartialEq)]
pub enum ChainSampleError {
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
    #[error("Block error: {0}")]
    Block(#[from] BlockError),
    #[error("Output set error: {0}")]
    OutputSet(#[from] OutputSetError),
}

/// One fixture chain session
#[derive(Debug)]
pub struct ChainSampleData {
    config: ChainSampleConfig,
    outputs: OutputSet,
    index: ChainIndex,
    dispatcher: EventDispatcher,
    /// Generation transactions built so far; feeds the unique marker
    generation_count: u64,
}

impl ChainSampleData {
    pub fn new(config: ChainSampleConfig) -> Self {
        let index = ChainIndex::new(config.genesis_height, config.genesis_hash);
        Self {
            config,
            outputs: OutputSet::new(),
            index,
            dispatcher: EventDispatcher::new(),
            generation_count: 0,
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn ChainEventListener>) {
        self.dispatcher.add_listener(listener);
    }

    pub fn config(&self) -> &ChainSampleConfig {
        &self.config
    }

    pub fn available_outputs(&self) -> &OutputSet {
        &self.outputs
    }

    pub fn chain(&self) -> &ChainIndex {
        &self.index
    }

    pub fn best_block_height(&self) -> u64 {
        self.index.best_block_height()
    }

    pub fn best_block_hash(&self) -> Hash {
        self.index.best_block_hash()
    }

    pub fn transaction(&self, hash: &Hash) -> Option<&Transaction> {
        self.index.transaction(hash)
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Spend `spends` in order and create `new_outputs` in order
    ///
    /// Outputs spent before a failing input stay spent.
    pub fn normal_transaction(
        &mut self,
        name: &str,
        spends: &[Spend],
        new_outputs: &[NewOutput],
    ) -> Result<NamedTransaction, ChainSampleError> {
        if spends.is_empty() {
            return Err(TransactionError::InvalidShape(format!(
                "ordinary transaction {} has no inputs",
                name
            ))
            .into());
        }

        let mut builder = TransactionBuilder::new();
        for spend in spends {
            builder = builder.add_input(&mut self.outputs, spend)?;
        }
        for output in new_outputs {
            builder = builder.add_output(output.amount, output.ownership.clone());
        }

        let named = NamedTransaction::new(name, builder.build()?);
        self.add_transaction(&named)?;
        Ok(named)
    }

    /// Mint the configured reward to `generated_by`
    pub fn generation_transaction(
        &mut self,
        name: &str,
        generated_by: OutputOwnership,
    ) -> Result<NamedTransaction, ChainSampleError> {
        self.generation_count += 1;
        let marker = format!("Random:{}.fixture chain generation", self.generation_count);

        let transaction = TransactionBuilder::new()
            .add_generation_input(marker.into_bytes())
            .add_output(self.config.reward_amount, generated_by)
            .build()?;

        let named = NamedTransaction::new(name, transaction);
        self.add_transaction(&named)?;
        Ok(named)
    }

    /// Make the outputs of `named` spendable, index it and announce it
    pub fn add_transaction(&mut self, named: &NamedTransaction) -> Result<(), ChainSampleError> {
        let tx = &named.transaction;
        let hash = tx.hash();

        self.outputs.add_transaction_outputs(tx)?;
        self.index.add_transaction(hash, tx.clone());
        self.dispatcher.notify(&self.index, &hash, tx, None, None);

        log::debug!("Transaction {} added: {}", named.name, hash);
        Ok(())
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Build a block on the current tip without accepting it
    pub fn build_block(&self, transactions: &[NamedTransaction]) -> Result<Block, BlockError> {
        self.build_block_on(self.index.best_block_hash(), transactions)
    }

    /// Build a block on `previous_hash`, stamped with the current time
    pub fn build_block_on(
        &self,
        previous_hash: Hash,
        transactions: &[NamedTransaction],
    ) -> Result<Block, BlockError> {
        let builder = transactions
            .iter()
            .fold(BlockBuilder::new(), |builder, named| {
                builder.add_transaction(named.transaction.clone())
            });
        let timestamp = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        builder.build(previous_hash, timestamp, self.config.block_version, 0, 0)
    }

    /// Accept `block` as the new tip and announce its transactions in order
    ///
    /// Fails without announcing anything unless the block extends the tip.
    pub fn accept_block(&mut self, block: Block) -> Result<u64, ChainSampleError> {
        let height = self.index.add_block(block)?;

        let index = &self.index;
        if let Some(chain_block) = index.block_at(height) {
            for (position, tx) in chain_block.block.transactions().iter().enumerate() {
                self.dispatcher
                    .notify(index, &tx.hash(), tx, Some(chain_block), Some(position));
            }
        }

        log::info!("Fixture chain advanced to height {}", height);
        Ok(height)
    }

    /// Build a block of `transactions` on the tip and accept it
    pub fn new_block(
        &mut self,
        transactions: &[NamedTransaction],
    ) -> Result<Block, ChainSampleError> {
        let block = self.build_block(transactions)?;
        self.accept_block(block.clone())?;
        Ok(block)
    }

    pub fn new_block_with(
        &mut self,
        transaction: &NamedTransaction,
    ) -> Result<Block, ChainSampleError> {
        self.new_block(std::slice::from_ref(transaction))
    }
}

impl Default for ChainSampleData {
    fn default() -> Self {
        Self::new(ChainSampleConfig::default())
    }
}
