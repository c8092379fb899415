//! Core fixture chain components
//!
//! This module contains the fundamental building blocks:
//! - Transactions (UTXO model, generation inputs, builder)
//! - Output set of spendable outputs
//! - Blocks and the block builder
//! - Chain index (best tip, transaction lookup)
//! - Structural transaction equivalence

pub mod block;
pub mod chain_index;
pub mod equivalence;
pub mod output_set;
pub mod transaction;

pub use block::{Block, BlockBuilder, BlockError, BlockHeader, DEFAULT_BLOCK_VERSION};
pub use chain_index::{BlockchainView, ChainBlock, ChainIndex, GENESIS_HEIGHT};
pub use equivalence::equivalent;
pub use output_set::{OutputSet, OutputSetError};
pub use transaction::{
    NamedTransaction, NewOutput, OutPoint, OutputOwnership, OutputWithOutPoint, Spend,
    Transaction, TransactionBuilder, TransactionError, TransactionInput, TransactionOutput,
    GENERATION_OUTPUT_INDEX, SEQUENCE_FINAL, TX_VERSION,
};
