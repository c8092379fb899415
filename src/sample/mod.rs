//! Fixture chain session
//!
//! [`ChainSampleData`] owns the output set, the chain index and the event
//! dispatcher of one test session and is the only way to mutate them.

pub mod chain_sample;

pub use chain_sample::{ChainSampleData, ChainSampleError};

use crate::core::{DEFAULT_BLOCK_VERSION, GENESIS_HEIGHT};
use crate::crypto::Hash;

/// Amount minted by a generation transaction
pub const BLOCK_REWARD: u64 = 50;

/// Session parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSampleConfig {
    /// Version stamped into every block header
    pub block_version: u32,
    pub reward_amount: u64,
    pub genesis_height: u64,
    /// Previous hash of the first accepted block
    pub genesis_hash: Hash,
}

impl Default for ChainSampleConfig {
    fn default() -> Self {
        Self {
            block_version: DEFAULT_BLOCK_VERSION,
            reward_amount: BLOCK_REWARD,
            genesis_height: GENESIS_HEIGHT,
            genesis_hash: Hash::zero(),
        }
    }
}
