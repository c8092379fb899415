//! Ledger Fixture: a deterministic synthetic chain for exercising ledger engines
//!
//! This crate builds a self-consistent miniature blockchain in memory:
//! - UTXO-style transactions spending a tracked output set
//! - Reward (generation) transactions with unique marker inputs
//! - Blocks chained onto a monotonically advancing tip
//! - Synchronous new-transaction notifications to registered listeners
//! - Generated fixture accounts and a network-scoped address fixture file
//!
//! # Example
//!
//! ```rust
//! use ledger_fixture::core::{NewOutput, OutputOwnership, Spend};
//! use ledger_fixture::events::EventRecorder;
//! use ledger_fixture::sample::ChainSampleData;
//!
//! let recorder = EventRecorder::new();
//! let mut chain = ChainSampleData::default();
//! chain.add_listener(Box::new(recorder.clone()));
//!
//! let reward = chain
//!     .generation_transaction("reward", OutputOwnership::address("alice"))
//!     .unwrap();
//! chain.new_block_with(&reward).unwrap();
//!
//! let funding = reward.output(0).unwrap();
//! let payment = chain
//!     .normal_transaction(
//!         "payment",
//!         &[Spend::from(&funding)],
//!         &[NewOutput::new(50, OutputOwnership::address("bob"))],
//!     )
//!     .unwrap();
//! chain.new_block_with(&payment).unwrap();
//!
//! assert_eq!(chain.best_block_height(), 2);
//! assert_eq!(recorder.block_events().len(), 2);
//! ```

pub mod address;
pub mod core;
pub mod crypto;
pub mod events;
pub mod fixture;
pub mod sample;

// Re-export commonly used types
pub use address::{AddressData, AddressDataProvider, AddressDelegate, KeyPairAddressProvider};
pub use crate::core::{
    equivalent, Block, BlockchainView, ChainBlock, ChainIndex, NamedTransaction, NewOutput,
    OutPoint, OutputOwnership, OutputSet, Spend, Transaction,
};
pub use crypto::Hash;
pub use events::{ChainEventListener, EventDispatcher, EventRecorder};
pub use fixture::{AddressFixtures, FixtureConfig, FixtureError};
pub use sample::{ChainSampleConfig, ChainSampleData, ChainSampleError, BLOCK_REWARD};
