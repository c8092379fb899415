//! Cryptographic utilities for the fixture chain
//!
//! This module provides:
//! - SHA-256 hashing and the [`Hash`] identifier
//! - Merkle root calculation
//! - secp256k1 key pairs with coin/asset address derivation

pub mod hash;
pub mod keys;
pub mod merkle;

pub use hash::{double_sha256, hash160, sha256, Hash};
pub use keys::{
    asset_address, asset_id, base58check, coin_address, p2pkh_script, KeyError, KeyPair,
    ASSET_ADDRESS_NAMESPACE, ASSET_ID_VERSION, MAINNET_ADDRESS_VERSION, TESTNET_ADDRESS_VERSION,
};
pub use merkle::merkle_root;
