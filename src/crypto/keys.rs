//! Key and address derivation for fixture accounts
//!
//! Key pairs use the secp256k1 curve. Coin addresses are Base58Check
//! encodings of a pubkey hash; asset addresses and asset ids follow the
//! Open Assets conventions (namespace byte 0x13, asset id version 0x17).

use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::hash::{hash160, sha256};

/// Version byte of a mainnet pay-to-pubkey-hash address
pub const MAINNET_ADDRESS_VERSION: u8 = 0x00;

/// Version byte of a testnet pay-to-pubkey-hash address
pub const TESTNET_ADDRESS_VERSION: u8 = 0x6f;

/// Open Assets namespace byte prepended to a coin address
pub const ASSET_ADDRESS_NAMESPACE: u8 = 0x13;

/// Open Assets asset id version byte
pub const ASSET_ID_VERSION: u8 = 0x17;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key = SecretKey::from_slice(&bytes)?;
        Ok(Self::from_secret_key(secret_key))
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Compressed public key, hex encoded
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    pub fn public_key_hash(&self) -> [u8; 20] {
        hash160(&self.public_key.serialize())
    }

    /// Base58Check coin address for the given address version byte
    pub fn address(&self, version: u8) -> String {
        coin_address(version, &self.public_key_hash())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// Base58Check: payload followed by the first four bytes of its double SHA-256
pub fn base58check(payload: &[u8]) -> String {
    let checksum = sha256(&sha256(payload));
    let mut bytes = payload.to_vec();
    bytes.extend_from_slice(&checksum[..4]);
    bs58::encode(bytes).into_string()
}

pub fn coin_address(version: u8, public_key_hash: &[u8; 20]) -> String {
    let mut payload = vec![version];
    payload.extend_from_slice(public_key_hash);
    base58check(&payload)
}

/// Pay-to-pubkey-hash locking script for a pubkey hash
pub fn p2pkh_script(public_key_hash: &[u8; 20]) -> Vec<u8> {
    // OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    let mut script = vec![0x76, 0xa9, 0x14];
    script.extend_from_slice(public_key_hash);
    script.extend_from_slice(&[0x88, 0xac]);
    script
}

/// Open Assets address: namespace byte, address version, pubkey hash
pub fn asset_address(version: u8, public_key_hash: &[u8; 20]) -> String {
    let mut payload = vec![ASSET_ADDRESS_NAMESPACE, version];
    payload.extend_from_slice(public_key_hash);
    base58check(&payload)
}

/// Open Assets asset id derived from the issuing locking script
pub fn asset_id(locking_script: &[u8]) -> String {
    let mut payload = vec![ASSET_ID_VERSION];
    payload.extend_from_slice(&hash160(locking_script));
    base58check(&payload)
}
