//! Address provisioning interface
//!
//! Accounts own addresses with keys; watch-only addresses are tracked per
//! account without keys. Address data can be looked up by coin address,
//! asset address or asset id.

use crate::core::OutputOwnership;
use crate::crypto::KeyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address provisioning errors
#[derive(Error, Debug)]
pub enum AddressError {
    #[error("Unknown account: {0}")]
    UnknownAccount(String),
    #[error("Unknown address, asset address or asset id: {0}")]
    UnknownAddress(String),
    #[error("Account has no receiving address: {0}")]
    NoReceivingAddress(String),
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
}

/// Keys and identifiers of a single address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressData {
    /// Hex private key; absent for watch-only addresses
    pub private_key: Option<String>,
    pub public_key: String,
    pub public_key_hash: String,
    pub address: String,
    pub asset_address: String,
    pub asset_id: String,
    pub locking_script: Vec<u8>,
}

impl AddressData {
    /// Ownership descriptor for outputs paid to this address
    pub fn ownership(&self) -> OutputOwnership {
        OutputOwnership::Address(self.address.clone())
    }

    /// Copy of this address without its private key
    pub fn watch_only(&self) -> Self {
        Self {
            private_key: None,
            ..self.clone()
        }
    }

    pub fn is_watch_only(&self) -> bool {
        self.private_key.is_none()
    }
}

/// Notified whenever a provider generates an address
pub trait AddressGenerationListener {
    fn on_address_generation(&mut self, account: &str, address: &str, private_key: Option<&str>);
}

/// Source of fixture accounts, addresses and keys
pub trait AddressDataProvider {
    /// Account reserved for the fixture itself
    fn internal_account(&self) -> &str;

    fn internal_address_data(&self) -> &AddressData;

    /// User accounts, excluding the internal account
    fn accounts(&self) -> Vec<String>;

    fn addresses_of(&self, account: &str) -> Result<&[AddressData], AddressError>;

    fn watch_only_addresses_of(&self, account: &str) -> Result<&[AddressData], AddressError>;

    fn receiving_address_of(&self, account: &str) -> Result<&AddressData, AddressError>;

    fn private_keys_of(&self, account: &str) -> Result<Vec<String>, AddressError>;

    /// Look up by coin address, asset address or asset id
    fn address_data_of(&self, key: &str) -> Result<&AddressData, AddressError>;

    fn add_listener(&mut self, listener: Box<dyn AddressGenerationListener>);
}

impl<P: AddressDataProvider + ?Sized> AddressDataProvider for &mut P {
    fn internal_account(&self) -> &str {
        (**self).internal_account()
    }

    fn internal_address_data(&self) -> &AddressData {
        (**self).internal_address_data()
    }

    fn accounts(&self) -> Vec<String> {
        (**self).accounts()
    }

    fn addresses_of(&self, account: &str) -> Result<&[AddressData], AddressError> {
        (**self).addresses_of(account)
    }

    fn watch_only_addresses_of(&self, account: &str) -> Result<&[AddressData], AddressError> {
        (**self).watch_only_addresses_of(account)
    }

    fn receiving_address_of(&self, account: &str) -> Result<&AddressData, AddressError> {
        (**self).receiving_address_of(account)
    }

    fn private_keys_of(&self, account: &str) -> Result<Vec<String>, AddressError> {
        (**self).private_keys_of(account)
    }

    fn address_data_of(&self, key: &str) -> Result<&AddressData, AddressError> {
        (**self).address_data_of(key)
    }

    fn add_listener(&mut self, listener: Box<dyn AddressGenerationListener>) {
        (**self).add_listener(listener);
    }
}
