//! Address provider backed by freshly generated secp256k1 key pairs

use super::provider::{AddressData, AddressDataProvider, AddressError, AddressGenerationListener};
use crate::crypto::{asset_address, asset_id, p2pkh_script, KeyPair, TESTNET_ADDRESS_VERSION};
use std::collections::HashMap;

/// Account reserved for the fixture itself
pub const INTERNAL_ACCOUNT: &str = "_FOR_TEST_ONLY";

pub const DEFAULT_ACCOUNTS: [&str; 3] = ["IMPORTER", "SENDER", "RECEIVER"];

pub const DEFAULT_ADDRESSES_PER_ACCOUNT: usize = 2;

/// Which accounts to create up front and how to encode their addresses
#[derive(Debug, Clone)]
pub struct AddressProviderConfig {
    pub address_version: u8,
    pub accounts: Vec<String>,
    pub addresses_per_account: usize,
}

impl Default for AddressProviderConfig {
    fn default() -> Self {
        Self {
            address_version: TESTNET_ADDRESS_VERSION,
            accounts: DEFAULT_ACCOUNTS.iter().map(|a| a.to_string()).collect(),
            addresses_per_account: DEFAULT_ADDRESSES_PER_ACCOUNT,
        }
    }
}

/// Derive every identifier of an address from its key pair
pub fn address_data(key_pair: &KeyPair, address_version: u8) -> AddressData {
    let public_key_hash = key_pair.public_key_hash();
    let locking_script = p2pkh_script(&public_key_hash);
    AddressData {
        private_key: Some(key_pair.private_key_hex()),
        public_key: key_pair.public_key_hex(),
        public_key_hash: hex::encode(public_key_hash),
        address: key_pair.address(address_version),
        asset_address: asset_address(address_version, &public_key_hash),
        asset_id: asset_id(&locking_script),
        locking_script,
    }
}

/// In-memory accounts with generated keys
pub struct KeyPairAddressProvider {
    address_version: u8,
    internal: AddressData,
    accounts: Vec<String>,
    owned: HashMap<String, Vec<AddressData>>,
    watch_only: HashMap<String, Vec<AddressData>>,
    /// Address data by coin address, asset address and asset id
    lookup: HashMap<String, AddressData>,
    listeners: Vec<Box<dyn AddressGenerationListener>>,
}

impl KeyPairAddressProvider {
    pub fn new(config: AddressProviderConfig) -> Self {
        let internal = address_data(&KeyPair::generate(), config.address_version);
        let mut provider = Self {
            address_version: config.address_version,
            internal: internal.clone(),
            accounts: Vec::new(),
            owned: HashMap::new(),
            watch_only: HashMap::new(),
            lookup: HashMap::new(),
            listeners: Vec::new(),
        };
        provider.index(&internal);
        provider
            .owned
            .insert(INTERNAL_ACCOUNT.to_string(), vec![internal]);

        for account in &config.accounts {
            provider.ensure_account(account);
            for _ in 0..config.addresses_per_account {
                provider.generate_address(account);
            }
        }
        log::debug!(
            "Generated {} fixture accounts with {} addresses each",
            config.accounts.len(),
            config.addresses_per_account
        );
        provider
    }

    /// Generate a new address for `account`; it becomes the receiving address
    pub fn generate_address(&mut self, account: &str) -> AddressData {
        let data = address_data(&KeyPair::generate(), self.address_version);
        self.add_owned(account, data.clone());
        data
    }

    /// Add an address for a known private key to `account`
    pub fn import_private_key(
        &mut self,
        account: &str,
        private_key_hex: &str,
    ) -> Result<AddressData, AddressError> {
        let key_pair = KeyPair::from_private_key_hex(private_key_hex)?;
        let data = address_data(&key_pair, self.address_version);
        self.add_owned(account, data.clone());
        Ok(data)
    }

    /// Track `data` under `account` without its private key
    pub fn import_watch_only(&mut self, account: &str, data: &AddressData) {
        self.ensure_account(account);
        let watched = data.watch_only();
        for key in [&watched.address, &watched.asset_address, &watched.asset_id] {
            self.lookup
                .entry(key.clone())
                .or_insert_with(|| watched.clone());
        }
        self.watch_only
            .entry(account.to_string())
            .or_default()
            .push(watched);
    }

    fn add_owned(&mut self, account: &str, data: AddressData) {
        self.ensure_account(account);
        self.index(&data);
        self.owned
            .entry(account.to_string())
            .or_default()
            .push(data.clone());

        for listener in &mut self.listeners {
            listener.on_address_generation(account, &data.address, data.private_key.as_deref());
        }
    }

    fn index(&mut self, data: &AddressData) {
        for key in [&data.address, &data.asset_address, &data.asset_id] {
            self.lookup.insert(key.clone(), data.clone());
        }
    }

    fn ensure_account(&mut self, account: &str) {
        if account != INTERNAL_ACCOUNT && !self.accounts.iter().any(|a| a == account) {
            self.accounts.push(account.to_string());
        }
    }

    fn check_account(&self, account: &str) -> Result<(), AddressError> {
        if account == INTERNAL_ACCOUNT || self.accounts.iter().any(|a| a == account) {
            Ok(())
        } else {
            Err(AddressError::UnknownAccount(account.to_string()))
        }
    }
}

impl Default for KeyPairAddressProvider {
    fn default() -> Self {
        Self::new(AddressProviderConfig::default())
    }
}

impl AddressDataProvider for KeyPairAddressProvider {
    fn internal_account(&self) -> &str {
        INTERNAL_ACCOUNT
    }

    fn internal_address_data(&self) -> &AddressData {
        &self.internal
    }

    fn accounts(&self) -> Vec<String> {
        self.accounts.clone()
    }

    fn addresses_of(&self, account: &str) -> Result<&[AddressData], AddressError> {
        self.check_account(account)?;
        Ok(self.owned.get(account).map_or(&[][..], Vec::as_slice))
    }

    fn watch_only_addresses_of(&self, account: &str) -> Result<&[AddressData], AddressError> {
        self.check_account(account)?;
        Ok(self.watch_only.get(account).map_or(&[][..], Vec::as_slice))
    }

    fn receiving_address_of(&self, account: &str) -> Result<&AddressData, AddressError> {
        self.addresses_of(account)?
            .last()
            .ok_or_else(|| AddressError::NoReceivingAddress(account.to_string()))
    }

    fn private_keys_of(&self, account: &str) -> Result<Vec<String>, AddressError> {
        Ok(self
            .addresses_of(account)?
            .iter()
            .filter_map(|data| data.private_key.clone())
            .collect())
    }

    fn address_data_of(&self, key: &str) -> Result<&AddressData, AddressError> {
        self.lookup
            .get(key)
            .ok_or_else(|| AddressError::UnknownAddress(key.to_string()))
    }

    fn add_listener(&mut self, listener: Box<dyn AddressGenerationListener>) {
        self.listeners.push(listener);
    }
}
