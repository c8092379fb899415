//! Network-scoped address fixture file
//!
//! The fixture is a JSON array of address records read once at test-suite
//! start from `addresses.<network>`. Load failures are returned to the
//! caller; lookups of missing records fail with [`FixtureError::Lookup`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Network used when `NETWORK` is not set
pub const DEFAULT_NETWORK: &str = "testnet";

/// Environment variable selecting the network
pub const NETWORK_ENV: &str = "NETWORK";

/// Environment variable selecting the directory holding fixture files
pub const FIXTURE_DIR_ENV: &str = "FIXTURE_DIR";

/// Fixture errors
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Cannot read fixture file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot parse fixture file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No fixture record for {0}")]
    Lookup(String),
}

/// Where to find the fixture file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureConfig {
    pub network: String,
    pub dir: PathBuf,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK.to_string(),
            dir: PathBuf::from("."),
        }
    }
}

impl FixtureConfig {
    /// Read `NETWORK` and `FIXTURE_DIR`, falling back to the defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            network: std::env::var(NETWORK_ENV).unwrap_or(defaults.network),
            dir: std::env::var_os(FIXTURE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
        }
    }

    pub fn file_name(&self) -> String {
        format!("addresses.{}", self.network)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }
}

/// One address record of the fixture file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    #[serde(rename = "bitcoinAddress")]
    pub bitcoin_address: String,
    #[serde(rename = "privateKey")]
    pub private_key: String,
    #[serde(rename = "publicKeyHashHex")]
    pub public_key_hash: String,
    #[serde(rename = "assetAddress")]
    pub asset_address: String,
    #[serde(rename = "assetId")]
    pub asset_id: String,
    pub asset_definition: serde_json::Value,
    pub asset_definition_hash: String,
}

/// Loaded fixture records, in file order, indexed by address
#[derive(Debug, Clone, Default)]
pub struct AddressFixtures {
    records: Vec<FixtureRecord>,
    by_address: HashMap<String, usize>,
}

impl AddressFixtures {
    /// Load the fixture file selected by `config`
    pub fn load(config: &FixtureConfig) -> Result<Self, FixtureError> {
        let path = config.path();
        let file = fs::File::open(&path).map_err(|source| FixtureError::Load {
            path: path.clone(),
            source,
        })?;
        let fixtures = Self::from_reader(BufReader::new(file), &path)?;
        log::info!(
            "Loaded {} fixture records from {}",
            fixtures.len(),
            path.display()
        );
        Ok(fixtures)
    }

    /// Parse fixture records; `origin` names the source in errors
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, FixtureError> {
        let records: Vec<FixtureRecord> =
            serde_json::from_reader(reader).map_err(|source| FixtureError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<FixtureRecord>) -> Self {
        let by_address = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.bitcoin_address.clone(), i))
            .collect();
        Self {
            records,
            by_address,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FixtureRecord] {
        &self.records
    }

    pub fn record(&self, address: &str) -> Result<&FixtureRecord, FixtureError> {
        self.by_address
            .get(address)
            .map(|i| &self.records[*i])
            .ok_or_else(|| FixtureError::Lookup(address.to_string()))
    }

    /// Address of the record at `index` in file order
    pub fn address_at(&self, index: usize) -> Result<&str, FixtureError> {
        self.records
            .get(index)
            .map(|r| r.bitcoin_address.as_str())
            .ok_or_else(|| FixtureError::Lookup(format!("record #{}", index)))
    }

    pub fn asset_id(&self, address: &str) -> Result<&str, FixtureError> {
        Ok(&self.record(address)?.asset_id)
    }

    pub fn asset_address(&self, address: &str) -> Result<&str, FixtureError> {
        Ok(&self.record(address)?.asset_address)
    }

    pub fn asset_definition(&self, address: &str) -> Result<&serde_json::Value, FixtureError> {
        Ok(&self.record(address)?.asset_definition)
    }

    pub fn asset_definition_hash(&self, address: &str) -> Result<&str, FixtureError> {
        Ok(&self.record(address)?.asset_definition_hash)
    }

    pub fn public_key_hash(&self, address: &str) -> Result<&str, FixtureError> {
        Ok(&self.record(address)?.public_key_hash)
    }

    pub fn private_key(&self, address: &str) -> Result<&str, FixtureError> {
        Ok(&self.record(address)?.private_key)
    }
}
