//! Address provisioning for fixture accounts
//!
//! - [`AddressDataProvider`]: the provisioning interface
//! - [`KeyPairAddressProvider`]: generated secp256k1 accounts
//! - [`AddressDelegate`]: forwarding façade over any provider

pub mod delegate;
pub mod keypair;
pub mod provider;

pub use delegate::AddressDelegate;
pub use keypair::{
    address_data, AddressProviderConfig, KeyPairAddressProvider, DEFAULT_ACCOUNTS,
    DEFAULT_ADDRESSES_PER_ACCOUNT, INTERNAL_ACCOUNT,
};
pub use provider::{AddressData, AddressDataProvider, AddressError, AddressGenerationListener};
