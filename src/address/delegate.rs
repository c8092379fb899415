//! Forwarding façade over an address provider

use super::provider::{AddressData, AddressDataProvider, AddressError, AddressGenerationListener};

/// Subscriber registered by [`AddressDelegate`]; only logs generated addresses
struct GenerationLog;

impl AddressGenerationListener for GenerationLog {
    fn on_address_generation(&mut self, account: &str, address: &str, _private_key: Option<&str>) {
        log::trace!("Address generated: account={}, address={}", account, address);
    }
}

/// Exposes an injected provider's queries and subscribes to its generation events
///
/// `P` may be a `&mut` borrow of a provider the caller keeps; the delegate
/// holds nothing but the provider.
pub struct AddressDelegate<P> {
    provider: P,
}

impl<P: AddressDataProvider> AddressDelegate<P> {
    pub fn new(mut provider: P) -> Self {
        provider.add_listener(Box::new(GenerationLog));
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P: AddressDataProvider> AddressDataProvider for AddressDelegate<P> {
    fn internal_account(&self) -> &str {
        self.provider.internal_account()
    }

    fn internal_address_data(&self) -> &AddressData {
        self.provider.internal_address_data()
    }

    fn accounts(&self) -> Vec<String> {
        self.provider.accounts()
    }

    fn addresses_of(&self, account: &str) -> Result<&[AddressData], AddressError> {
        self.provider.addresses_of(account)
    }

    fn watch_only_addresses_of(&self, account: &str) -> Result<&[AddressData], AddressError> {
        self.provider.watch_only_addresses_of(account)
    }

    fn receiving_address_of(&self, account: &str) -> Result<&AddressData, AddressError> {
        self.provider.receiving_address_of(account)
    }

    fn private_keys_of(&self, account: &str) -> Result<Vec<String>, AddressError> {
        self.provider.private_keys_of(account)
    }

    fn address_data_of(&self, key: &str) -> Result<&AddressData, AddressError> {
        self.provider.address_data_of(key)
    }

    fn add_listener(&mut self, listener: Box<dyn AddressGenerationListener>) {
        self.provider.add_listener(listener);
    }
}
