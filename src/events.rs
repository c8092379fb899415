//! New-transaction notifications
//!
//! Listeners are invoked synchronously, in registration order, once per
//! registered transaction. A transaction included in a block is announced
//! again with the block and its position in the block.

use crate::core::{BlockchainView, ChainBlock, Transaction};
use crate::crypto::Hash;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives every transaction registered with the fixture chain
pub trait ChainEventListener {
    /// `chain_block` and `tx_index` are set when the transaction arrives in a block
    fn on_new_transaction(
        &mut self,
        view: &dyn BlockchainView,
        tx_hash: &Hash,
        transaction: &Transaction,
        chain_block: Option<&ChainBlock>,
        tx_index: Option<usize>,
    );
}

/// Fans notifications out to the registered listeners
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn ChainEventListener>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Box<dyn ChainEventListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify(
        &mut self,
        view: &dyn BlockchainView,
        tx_hash: &Hash,
        transaction: &Transaction,
        chain_block: Option<&ChainBlock>,
        tx_index: Option<usize>,
    ) {
        for listener in &mut self.listeners {
            listener.on_new_transaction(view, tx_hash, transaction, chain_block, tx_index);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// Event Recorder
// =============================================================================

/// One notification as seen by an [`EventRecorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub tx_hash: Hash,
    pub transaction: Transaction,
    pub block_height: Option<u64>,
    pub block_hash: Option<Hash>,
    pub tx_index: Option<usize>,
    /// Best height of the chain when the notification was delivered
    pub best_height: u64,
}

impl RecordedEvent {
    pub fn in_block(&self) -> bool {
        self.block_hash.is_some()
    }
}

/// Listener that keeps every notification; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Notifications that carried a block
    pub fn block_events(&self) -> Vec<RecordedEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.in_block())
            .cloned()
            .collect()
    }
}

impl ChainEventListener for EventRecorder {
    fn on_new_transaction(
        &mut self,
        view: &dyn BlockchainView,
        tx_hash: &Hash,
        transaction: &Transaction,
        chain_block: Option<&ChainBlock>,
        tx_index: Option<usize>,
    ) {
        self.events.borrow_mut().push(RecordedEvent {
            tx_hash: *tx_hash,
            transaction: transaction.clone(),
            block_height: chain_block.map(|b| b.height),
            block_hash: chain_block.map(|b| b.block.hash()),
            tx_index,
            best_height: view.best_block_height(),
        });
    }
}
