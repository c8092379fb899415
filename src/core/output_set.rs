//! Set of currently spendable outputs
//!
//! Keys are unique; an entry lives until it is spent or the session ends.
//! Entries are kept ordered by outpoint so snapshots are deterministic.

use crate::core::transaction::{OutPoint, OutputOwnership, Transaction, TransactionOutput};
use std::collections::BTreeMap;
use thiserror::Error;

/// Output set errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputSetError {
    #[error("Duplicate output: {0}")]
    DuplicateOutput(OutPoint),
    #[error("Unknown output: {0}")]
    UnknownOutput(OutPoint),
}

/// Spendable outputs keyed by outpoint
#[derive(Debug, Default, Clone)]
pub struct OutputSet {
    outputs: BTreeMap<OutPoint, TransactionOutput>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new spendable output
    pub fn add(
        &mut self,
        outpoint: OutPoint,
        output: TransactionOutput,
    ) -> Result<(), OutputSetError> {
        if self.outputs.contains_key(&outpoint) {
            return Err(OutputSetError::DuplicateOutput(outpoint));
        }
        log::trace!("Output added: {} ({} to {})", outpoint, output.amount, output.ownership);
        self.outputs.insert(outpoint, output);
        Ok(())
    }

    /// Register every output of `tx` under (tx hash, position)
    pub fn add_transaction_outputs(&mut self, tx: &Transaction) -> Result<(), OutputSetError> {
        for (index, output) in tx.outputs().iter().enumerate() {
            self.add(tx.outpoint(index as u32), output.clone())?;
        }
        Ok(())
    }

    /// Remove and return the output referenced by `outpoint`
    pub fn spend(&mut self, outpoint: &OutPoint) -> Result<TransactionOutput, OutputSetError> {
        let output = self
            .outputs
            .remove(outpoint)
            .ok_or(OutputSetError::UnknownOutput(*outpoint))?;
        log::trace!("Output spent: {}", outpoint);
        Ok(output)
    }

    /// Snapshot of the outstanding outputs; the iterator can be cloned to restart
    pub fn available(
        &self,
    ) -> impl Iterator<Item = (&OutPoint, &TransactionOutput)> + Clone + '_ {
        self.outputs.iter()
    }

    pub fn get(&self, outpoint: &OutPoint) -> Option<&TransactionOutput> {
        self.outputs.get(outpoint)
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.outputs.contains_key(outpoint)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn outputs_of<'a>(
        &'a self,
        ownership: &'a OutputOwnership,
    ) -> impl Iterator<Item = (&'a OutPoint, &'a TransactionOutput)> + 'a {
        self.outputs
            .iter()
            .filter(move |(_, output)| output.is_owned_by(ownership))
    }

    pub fn balance_of(&self, ownership: &OutputOwnership) -> u64 {
        self.outputs_of(ownership).map(|(_, o)| o.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Hash;

    fn output(amount: u64, owner: &str) -> TransactionOutput {
        TransactionOutput::new(amount, OutputOwnership::address(owner))
    }

    #[test]
    fn test_add_and_spend() {
        let mut set = OutputSet::new();
        let outpoint = OutPoint::new(Hash::digest(b"tx"), 0);
        set.add(outpoint, output(50, "alice")).unwrap();
        assert!(set.contains(&outpoint));

        let spent = set.spend(&outpoint).unwrap();
        assert_eq!(spent.amount, 50);
        assert!(set.available().all(|(p, _)| p != &outpoint));
        assert_eq!(
            set.spend(&outpoint),
            Err(OutputSetError::UnknownOutput(outpoint))
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut set = OutputSet::new();
        let outpoint = OutPoint::new(Hash::digest(b"tx"), 3);
        set.add(outpoint, output(1, "alice")).unwrap();
        assert_eq!(
            set.add(outpoint, output(2, "bob")),
            Err(OutputSetError::DuplicateOutput(outpoint))
        );
        assert_eq!(set.get(&outpoint).unwrap().amount, 1);
    }

    #[test]
    fn test_available_is_restartable() {
        let mut set = OutputSet::new();
        let hash = Hash::digest(b"tx");
        for i in 0..3 {
            set.add(OutPoint::new(hash, i), output(10, "alice")).unwrap();
        }
        let snapshot = set.available();
        let first: Vec<_> = snapshot.clone().map(|(p, _)| *p).collect();
        let second: Vec<_> = snapshot.map(|(p, _)| *p).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_balance_of() {
        let mut set = OutputSet::new();
        let hash = Hash::digest(b"tx");
        set.add(OutPoint::new(hash, 0), output(20, "bob")).unwrap();
        set.add(OutPoint::new(hash, 1), output(30, "carol")).unwrap();
        set.add(OutPoint::new(hash, 2), output(5, "bob")).unwrap();

        let bob = OutputOwnership::address("bob");
        assert_eq!(set.balance_of(&bob), 25);
        assert_eq!(set.outputs_of(&bob).count(), 2);
        assert_eq!(set.balance_of(&OutputOwnership::address("dave")), 0);
    }
}
