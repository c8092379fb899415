//! Transactions for the fixture chain
//!
//! Implements the UTXO transaction model used by the fixture builder:
//! - OutPoints referencing a specific output of a specific transaction
//! - Outputs carrying an amount and an ownership descriptor
//! - Ordinary inputs spending entries of an [`OutputSet`]
//! - Generation (reward) inputs carrying unique marker data
//!
//! A transaction's id is derived from its content once, at construction.

use crate::core::output_set::{OutputSet, OutputSetError};
use crate::crypto::Hash;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Current transaction version
pub const TX_VERSION: u32 = 1;

/// Sequence number that disables locktime
pub const SEQUENCE_FINAL: u32 = 0xFFFFFFFF;

/// Output index used by the null outpoint of a generation input
pub const GENERATION_OUTPUT_INDEX: u32 = 0xFFFFFFFF;

// =============================================================================
// Error Types
// =============================================================================

/// Transaction-related errors
#[derive(Error, Debug, PartialEq)]
pub enum TransactionError {
    #[error("Invalid transaction shape: {0}")]
    InvalidShape(String),
    #[error(transparent)]
    OutputSet(#[from] OutputSetError),
}

// =============================================================================
// OutPoint
// =============================================================================

/// Reference to one output of one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    pub tx_hash: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: Hash, index: u32) -> Self {
        Self { tx_hash, index }
    }

    /// The outpoint referenced by a generation input
    pub fn null() -> Self {
        Self {
            tx_hash: Hash::zero(),
            index: GENERATION_OUTPUT_INDEX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.tx_hash.is_zero() && self.index == GENERATION_OUTPUT_INDEX
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

// =============================================================================
// Ownership
// =============================================================================

/// Who may spend an output: a coin address or a raw locking script
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputOwnership {
    Address(String),
    Script(Vec<u8>),
}

impl OutputOwnership {
    pub fn address(address: impl Into<String>) -> Self {
        Self::Address(address.into())
    }
}

impl fmt::Display for OutputOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => f.write_str(address),
            Self::Script(script) => write!(f, "script:{}", hex::encode(script)),
        }
    }
}

// =============================================================================
// Transaction Input / Output
// =============================================================================

/// Transaction input (reference to a previous output)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub outpoint: OutPoint,
    /// Unlocking data; marker bytes for a generation input
    pub unlocking_script: Vec<u8>,
    pub sequence: u32,
}

impl TransactionInput {
    /// Check if this input mints value instead of spending an output
    pub fn is_generation(&self) -> bool {
        self.outpoint.is_null()
    }
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub amount: u64,
    pub ownership: OutputOwnership,
}

impl TransactionOutput {
    pub fn new(amount: u64, ownership: OutputOwnership) -> Self {
        Self { amount, ownership }
    }

    pub fn is_owned_by(&self, ownership: &OutputOwnership) -> bool {
        &self.ownership == ownership
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// An immutable transaction with a cached content-derived id
///
/// Deserialization ignores any serialized id and derives it from the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTransaction")]
pub struct Transaction {
    version: u32,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    locktime: u32,
    hash: Hash,
}

impl Transaction {
    pub fn new(
        version: u32,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        locktime: u32,
    ) -> Self {
        let hash = Self::calculate_hash(version, &inputs, &outputs, locktime);
        Self {
            version,
            inputs,
            outputs,
            locktime,
            hash,
        }
    }

    fn calculate_hash(
        version: u32,
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
        locktime: u32,
    ) -> Hash {
        let data = format!("{}{:?}{:?}{}", version, inputs, outputs, locktime);
        Hash::digest(data.as_bytes())
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn locktime(&self) -> u32 {
        self.locktime
    }

    /// Whether this is a reward transaction (single generation input)
    pub fn is_generation(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_generation()
    }

    pub fn total_output(&self) -> u64 {
        self.outputs.iter().map(|o| o.amount).sum()
    }

    /// OutPoint of the output at `index`
    pub fn outpoint(&self, index: u32) -> OutPoint {
        OutPoint::new(self.hash, index)
    }
}

/// Serialized form of a [`Transaction`] without its cached id
#[derive(Deserialize)]
struct RawTransaction {
    version: u32,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    locktime: u32,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        Transaction::new(raw.version, raw.inputs, raw.outputs, raw.locktime)
    }
}

// =============================================================================
// Fixture helpers
// =============================================================================

/// A transaction with a human-readable label for test diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTransaction {
    pub name: String,
    pub transaction: Transaction,
}

impl NamedTransaction {
    pub fn new(name: impl Into<String>, transaction: Transaction) -> Self {
        Self {
            name: name.into(),
            transaction,
        }
    }

    pub fn hash(&self) -> Hash {
        self.transaction.hash()
    }

    /// The output at `index` paired with its outpoint, ready to be spent
    pub fn output(&self, index: u32) -> Option<OutputWithOutPoint> {
        self.transaction
            .outputs()
            .get(index as usize)
            .map(|output| OutputWithOutPoint {
                outpoint: self.transaction.outpoint(index),
                output: output.clone(),
            })
    }
}

/// An output together with the outpoint that references it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputWithOutPoint {
    pub outpoint: OutPoint,
    pub output: TransactionOutput,
}

/// An output to be created by a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOutput {
    pub amount: u64,
    pub ownership: OutputOwnership,
}

impl NewOutput {
    pub fn new(amount: u64, ownership: OutputOwnership) -> Self {
        Self { amount, ownership }
    }
}

/// An outpoint to consume, with the parameters of the spending input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spend {
    pub outpoint: OutPoint,
    pub unlocking_script: Vec<u8>,
    pub sequence: u32,
}

impl Spend {
    pub fn new(outpoint: OutPoint) -> Self {
        Self {
            outpoint,
            unlocking_script: Vec::new(),
            sequence: SEQUENCE_FINAL,
        }
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }
}

impl From<OutPoint> for Spend {
    fn from(outpoint: OutPoint) -> Self {
        Self::new(outpoint)
    }
}

impl From<&OutputWithOutPoint> for Spend {
    fn from(output: &OutputWithOutPoint) -> Self {
        Self::new(output.outpoint)
    }
}

// =============================================================================
// Transaction Builder
// =============================================================================

/// Accumulates inputs and outputs, spending inputs from an [`OutputSet`]
#[derive(Debug)]
pub struct TransactionBuilder {
    version: u32,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    locktime: u32,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            locktime: 0,
        }
    }

    /// Spend `spend.outpoint` from `outputs` and add the corresponding input
    ///
    /// The output is removed from the set immediately; a later failure does
    /// not put it back.
    pub fn add_input(
        mut self,
        outputs: &mut OutputSet,
        spend: &Spend,
    ) -> Result<Self, TransactionError> {
        outputs.spend(&spend.outpoint)?;
        self.inputs.push(TransactionInput {
            outpoint: spend.outpoint,
            unlocking_script: spend.unlocking_script.clone(),
            sequence: spend.sequence,
        });
        Ok(self)
    }

    /// Add the single input of a reward transaction
    pub fn add_generation_input(mut self, marker: Vec<u8>) -> Self {
        self.inputs.push(TransactionInput {
            outpoint: OutPoint::null(),
            unlocking_script: marker,
            sequence: SEQUENCE_FINAL,
        });
        self
    }

    pub fn add_output(mut self, amount: u64, ownership: OutputOwnership) -> Self {
        self.outputs.push(TransactionOutput { amount, ownership });
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn locktime(mut self, locktime: u32) -> Self {
        self.locktime = locktime;
        self
    }

    /// Build the transaction, checking its input shape
    pub fn build(self) -> Result<Transaction, TransactionError> {
        if self.inputs.is_empty() {
            return Err(TransactionError::InvalidShape(
                "transaction has no inputs".to_string(),
            ));
        }
        let generation_inputs = self.inputs.iter().filter(|i| i.is_generation()).count();
        if generation_inputs > 0 && self.inputs.len() > 1 {
            return Err(TransactionError::InvalidShape(
                "generation input must be the only input".to_string(),
            ));
        }
        Ok(Transaction::new(
            self.version,
            self.inputs,
            self.outputs,
            self.locktime,
        ))
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn funded_set(owner: &str, amounts: &[u64]) -> (OutputSet, Vec<OutPoint>) {
        let mut set = OutputSet::new();
        let source = Hash::digest(b"funding");
        let mut outpoints = Vec::new();
        for (i, amount) in amounts.iter().enumerate() {
            let outpoint = OutPoint::new(source, i as u32);
            set.add(
                outpoint,
                TransactionOutput::new(*amount, OutputOwnership::address(owner)),
            )
            .unwrap();
            outpoints.push(outpoint);
        }
        (set, outpoints)
    }

    #[test]
    fn test_inputs_and_outputs_keep_order() {
        let (mut set, outpoints) = funded_set("alice", &[10, 20]);

        let tx = TransactionBuilder::new()
            .add_input(&mut set, &Spend::new(outpoints[1]))
            .unwrap()
            .add_input(&mut set, &Spend::new(outpoints[0]))
            .unwrap()
            .add_output(5, OutputOwnership::address("bob"))
            .add_output(25, OutputOwnership::address("carol"))
            .build()
            .unwrap();

        assert_eq!(tx.inputs()[0].outpoint, outpoints[1]);
        assert_eq!(tx.inputs()[1].outpoint, outpoints[0]);
        assert_eq!(tx.outputs()[0].amount, 5);
        assert_eq!(tx.outputs()[1].amount, 25);
        assert_eq!(tx.total_output(), 30);
        assert!(set.is_empty());
    }

    #[test]
    fn test_unknown_input_fails() {
        let mut set = OutputSet::new();
        let missing = OutPoint::new(Hash::digest(b"nowhere"), 0);
        let err = TransactionBuilder::new()
            .add_input(&mut set, &Spend::new(missing))
            .unwrap_err();
        assert_eq!(
            err,
            TransactionError::OutputSet(OutputSetError::UnknownOutput(missing))
        );
    }

    #[test]
    fn test_no_inputs_is_invalid_shape() {
        let err = TransactionBuilder::new()
            .add_output(1, OutputOwnership::address("bob"))
            .build()
            .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidShape(_)));
    }

    #[test]
    fn test_generation_input_cannot_be_mixed() {
        let (mut set, outpoints) = funded_set("alice", &[10]);
        let err = TransactionBuilder::new()
            .add_generation_input(b"marker".to_vec())
            .add_input(&mut set, &Spend::new(outpoints[0]))
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidShape(_)));
    }

    #[test]
    fn test_zero_outputs_is_a_burn() {
        let (mut set, outpoints) = funded_set("alice", &[10]);
        let tx = TransactionBuilder::new()
            .add_input(&mut set, &Spend::new(outpoints[0]))
            .unwrap()
            .build()
            .unwrap();
        assert!(tx.outputs().is_empty());
        assert_eq!(tx.total_output(), 0);
    }

    #[test]
    fn test_generation_marker_changes_hash() {
        let build = |marker: &[u8]| {
            TransactionBuilder::new()
                .add_generation_input(marker.to_vec())
                .add_output(50, OutputOwnership::address("miner"))
                .build()
                .unwrap()
        };
        let a = build(b"Random:1");
        let b = build(b"Random:2");
        assert!(a.is_generation());
        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.hash(), build(b"Random:1").hash());
    }

    #[test]
    fn test_deserialize_rederives_id() {
        let tx = TransactionBuilder::new()
            .add_generation_input(b"Random:7".to_vec())
            .add_output(50, OutputOwnership::address("miner"))
            .build()
            .unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(serde_json::from_str::<Transaction>(&json).unwrap(), tx);

        let edited = json.replace("\"amount\":50", "\"amount\":5000");
        assert_ne!(edited, json);
        let decoded: Transaction = serde_json::from_str(&edited).unwrap();
        assert_eq!(decoded.outputs()[0].amount, 5000);
        assert_ne!(decoded.hash(), tx.hash());
        assert_eq!(
            decoded.hash(),
            Transaction::new(
                decoded.version(),
                decoded.inputs().to_vec(),
                decoded.outputs().to_vec(),
                decoded.locktime()
            )
            .hash()
        );
    }

    #[test]
    fn test_named_transaction_output() {
        let tx = TransactionBuilder::new()
            .add_generation_input(b"m".to_vec())
            .add_output(50, OutputOwnership::address("miner"))
            .build()
            .unwrap();
        let named = NamedTransaction::new("reward", tx);
        let output = named.output(0).unwrap();
        assert_eq!(output.outpoint, OutPoint::new(named.hash(), 0));
        assert_eq!(output.output.amount, 50);
        assert!(named.output(1).is_none());
        assert_eq!(Spend::from(&output).outpoint, output.outpoint);
    }
}
