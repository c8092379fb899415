//! Structural transaction comparison for test assertions

use crate::core::transaction::Transaction;

/// Whether `actual` matches `expected` input for input and output for output
///
/// Version and counts must match; then every output pair must agree on
/// amount and ownership and every input pair on the referenced outpoint.
/// Unlocking data and the cached ids are not compared.
pub fn equivalent(actual: &Transaction, expected: &Transaction) -> bool {
    if actual.version() != expected.version()
        || actual.outputs().len() != expected.outputs().len()
        || actual.inputs().len() != expected.inputs().len()
    {
        return false;
    }

    let outputs_match = actual
        .outputs()
        .iter()
        .zip(expected.outputs())
        .all(|(a, e)| a.amount == e.amount && a.ownership == e.ownership);

    outputs_match
        && actual
            .inputs()
            .iter()
            .zip(expected.inputs())
            .all(|(a, e)| a.outpoint == e.outpoint)
}
