//! Merkle root over the transaction ids of a block

use super::hash::{double_sha256, Hash};

/// Calculate the merkle root from a list of transaction ids
///
/// An odd node at any level is paired with itself.
pub fn merkle_root(ids: &[Hash]) -> Hash {
    if ids.is_empty() {
        return Hash::zero();
    }

    let mut current_level: Vec<Hash> = ids.to_vec();

    while current_level.len() > 1 {
        let next_level = current_level
            .chunks(2)
            .map(|chunk| {
                let left = &chunk[0];
                let right = chunk.get(1).unwrap_or(left);
                let mut data = left.as_bytes().to_vec();
                data.extend_from_slice(right.as_bytes());
                let mut bytes = [0u8; 32];
                bytes.copy_from_slice(&double_sha256(&data));
                Hash::from_bytes(bytes)
            })
            .collect();
        current_level = next_level;
    }

    current_level[0]
}
