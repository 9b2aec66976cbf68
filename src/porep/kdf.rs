// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Label derivation function.
///
/// A one-way, collision-resistant keyed hash from a label preimage
/// (`replica_id ‖ node-index ‖ parent labels`) to exactly
/// [`output_len`](Kdf::output_len) bytes. This is the sole source of work
/// in labeling; substituting an invertible or truncating function voids
/// the replication guarantee, so such stand-ins exist only in test code.
pub trait Kdf: Send + Sync {
    /// Output length in bytes, equal to the node size.
    fn output_len(&self) -> usize;

    /// Derives a label from `preimage` into `out`, which is exactly
    /// [`output_len`](Kdf::output_len) bytes.
    fn derive(&self, preimage: &[u8], out: &mut [u8]);
}

/// SHA-256 production KDF.
///
/// The digest is truncated to the node size; for 32-byte nodes the top
/// two bits of the trailing byte are cleared so the label is a valid
/// field element.
#[derive(Clone, Debug)]
pub struct Sha256Kdf {
    node_size: usize,
}

impl Sha256Kdf {
    pub fn new(node_size: usize) -> Result<Self> {
        if node_size == 0 || node_size > 32 {
            return Err(Error::ParameterInvalid(format!(
                "sha256 kdf supports node sizes of 1..=32 bytes, got {node_size}"
            )));
        }
        Ok(Self { node_size })
    }
}

impl Kdf for Sha256Kdf {
    fn output_len(&self) -> usize {
        self.node_size
    }

    fn derive(&self, preimage: &[u8], out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.node_size);
        let digest = Sha256::digest(preimage);
        out.copy_from_slice(&digest[..self.node_size]);
        if self.node_size == 32 {
            // Strip the last two bits so the label fits the field.
            out[31] &= 0b0011_1111;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_node_sizes() {
        assert!(Sha256Kdf::new(0).is_err());
        assert!(Sha256Kdf::new(33).is_err());
        assert!(Sha256Kdf::new(32).is_ok());
    }

    #[test]
    fn output_is_masked_for_32_byte_nodes() {
        let kdf = Sha256Kdf::new(32).unwrap();
        let mut out = [0u8; 32];
        kdf.derive(b"preimage", &mut out);
        assert_eq!(out[31] & 0b1100_0000, 0);
    }

    #[test]
    fn is_deterministic_and_input_sensitive() {
        let kdf = Sha256Kdf::new(32).unwrap();
        let (mut a, mut b, mut c) = ([0u8; 32], [0u8; 32], [0u8; 32]);
        kdf.derive(b"one", &mut a);
        kdf.derive(b"one", &mut b);
        kdf.derive(b"two", &mut c);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
