// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Node-wise modular data/key combination.
//!
//! Nodes are little-endian byte strings on the wire; arithmetic happens in
//! the unsigned integer domain bounded by the configured modulus, and the
//! result is re-encoded at exactly the node size. Inputs are immutable;
//! both directions allocate a fresh output buffer.

use num_bigint::BigUint;
use rayon::prelude::*;

use super::params::SealParameters;
use crate::error::{Error, Result};

/// Encodes sector data with the key: per node, `(data + key) mod m`.
pub fn encode(data: &[u8], key: &[u8], params: &SealParameters) -> Result<Vec<u8>> {
    combine(data, key, params, |d, k, m| (d + k) % m)
}

/// Inverse of [`encode`]: per node, `(replica − key) mod m`.
pub fn decode(replica: &[u8], key: &[u8], params: &SealParameters) -> Result<Vec<u8>> {
    // Reduce both operands first so an unreduced key cannot underflow.
    combine(replica, key, params, |r, k, m| ((r % m) + m - (k % m)) % m)
}

fn combine(
    data: &[u8],
    key: &[u8],
    params: &SealParameters,
    op: impl Fn(BigUint, BigUint, &BigUint) -> BigUint + Sync,
) -> Result<Vec<u8>> {
    params.validate()?;
    if data.len() != key.len() {
        return Err(Error::LengthMismatch {
            data: data.len(),
            key: key.len(),
        });
    }
    if data.len() % params.node_size != 0 {
        return Err(Error::ParameterInvalid(format!(
            "buffer of {} bytes is not a multiple of node size {}",
            data.len(),
            params.node_size
        )));
    }

    let node_size = params.node_size;
    let mut out = vec![0u8; data.len()];
    out.par_chunks_mut(node_size)
        .zip(data.par_chunks(node_size).zip(key.par_chunks(node_size)))
        .for_each(|(out_node, (data_node, key_node))| {
            let d = BigUint::from_bytes_le(data_node);
            let k = BigUint::from_bytes_le(key_node);
            write_node_le(&op(d, k, &params.modulus), out_node);
        });

    Ok(out)
}

/// Writes `value` little-endian into `out`, zero-padding to the node size.
fn write_node_le(value: &BigUint, out: &mut [u8]) {
    let bytes = value.to_bytes_le();
    let n = bytes.len().min(out.len());
    out[..n].copy_from_slice(&bytes[..n]);
    out[n..].fill(0);
}
