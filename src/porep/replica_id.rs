// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt;

use blake2b_simd::Params as Blake2b;
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::error::{Error, Result};
use crate::sector::{SealRandomSeed, SectorId};

/// Per-seal binding value fed into labeling.
///
/// A deterministic digest of (sector identity, data commitment, seal
/// randomness): re-sealing the same data under a different seed or sector
/// yields a different identifier, and with it different key layers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplicaId([u8; Self::LENGTH]);

impl ReplicaId {
    pub const LENGTH: usize = 32;

    pub fn from_bytes(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LENGTH {
            return Err(Error::InvalidInput(format!(
                "replica id must be {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            )));
        }
        let mut out = [0u8; Self::LENGTH];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }
}

impl fmt::Debug for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplicaId({})", hex::encode(self.0))
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Derives the replica identifier for one seal.
///
/// Blake2b-256 over the fixed-width preimage
/// `miner ‖ sector-number ‖ comm_d ‖ seed` (integers little-endian).
/// Pure: no side effects, and the same inputs always produce the same
/// identifier.
pub fn derive_replica_id(
    sector_id: SectorId,
    comm_d: &Commitment,
    seed: &SealRandomSeed,
) -> ReplicaId {
    let mut preimage = [0u8; 8 + 8 + 32 + 32];
    LittleEndian::write_u64(&mut preimage[..8], sector_id.miner);
    LittleEndian::write_u64(&mut preimage[8..16], sector_id.number);
    preimage[16..48].copy_from_slice(comm_d);
    preimage[48..].copy_from_slice(seed.as_bytes());

    let digest = Blake2b::new()
        .hash_length(ReplicaId::LENGTH)
        .to_state()
        .update(&preimage)
        .finalize();

    let mut out = [0u8; ReplicaId::LENGTH];
    out.copy_from_slice(digest.as_bytes());
    ReplicaId(out)
}
