// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt;

use cid::Cid;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type SectorNumber = u64;
pub type ActorId = u64;
pub type DealId = u64;

/// Length in bytes of the public randomness fed into sealing.
pub const SEAL_RANDOMNESS_LENGTH: usize = 32;

/// Sector ID which contains the sector number and the actor ID for the
/// miner. Immutable once sealing starts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectorId {
    pub miner: ActorId,
    pub number: SectorNumber,
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s-t0{}-{}", self.miner, self.number)
    }
}

/// `SectorSize` indicates one of a set of possible sizes in the network.
#[derive(Clone, Debug, PartialEq, Eq, Copy, Serialize, Deserialize)]
#[repr(u64)]
pub enum SectorSize {
    _2KiB = 2 << 10,
    _8MiB = 8 << 20,
    _512MiB = 512 << 20,
    _32GiB = 32 << 30,
}

impl SectorSize {
    pub fn bytes(self) -> u64 {
        self as u64
    }
}

/// Public randomness input to sealing. Always supplied externally, never
/// derived inside the sealer.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealRandomSeed([u8; SEAL_RANDOMNESS_LENGTH]);

impl SealRandomSeed {
    pub fn new(bytes: [u8; SEAL_RANDOMNESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SEAL_RANDOMNESS_LENGTH {
            return Err(Error::InvalidInput(format!(
                "seal randomness must be {SEAL_RANDOMNESS_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; SEAL_RANDOMNESS_LENGTH];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; SEAL_RANDOMNESS_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for SealRandomSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealRandomSeed({})", hex::encode(self.0))
    }
}

/// Everything the external proof system needs to verify a seal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealVerifyInfo {
    pub sector: SectorId,
    pub on_chain: OnChainSealVerifyInfo,
}

/// The on-chain portion of [`SealVerifyInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainSealVerifyInfo {
    /// commD
    pub unsealed_cid: Cid,
    /// commR
    pub sealed_cid: Cid,
    pub random_seed: SealRandomSeed,
    pub proof: Vec<u8>,
    pub deal_ids: Vec<DealId>,
    pub sector_number: SectorNumber,
}
