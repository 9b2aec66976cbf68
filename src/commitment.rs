// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Raw commitments and their content-addressed (CID) form.
//!
//! The sealing core never inspects commitment internals; it consumes a
//! `commit(bytes) -> Commitment` collaborator through [`DataCommitter`]
//! and wraps the raw digests into CIDs with the Filecoin codec/multihash
//! pairs expected on chain.

use blake2b_simd::Params as Blake2b;
use cid::multihash::Multihash;
use cid::Cid;

use crate::error::{Error, Result};

/// Raw 32-byte commitment digest (commD, commR, commP).
pub type Commitment = [u8; 32];

/// Multicodec for unsealed (data) commitments.
pub const FIL_COMMITMENT_UNSEALED: u64 = 0xf101;
/// Multicodec for sealed (replica) commitments.
pub const FIL_COMMITMENT_SEALED: u64 = 0xf102;
/// Multihash code for Sha2 256 trunc254 padded used in data commitments.
pub const SHA2_256_TRUNC254_PADDED: u64 = 0x1012;
/// Multihash code for Poseidon BLS replica commitments.
pub const POSEIDON_BLS12_381_A2_FC1: u64 = 0xb401;

/// Converts a raw commitment to a CID with the given Filecoin codec and
/// hash type, validating that the pair is consistent.
pub fn commitment_to_cid(mc: u64, mh: u64, commitment: &Commitment) -> Result<Cid> {
    validate_filecoin_cid_segments(mc, mh, commitment)?;

    let mh = Multihash::wrap(mh, commitment)
        .map_err(|e| Error::InvalidInput(format!("invalid multihash: {e}")))?;

    Ok(Cid::new_v1(mc, mh))
}

/// Extracts the raw commitment bytes, the codec and the hash type from a
/// CID, after validating that they are consistent.
pub fn cid_to_commitment(c: &Cid) -> Result<(u64, u64, Commitment)> {
    validate_filecoin_cid_segments(c.codec(), c.hash().code(), c.hash().digest())?;

    let mut comm = Commitment::default();
    comm.copy_from_slice(c.hash().digest());

    Ok((c.codec(), c.hash().code(), comm))
}

/// Converts a raw data commitment (commD) to a CID.
pub fn data_commitment_v1_to_cid(comm_d: &Commitment) -> Result<Cid> {
    commitment_to_cid(FIL_COMMITMENT_UNSEALED, SHA2_256_TRUNC254_PADDED, comm_d)
}

/// Extracts the raw data commitment from a CID, checking codec and hash
/// type along the way.
pub fn cid_to_data_commitment_v1(c: &Cid) -> Result<Commitment> {
    let (codec, _, comm_d) = cid_to_commitment(c)?;

    if codec != FIL_COMMITMENT_UNSEALED {
        return Err(Error::InvalidInput(
            "data commitment codec must be Unsealed".into(),
        ));
    }

    Ok(comm_d)
}

/// Converts a raw replica commitment (commR) to a CID.
pub fn replica_commitment_v1_to_cid(comm_r: &Commitment) -> Result<Cid> {
    commitment_to_cid(FIL_COMMITMENT_SEALED, POSEIDON_BLS12_381_A2_FC1, comm_r)
}

/// Extracts the raw replica commitment from a CID, checking codec and hash
/// type along the way.
pub fn cid_to_replica_commitment_v1(c: &Cid) -> Result<Commitment> {
    let (codec, _, comm_r) = cid_to_commitment(c)?;

    if codec != FIL_COMMITMENT_SEALED {
        return Err(Error::InvalidInput(
            "replica commitment codec must be Sealed".into(),
        ));
    }

    Ok(comm_r)
}

fn validate_filecoin_cid_segments(mc: u64, mh: u64, comm_x: &[u8]) -> Result<()> {
    match mc {
        FIL_COMMITMENT_UNSEALED => {
            if mh != SHA2_256_TRUNC254_PADDED {
                return Err(Error::InvalidInput(
                    "incorrect hash function for unsealed commitment".into(),
                ));
            }
        }
        FIL_COMMITMENT_SEALED => {
            if mh != POSEIDON_BLS12_381_A2_FC1 {
                return Err(Error::InvalidInput(
                    "incorrect hash function for sealed commitment".into(),
                ));
            }
        }
        _ => {
            return Err(Error::InvalidInput(
                "invalid codec, expected sealed or unsealed commitment codec".into(),
            ))
        }
    }

    if comm_x.len() != 32 {
        Err(Error::InvalidInput("commitments must be 32 bytes long".into()))
    } else {
        Ok(())
    }
}

/// The external commitment builder: a content-addressing digest over raw
/// bytes. Computed once per unsealed sector and stable across re-seals.
pub trait DataCommitter: Send + Sync {
    fn commit(&self, data: &[u8]) -> Result<Commitment>;
}

/// Blake2b-256 commitment builder. Stands in for the proof system's padded
/// Merkle commitment, which is negotiated outside this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake2bCommitter;

impl DataCommitter for Blake2bCommitter {
    fn commit(&self, data: &[u8]) -> Result<Commitment> {
        let digest = Blake2b::new().hash_length(32).to_state().update(data).finalize();
        let mut out = Commitment::default();
        out.copy_from_slice(digest.as_bytes());
        Ok(out)
    }
}
