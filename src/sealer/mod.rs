// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Seal orchestration.
//!
//! [`Sealer`] wires the replica-id derivation, key-layer generation and
//! encoding together over byte-exact sector sources. One seal is one
//! CPU-bound unit of work; parameters and graph oracles are shared
//! read-only, so independent sectors may be sealed fully in parallel with
//! no synchronization.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cid::Cid;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commitment::{
    data_commitment_v1_to_cid, replica_commitment_v1_to_cid, DataCommitter,
};
use crate::error::{Error, Result};
use crate::porep::{
    derive_replica_id, encode, generate_key_layers, BucketGraph, DrgGraph, ExpanderGraph, Kdf,
    KeyLayers, KeyedExpander, ReplicaId, SealParameters, Sha256Kdf,
};
use crate::sector::{SealRandomSeed, SealVerifyInfo, SectorId, SectorSize};

/// Sealing configuration: the sector size plus the opaque parameter
/// bundle negotiated for it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealConfig {
    pub sector_size: SectorSize,
    pub params: SealParameters,
}

impl SealConfig {
    /// Validates the bundle against the sector size and returns the node
    /// count.
    pub fn node_count(&self) -> Result<usize> {
        self.params.node_count(self.sector_size.bytes())
    }
}

/// Byte-exact sector input. Implementations must produce exactly the
/// requested number of bytes or fail.
pub trait SectorSource {
    fn read_sector(&self, sector_size: u64) -> Result<Vec<u8>>;
}

/// Sector source backed by a plain file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SectorSource for FileSource {
    fn read_sector(&self, sector_size: u64) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(sector_size as usize);
        // Bounded by one extra byte, enough to notice an oversized file.
        File::open(&self.path)?
            .take(sector_size + 1)
            .read_to_end(&mut buf)?;
        if buf.len() as u64 != sector_size {
            let actual = match std::fs::metadata(&self.path) {
                Ok(meta) => meta.len(),
                Err(_) => buf.len() as u64,
            };
            return Err(Error::SectorSizeMismatch {
                expected: sector_size,
                actual,
            });
        }
        Ok(buf)
    }
}

/// The external proof system's verification boundary. Verification is
/// asymptotically cheaper than sealing; the sealer never re-derives a
/// replica to check one.
pub trait ProofVerifier: Send + Sync {
    fn verify_seal(&self, info: &SealVerifyInfo) -> anyhow::Result<bool>;
}

/// Mock verifier. This does no-op verification of any seal.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockVerifier;

impl ProofVerifier for MockVerifier {
    fn verify_seal(&self, _: &SealVerifyInfo) -> anyhow::Result<bool> {
        Ok(true)
    }
}

/// Result of one seal, returned whole or not at all. Carries the replica
/// plus the material the external proof system needs to build the
/// on-chain proof.
#[derive(Debug, Clone)]
pub struct SealOutputs {
    pub sector_id: SectorId,
    pub replica: Vec<u8>,
    pub replica_id: ReplicaId,
    /// commD of the unsealed data.
    pub comm_d: Cid,
    /// commR of the replica.
    pub comm_r: Cid,
    pub seed: SealRandomSeed,
    /// Labeling aux the prover consumes when building the seal proof.
    pub key_layers: KeyLayers,
}

/// Orchestrates seals for one parameter instantiation.
pub struct Sealer<D, V> {
    config: SealConfig,
    node_count: usize,
    kdf: Arc<dyn Kdf>,
    drg: Arc<dyn DrgGraph>,
    expander: Arc<dyn ExpanderGraph>,
    committer: D,
    verifier: V,
}

impl<D: DataCommitter, V: ProofVerifier> Sealer<D, V> {
    /// Builds a sealer with the production KDF and the graph oracles
    /// keyed by the configured seed.
    pub fn new(config: SealConfig, committer: D, verifier: V) -> Result<Self> {
        let node_count = config.node_count()?;
        let kdf = Arc::new(Sha256Kdf::new(config.params.node_size)?);
        let drg = Arc::new(BucketGraph::new(config.params.degree, config.params.graph_seed));
        let expander = Arc::new(KeyedExpander::new(
            config.params.expansion_degree,
            node_count as u64,
            config.params.graph_seed,
        ));
        Ok(Self {
            config,
            node_count,
            kdf,
            drg,
            expander,
            committer,
            verifier,
        })
    }

    /// Builds a sealer around externally provided primitives, e.g. graph
    /// oracles bound to negotiated parameters.
    pub fn with_components(
        config: SealConfig,
        kdf: Arc<dyn Kdf>,
        drg: Arc<dyn DrgGraph>,
        expander: Arc<dyn ExpanderGraph>,
        committer: D,
        verifier: V,
    ) -> Result<Self> {
        let node_count = config.node_count()?;
        Ok(Self {
            config,
            node_count,
            kdf,
            drg,
            expander,
            committer,
            verifier,
        })
    }

    pub fn config(&self) -> &SealConfig {
        &self.config
    }

    /// Seals one sector.
    ///
    /// Commits the unsealed data, reads exactly the configured sector
    /// size from the staged sector at `sealed_path`, derives the replica
    /// id, labels all key layers and encodes the replica. Fails outright
    /// on any error; there is no partially sealed output.
    pub fn seal_sector(
        &self,
        sector_id: SectorId,
        seed: SealRandomSeed,
        unsealed_path: &Path,
        sealed_path: &Path,
    ) -> Result<SealOutputs> {
        let sector_size = self.config.sector_size.bytes();

        let unsealed = FileSource::new(unsealed_path).read_sector(sector_size)?;
        let comm_d = self.committer.commit(&unsealed)?;
        drop(unsealed);

        let data = FileSource::new(sealed_path).read_sector(sector_size)?;

        let replica_id = derive_replica_id(sector_id, &comm_d, &seed);
        info!(%sector_id, %replica_id, "sealing sector");

        let key_layers = generate_key_layers(
            &self.config.params,
            self.kdf.as_ref(),
            self.drg.as_ref(),
            self.expander.as_ref(),
            &replica_id,
            self.node_count,
        )?;

        let replica = encode(&data, key_layers.key().as_bytes(), &self.config.params)?;
        let comm_r = self.committer.commit(&replica)?;
        debug!(%sector_id, replica_len = replica.len(), "sector sealed");

        Ok(SealOutputs {
            sector_id,
            replica,
            replica_id,
            comm_d: data_commitment_v1_to_cid(&comm_d)?,
            comm_r: replica_commitment_v1_to_cid(&comm_r)?,
            seed,
            key_layers,
        })
    }

    /// Defers to the external proof system.
    pub fn verify_seal(&self, info: &SealVerifyInfo) -> anyhow::Result<bool> {
        self.verifier.verify_seal(info)
    }
}
