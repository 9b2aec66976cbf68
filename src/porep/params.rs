// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length in bytes of the seed the graph oracles are keyed with.
pub const GRAPH_SEED_LENGTH: usize = 28;

/// Instantiation constants for one stacked-DRG configuration.
///
/// Negotiated outside this crate and consumed as an opaque bundle;
/// constructed once per instantiation and shared read-only across
/// concurrently sealing sectors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealParameters {
    /// Bytes per node. Labels and encoded nodes are exactly this long.
    pub node_size: usize,
    /// Number of key layers.
    pub layers: usize,
    /// Maximum DRG (intra-layer) parent count.
    pub degree: usize,
    /// Maximum expander (inter-layer) parent count.
    pub expansion_degree: usize,
    /// Field modulus for the encode step.
    pub modulus: BigUint,
    /// Seed binding the graph oracles to this instantiation.
    pub graph_seed: [u8; GRAPH_SEED_LENGTH],
}

impl SealParameters {
    pub fn validate(&self) -> Result<()> {
        if self.node_size == 0 {
            return Err(Error::ParameterInvalid("node size must be non-zero".into()));
        }
        if self.layers == 0 {
            return Err(Error::ParameterInvalid("layer count must be non-zero".into()));
        }
        if self.modulus.is_zero() {
            return Err(Error::ParameterInvalid("modulus must be non-zero".into()));
        }
        // An encoded node must fit back into node_size bytes.
        if self.modulus.bits() > 8 * self.node_size as u64 {
            return Err(Error::ParameterInvalid(format!(
                "modulus of {} bits does not fit a {}-byte node",
                self.modulus.bits(),
                self.node_size
            )));
        }
        Ok(())
    }

    /// Number of addressable nodes in a sector of `sector_size` bytes.
    /// The division must be exact.
    pub fn node_count(&self, sector_size: u64) -> Result<usize> {
        self.validate()?;
        let node_size = self.node_size as u64;
        if sector_size % node_size != 0 {
            return Err(Error::ParameterInvalid(format!(
                "sector size {sector_size} is not a multiple of node size {node_size}"
            )));
        }
        usize::try_from(sector_size / node_size)
            .map_err(|_| Error::ParameterInvalid("node count overflows usize".into()))
    }
}
