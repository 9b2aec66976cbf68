// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Stacked-DRG (SDR) sector sealing.
//!
//! Sealing turns the plaintext bytes of a fixed-size sector into an encoded
//! replica bound to a specific storage miner and a public random seed. The
//! binding is a replica identifier derived from the sector identity, the
//! data commitment and the seed; the cost is a stack of key layers labeled
//! over two interleaved dependency graphs (an intra-layer DRG and an
//! inter-layer expander); the output is the sector data combined with the
//! final key layer node by node under a field modulus.
//!
//! The heavy lifting lives in [`porep`]; [`sealer`] orchestrates a whole
//! seal from sector files to a [`sealer::SealOutputs`] package. Proof
//! generation and verification belong to an external proof system reached
//! through [`sealer::ProofVerifier`].

pub mod commitment;
mod error;
pub mod porep;
pub mod sealer;
pub mod sector;

pub use error::{Error, Result};
