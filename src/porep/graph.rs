// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Graph oracles for the labeler.
//!
//! Both oracles are pure functions of (parameters, node index); repeated
//! calls return identical parent lists, so a labeling run is replayable
//! bit for bit. They carry no hidden state and may be shared across
//! concurrently sealing sectors.

use std::cmp::{max, min};

use blake2b_simd::Params as Blake2b;
use byteorder::{ByteOrder, LittleEndian};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::params::GRAPH_SEED_LENGTH;

/// Intra-layer dependency graph. Every parent of `node` is strictly
/// lower-indexed, so labeling in increasing node order always finds its
/// dependencies already computed. Node 0 is the layer root and has no
/// parents.
pub trait DrgGraph: Send + Sync {
    fn degree(&self) -> usize;

    /// Writes the ordered parents of `node` into `out`, replacing its
    /// contents. All indices are `< node`; at most `degree()` entries.
    fn parents(&self, node: u64, out: &mut Vec<u64>);
}

/// Inter-layer dependency graph. Parents of `node` address the previous
/// layer and may take any index in `[0, node_count)`. Not consulted for
/// the first layer.
pub trait ExpanderGraph: Send + Sync {
    fn degree(&self) -> usize;

    /// Writes the ordered previous-layer parents of `node` into `out`,
    /// replacing its contents. At most `degree()` entries.
    fn parents(&self, node: u64, out: &mut Vec<u64>);
}

/// DRG built by bucket sampling.
///
/// Parent distances for node `i` are drawn from exponentially sized
/// buckets below `i` in a degree-expanded metagraph, which biases edges
/// towards recent nodes while keeping long-range ones. The rng is
/// re-seeded per node from the graph seed, keeping the oracle stateless.
#[derive(Clone, Debug)]
pub struct BucketGraph {
    degree: usize,
    seed: [u8; GRAPH_SEED_LENGTH],
}

impl BucketGraph {
    pub fn new(degree: usize, seed: [u8; GRAPH_SEED_LENGTH]) -> Self {
        Self { degree, seed }
    }

    fn node_rng(&self, node: u64) -> ChaCha8Rng {
        let mut seed = [0u8; 32];
        seed[..GRAPH_SEED_LENGTH].copy_from_slice(&self.seed);
        LittleEndian::write_u32(&mut seed[GRAPH_SEED_LENGTH..], node as u32);
        ChaCha8Rng::from_seed(seed)
    }
}

impl DrgGraph for BucketGraph {
    fn degree(&self) -> usize {
        self.degree
    }

    fn parents(&self, node: u64, out: &mut Vec<u64>) {
        out.clear();
        match node {
            // The root of the layer.
            0 => {}
            // Node 1 can only point at the root.
            1 => out.extend(std::iter::repeat(0).take(self.degree)),
            _ => {
                let mut rng = self.node_rng(node);
                let m = self.degree as u64;
                for k in 0..m {
                    // Each real node spans `m` metagraph nodes; sample a
                    // back-distance from one of its log2 buckets.
                    let meta = node * m + k;
                    let buckets = 64 - meta.leading_zeros() as u64;
                    let bucket = rng.gen_range(1..=buckets);
                    let largest = min(meta, 1u64 << bucket);
                    let smallest = min(max(largest >> 1, 2), largest);
                    let distance = rng.gen_range(smallest..=largest);
                    let mapped = (meta - distance) / m;
                    // The metagraph can map an edge back onto the node
                    // itself; fall back to the immediate predecessor.
                    out.push(if mapped == node { node - 1 } else { mapped });
                }
            }
        }
    }
}

/// Expander whose parents are derived with keyed blake2b over the node
/// and parent slot, reduced mod the node count. A pure stand-in for a
/// permutation-based expander; any implementation of [`ExpanderGraph`]
/// with the same purity contract can replace it.
#[derive(Clone, Debug)]
pub struct KeyedExpander {
    degree: usize,
    node_count: u64,
    seed: [u8; GRAPH_SEED_LENGTH],
}

impl KeyedExpander {
    pub fn new(degree: usize, node_count: u64, seed: [u8; GRAPH_SEED_LENGTH]) -> Self {
        Self {
            degree,
            node_count,
            seed,
        }
    }
}

impl ExpanderGraph for KeyedExpander {
    fn degree(&self) -> usize {
        self.degree
    }

    fn parents(&self, node: u64, out: &mut Vec<u64>) {
        out.clear();
        let mut buf = [0u8; 12];
        LittleEndian::write_u64(&mut buf[..8], node);
        for slot in 0..self.degree {
            LittleEndian::write_u32(&mut buf[8..], slot as u32);
            let digest = Blake2b::new()
                .hash_length(8)
                .key(&self.seed)
                .to_state()
                .update(&buf)
                .finalize();
            out.push(LittleEndian::read_u64(digest.as_bytes()) % self.node_count);
        }
    }
}
