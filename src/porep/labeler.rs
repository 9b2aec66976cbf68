// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use super::graph::{DrgGraph, ExpanderGraph};
use super::kdf::Kdf;
use super::labels::{KeyLayers, LayerLabels};
use super::params::SealParameters;
use super::replica_id::ReplicaId;
use crate::error::{Error, Result};

/// Labels one layer in strictly increasing node order.
///
/// DRG parents are resolved in the layer under construction; because they
/// are strictly lower-indexed, increasing order guarantees every
/// dependency is already materialized. Expander parents are resolved in
/// `prev`, the fully completed previous layer; `prev` is `None` exactly
/// for the first layer. Any schedule consistent with that partial order
/// produces the same labels; increasing index order is the canonical one.
pub fn label_layer(
    kdf: &dyn Kdf,
    drg: &dyn DrgGraph,
    expander: &dyn ExpanderGraph,
    replica_id: &ReplicaId,
    node_count: usize,
    prev: Option<&LayerLabels>,
) -> Result<LayerLabels> {
    let node_size = kdf.output_len();
    if let Some(prev) = prev {
        if prev.node_count() != node_count || prev.node_size() != node_size {
            return Err(Error::ParameterInvalid(format!(
                "previous layer has {} nodes of {} bytes, expected {} of {}",
                prev.node_count(),
                prev.node_size(),
                node_count,
                node_size
            )));
        }
    }

    let mut labels = LayerLabels::zeroed(node_count, node_size);
    let mut drg_parents = Vec::with_capacity(drg.degree());
    let mut exp_parents = Vec::with_capacity(expander.degree());
    let mut preimage =
        Vec::with_capacity(ReplicaId::LENGTH + 8 + node_size * (drg.degree() + expander.degree()));

    for node in 0..node_count as u64 {
        preimage.clear();
        preimage.extend_from_slice(replica_id.as_bytes());
        let mut index = [0u8; 8];
        LittleEndian::write_u64(&mut index, node);
        preimage.extend_from_slice(&index);

        // The first node of every layer has no DRG parents.
        if node > 0 {
            drg.parents(node, &mut drg_parents);
            for &parent in &drg_parents {
                debug_assert!(parent < node, "DRG parent {parent} not below node {node}");
                preimage.extend_from_slice(labels.label(parent as usize));
            }
        }

        // The first layer has no expander parents.
        if let Some(prev) = prev {
            expander.parents(node, &mut exp_parents);
            for &parent in &exp_parents {
                preimage.extend_from_slice(prev.label(parent as usize));
            }
        }

        kdf.derive(&preimage, labels.label_mut(node as usize));
    }

    Ok(labels)
}

/// Generates all key layers for one seal.
///
/// Exactly `params.layers` entries: layer 0 is labeled with no previous
/// layer, layer `i ≥ 1` with layer `i − 1` fully materialized. The final
/// entry is the key the encoder consumes. A partially computed layer is
/// never reused — a cancelled seal restarts from layer 0.
pub fn generate_key_layers(
    params: &SealParameters,
    kdf: &dyn Kdf,
    drg: &dyn DrgGraph,
    expander: &dyn ExpanderGraph,
    replica_id: &ReplicaId,
    node_count: usize,
) -> Result<KeyLayers> {
    params.validate()?;
    if kdf.output_len() != params.node_size {
        return Err(Error::ParameterInvalid(format!(
            "kdf produces {}-byte labels for {}-byte nodes",
            kdf.output_len(),
            params.node_size
        )));
    }

    let mut layers: Vec<LayerLabels> = Vec::with_capacity(params.layers);
    for layer in 0..params.layers {
        debug!(layer, node_count, "labeling layer");
        let labels = label_layer(kdf, drg, expander, replica_id, node_count, layers.last())?;
        layers.push(labels);
    }
    Ok(KeyLayers::new(layers))
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::porep::{encode, BucketGraph, KeyedExpander, Sha256Kdf, GRAPH_SEED_LENGTH};

    const SEED: [u8; GRAPH_SEED_LENGTH] = [3; GRAPH_SEED_LENGTH];

    /// Truncation stand-in for the KDF: first 32 preimage bytes,
    /// zero-padded. Satisfies none of the one-wayness requirements, which
    /// is fine only here.
    struct TruncKdf;

    impl Kdf for TruncKdf {
        fn output_len(&self) -> usize {
            32
        }

        fn derive(&self, preimage: &[u8], out: &mut [u8]) {
            out.fill(0);
            let n = preimage.len().min(32);
            out[..n].copy_from_slice(&preimage[..n]);
        }
    }

    /// DRG where every node depends on its predecessor.
    struct ChainDrg;

    impl DrgGraph for ChainDrg {
        fn degree(&self) -> usize {
            1
        }

        fn parents(&self, node: u64, out: &mut Vec<u64>) {
            out.clear();
            if node > 0 {
                out.push(node - 1);
            }
        }
    }

    /// Expander mapping every node onto itself in the previous layer.
    struct IdentityExpander;

    impl ExpanderGraph for IdentityExpander {
        fn degree(&self) -> usize {
            1
        }

        fn parents(&self, node: u64, out: &mut Vec<u64>) {
            out.clear();
            out.push(node);
        }
    }

    fn toy_params() -> SealParameters {
        SealParameters {
            node_size: 32,
            layers: 2,
            degree: 1,
            expansion_degree: 1,
            modulus: BigUint::from(1u8) << 255,
            graph_seed: SEED,
        }
    }

    fn real_components() -> (SealParameters, Sha256Kdf, BucketGraph, KeyedExpander) {
        let params = SealParameters {
            node_size: 32,
            layers: 3,
            degree: 4,
            expansion_degree: 6,
            modulus: BigUint::from(1u8) << 255,
            graph_seed: SEED,
        };
        let kdf = Sha256Kdf::new(32).unwrap();
        let drg = BucketGraph::new(4, SEED);
        let expander = KeyedExpander::new(6, 16, SEED);
        (params, kdf, drg, expander)
    }

    #[test]
    fn layers_have_expected_shape() {
        let (params, kdf, drg, expander) = real_components();
        let rid = ReplicaId::from_bytes([5; 32]);
        let layers = generate_key_layers(&params, &kdf, &drg, &expander, &rid, 16).unwrap();
        assert_eq!(layers.len(), 3);
        for i in 0..layers.len() {
            assert_eq!(layers.layer(i).node_count(), 16);
            assert_eq!(layers.layer(i).node_size(), 32);
        }
        assert_eq!(layers.key(), layers.layer(2));
    }

    #[test]
    fn first_node_of_first_layer_hashes_only_id_and_index() {
        let (_, kdf, drg, expander) = real_components();
        let rid = ReplicaId::from_bytes([9; 32]);
        let labels = label_layer(&kdf, &drg, &expander, &rid, 16, None).unwrap();

        let mut preimage = Vec::new();
        preimage.extend_from_slice(rid.as_bytes());
        preimage.extend_from_slice(&0u64.to_le_bytes());
        let mut expected = [0u8; 32];
        kdf.derive(&preimage, &mut expected);

        assert_eq!(labels.label(0), expected);
    }

    #[test]
    fn later_layers_depend_on_previous_layer() {
        let (params, kdf, drg, expander) = real_components();
        let rid = ReplicaId::from_bytes([1; 32]);
        let layers = generate_key_layers(&params, &kdf, &drg, &expander, &rid, 16).unwrap();
        // Labeling layer 1 against a different previous layer must change it.
        let relabeled =
            label_layer(&kdf, &drg, &expander, &rid, 16, Some(layers.layer(1))).unwrap();
        assert_ne!(&relabeled, layers.layer(1));
        assert_eq!(
            &label_layer(&kdf, &drg, &expander, &rid, 16, Some(layers.layer(0))).unwrap(),
            layers.layer(1)
        );
    }

    #[test]
    fn replica_id_changes_every_first_layer_label() {
        let (params, kdf, drg, expander) = real_components();
        let a = generate_key_layers(&params, &kdf, &drg, &expander, &ReplicaId::from_bytes([0; 32]), 16)
            .unwrap();
        let b = generate_key_layers(&params, &kdf, &drg, &expander, &ReplicaId::from_bytes([1; 32]), 16)
            .unwrap();
        for node in 0..16 {
            assert_ne!(a.layer(0).label(node), b.layer(0).label(node));
        }
    }

    #[test]
    fn zero_layers_rejected() {
        let (mut params, kdf, drg, expander) = real_components();
        params.layers = 0;
        let rid = ReplicaId::from_bytes([0; 32]);
        assert!(matches!(
            generate_key_layers(&params, &kdf, &drg, &expander, &rid, 16),
            Err(Error::ParameterInvalid(_))
        ));
    }

    #[test]
    fn out_of_order_schedule_is_detected() {
        // A labeler that walks nodes in decreasing order reads DRG parents
        // before they exist; its output must disagree with the canonical
        // increasing-order labels, so a conformance comparison rejects it.
        let (_, kdf, drg, expander) = real_components();
        let rid = ReplicaId::from_bytes([4; 32]);
        let canonical = label_layer(&kdf, &drg, &expander, &rid, 16, None).unwrap();

        let mut bad = LayerLabels::zeroed(16, 32);
        let mut parents = Vec::new();
        let mut preimage = Vec::new();
        for node in (0..16u64).rev() {
            preimage.clear();
            preimage.extend_from_slice(rid.as_bytes());
            preimage.extend_from_slice(&node.to_le_bytes());
            if node > 0 {
                drg.parents(node, &mut parents);
                for &p in &parents {
                    preimage.extend_from_slice(bad.label(p as usize));
                }
            }
            kdf.derive(&preimage, bad.label_mut(node as usize));
        }

        assert_ne!(bad, canonical);
    }

    #[test]
    fn toy_end_to_end_vector() {
        // 4 nodes of 32 bytes, 2 layers, chain DRG, identity expander,
        // truncation KDF. Every preimage starts with the replica id, so
        // every label in both layers is the replica id itself; the replica
        // is the node-wise modular sum of data and id.
        let params = toy_params();
        let rid_bytes = [0xAB; 32];
        let rid = ReplicaId::from_bytes(rid_bytes);
        let layers =
            generate_key_layers(&params, &TruncKdf, &ChainDrg, &IdentityExpander, &rid, 4).unwrap();

        assert_eq!(layers.len(), 2);
        for node in 0..4 {
            assert_eq!(layers.layer(1).label(node), rid_bytes);
        }

        let mut data = Vec::with_capacity(128);
        for node in 0u8..4 {
            data.extend_from_slice(&[node + 1; 32]);
        }
        let replica = encode(&data, layers.key().as_bytes(), &params).unwrap();

        let mut expected = Vec::with_capacity(128);
        for node in 0..4 {
            let d = BigUint::from_bytes_le(&data[node * 32..(node + 1) * 32]);
            let k = BigUint::from_bytes_le(&rid_bytes);
            let mut bytes = ((d + k) % &params.modulus).to_bytes_le();
            bytes.resize(32, 0);
            expected.extend_from_slice(&bytes);
        }
        assert_eq!(replica, expected);
    }
}
