// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! The stacked-DRG labeling and encoding core.
//!
//! A seal derives a [`ReplicaId`], labels `layers` key layers over the
//! sector's nodes (each label depending on lower-indexed DRG parents in
//! the same layer and, past layer 0, expander parents in the previous
//! layer), then combines sector data with the final layer node by node
//! under the field modulus.

mod encode;
mod graph;
mod kdf;
mod labeler;
mod labels;
mod params;
mod replica_id;

pub use encode::{decode, encode};
pub use graph::{BucketGraph, DrgGraph, ExpanderGraph, KeyedExpander};
pub use kdf::{Kdf, Sha256Kdf};
pub use labeler::{generate_key_layers, label_layer};
pub use labels::{KeyLayers, LayerLabels};
pub use params::{SealParameters, GRAPH_SEED_LENGTH};
pub use replica_id::{derive_replica_id, ReplicaId};
