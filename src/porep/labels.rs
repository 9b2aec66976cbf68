// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

/// All labels of one layer, stored in a single node-indexed arena.
///
/// Position `i` holds the label of node `i`. The labeler populates the
/// arena strictly in increasing node order; once written, a label is never
/// mutated, and no partially labeled layer escapes the seal operation
/// that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerLabels {
    buf: Vec<u8>,
    node_size: usize,
}

impl LayerLabels {
    pub(crate) fn zeroed(node_count: usize, node_size: usize) -> Self {
        Self {
            buf: vec![0u8; node_count * node_size],
            node_size,
        }
    }

    pub fn node_size(&self) -> usize {
        self.node_size
    }

    pub fn node_count(&self) -> usize {
        self.buf.len() / self.node_size
    }

    /// The label of node `i`.
    pub fn label(&self, i: usize) -> &[u8] {
        &self.buf[i * self.node_size..(i + 1) * self.node_size]
    }

    pub(crate) fn label_mut(&mut self, i: usize) -> &mut [u8] {
        &mut self.buf[i * self.node_size..(i + 1) * self.node_size]
    }

    /// The whole layer as one contiguous buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// The ordered key layers of one seal. Layer `i > 0` depends on layer
/// `i − 1`; the last layer is the key used to encode the sector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyLayers(Vec<LayerLabels>);

impl KeyLayers {
    pub(crate) fn new(layers: Vec<LayerLabels>) -> Self {
        debug_assert!(!layers.is_empty());
        Self(layers)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn layer(&self, i: usize) -> &LayerLabels {
        &self.0[i]
    }

    /// The final layer, used as the encoding key.
    pub fn key(&self) -> &LayerLabels {
        self.0.last().expect("layer count is validated to be non-zero")
    }
}
