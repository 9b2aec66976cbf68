// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

/// Sealing error.
///
/// No condition here is retried internally. Sealing is expensive and fully
/// deterministic, so a failed seal is surfaced to the caller, who decides
/// whether to retry with corrected inputs. There is no partial success: a
/// seal either produces a complete output package or fails outright.
#[derive(Debug, Error)]
pub enum Error {
    /// The sector source yielded a different number of bytes than the
    /// configured sector size. Signals a corrupt or mis-provisioned sector
    /// file; fatal and non-retryable.
    #[error("sector file is wrong size: expected {expected} bytes, got {actual}")]
    SectorSizeMismatch { expected: u64, actual: u64 },
    /// Malformed seal parameters; a configuration bug.
    #[error("invalid seal parameters: {0}")]
    ParameterInvalid(String),
    /// Data and key buffers diverged in length inside the encoder. Cannot
    /// occur with valid parameters; indicates a defect in layer generation.
    #[error("key and data must be the same length: data is {data} bytes, key is {key} bytes")]
    LengthMismatch { data: usize, key: usize },
    /// Malformed identity, seed or commitment input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Sector source read failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
