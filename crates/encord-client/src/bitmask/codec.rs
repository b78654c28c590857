// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Backend selection for the bitmask codec.
//!
//! Run detection and transposition have two implementations: a scalar
//! single-pass version and a data-parallel version built on rayon (behind
//! the `parallel` feature). The implementation is picked once, when a
//! [`BitmaskCodec`] is constructed, and both produce byte-identical output.

use super::{rle, string, transpose};
use crate::{CodecSettings, Error, settings::BackendChoice};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Masks shorter than this are always encoded by the scalar path.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 20;

/// Implementation strategy for run detection and transposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Single forward scan on the calling thread.
    #[default]
    Scalar,
    /// Chunked scan and transpose spread over the rayon thread pool.
    Parallel,
}

impl Backend {
    /// Whether this backend is compiled into the crate.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Scalar => true,
            Backend::Parallel => cfg!(feature = "parallel"),
        }
    }

    /// Probe the build and host once and pick the best available backend.
    pub fn detect() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        if Backend::Parallel.is_available() && cores > 1 {
            Backend::Parallel
        } else {
            Backend::Scalar
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Scalar => write!(f, "scalar"),
            Backend::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Backend::Scalar),
            "parallel" => Ok(Backend::Parallel),
            other => Err(Error::InvalidParameters(format!(
                "unknown codec backend '{}', expected 'scalar' or 'parallel'",
                other
            ))),
        }
    }
}

/// Bitmask codec bound to one [`Backend`].
///
/// The codec holds no mutable state, so a single instance can be shared
/// between threads.
///
/// # Example
/// ```
/// use encord_client::bitmask::{Backend, BitmaskCodec};
///
/// let codec = BitmaskCodec::with_backend(Backend::Scalar)?;
/// let mask = vec![0, 0, 1, 1, 1, 0, 1];
/// let encoded = codec.serialise(&mask);
/// assert_eq!(codec.deserialise(&encoded, mask.len())?, mask);
/// # Ok::<(), encord_client::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmaskCodec {
    backend: Backend,
    parallel_threshold: usize,
}

impl Default for BitmaskCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl BitmaskCodec {
    /// Create a codec using [`Backend::detect`].
    pub fn new() -> Self {
        Self {
            backend: Backend::detect(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Create a codec with an explicit backend.
    ///
    /// Fails with [`Error::MissingCapability`] when the backend is not
    /// compiled in.
    pub fn with_backend(backend: Backend) -> Result<Self, Error> {
        if !backend.is_available() {
            return Err(Error::MissingCapability(format!(
                "the '{}' codec backend requires the `parallel` feature",
                backend
            )));
        }
        Ok(Self {
            backend,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Build a codec from loaded settings.
    pub fn from_settings(settings: &CodecSettings) -> Result<Self, Error> {
        let codec = match settings.backend {
            BackendChoice::Auto => Self::new(),
            BackendChoice::Scalar => Self::with_backend(Backend::Scalar)?,
            BackendChoice::Parallel => Self::with_backend(Backend::Parallel)?,
        };
        let codec = codec.with_parallel_threshold(settings.parallel_threshold);
        debug!(
            "Bitmask codec using {} backend (parallel threshold {})",
            codec.backend, codec.parallel_threshold
        );
        Ok(codec)
    }

    /// Minimum mask length before the parallel backend splits work.
    pub fn with_parallel_threshold(self, threshold: usize) -> Self {
        Self {
            parallel_threshold: threshold.max(1),
            ..self
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Encode a raw bitmask into run lengths.
    pub fn mask_to_rle(&self, mask: &[u8]) -> Vec<u64> {
        match self.backend {
            #[cfg(feature = "parallel")]
            Backend::Parallel if mask.len() >= self.parallel_threshold => {
                parallel::mask_to_rle(mask, self.chunk_len(mask.len()))
            }
            _ => rle::mask_to_rle(mask),
        }
    }

    /// Transpose a row-major `rows × cols` buffer.
    pub fn transpose(&self, data: &[u8], shape: (usize, usize)) -> Result<Vec<u8>, Error> {
        match self.backend {
            #[cfg(feature = "parallel")]
            Backend::Parallel if data.len() >= self.parallel_threshold => {
                transpose::check_shape(data, shape)?;
                Ok(parallel::transpose(data, shape))
            }
            _ => transpose::transpose_bytearray(data, shape),
        }
    }

    /// Serialise a raw bitmask into a COCO RLE string.
    pub fn serialise(&self, mask: &[u8]) -> String {
        string::rle_to_string(&self.mask_to_rle(mask))
    }

    /// Deserialise a COCO RLE string into a raw bitmask of `length` bytes.
    pub fn deserialise(&self, encoded: &str, length: usize) -> Result<Vec<u8>, Error> {
        rle::rle_to_mask(&string::string_to_rle(encoded)?, length)
    }

    #[cfg(feature = "parallel")]
    fn chunk_len(&self, len: usize) -> usize {
        let threads = rayon::current_num_threads().max(1);
        len.div_ceil(threads).max(self.parallel_threshold.min(len)).max(1)
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use rayon::prelude::*;

    /// Runs found in one chunk as `(is_foreground, length)` pairs.
    fn scan_runs(chunk: &[u8]) -> Vec<(bool, u64)> {
        let mut runs = Vec::new();
        let Some(&first) = chunk.first() else {
            return runs;
        };
        let mut current = first != 0;
        let mut run = 0u64;
        for &v in chunk {
            let v = v != 0;
            if v != current {
                runs.push((current, run));
                run = 0;
                current = v;
            }
            run += 1;
        }
        runs.push((current, run));
        runs
    }

    pub(super) fn mask_to_rle(mask: &[u8], chunk_len: usize) -> Vec<u64> {
        let mut counts = Vec::new();
        let Some(&first) = mask.first() else {
            return counts;
        };

        let pieces: Vec<Vec<(bool, u64)>> = mask.par_chunks(chunk_len).map(scan_runs).collect();

        #[cfg(feature = "profiling")]
        let _span = crate::instrument::trace_span!("merge_runs", chunks = pieces.len()).entered();

        // Runs that straddle a chunk boundary are stitched back together.
        let mut current = first != 0;
        if current {
            counts.push(0);
        }
        let mut run = 0u64;
        for (value, len) in pieces.into_iter().flatten() {
            if value != current {
                counts.push(run);
                run = 0;
                current = value;
            }
            run += len;
        }
        counts.push(run);

        counts
    }

    pub(super) fn transpose(data: &[u8], (rows, cols): (usize, usize)) -> Vec<u8> {
        let mut out = vec![0u8; data.len()];
        if rows == 0 || cols == 0 {
            return out;
        }
        out.par_chunks_mut(rows)
            .enumerate()
            .for_each(|(col, dst)| {
                for (row, slot) in dst.iter_mut().enumerate() {
                    *slot = data[row * cols + col];
                }
            });
        out
    }
}
