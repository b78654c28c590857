// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # Bitmask Serialisation
//!
//! Conversion between dense binary masks and the COCO compressed RLE
//! strings used by Encord for bitmask annotations.
//!
//! ```text
//! raw mask ──mask_to_rle──▶ run lengths ──rle_to_string──▶ COCO string
//! raw mask ◀─rle_to_mask─── run lengths ◀─string_to_rle─── COCO string
//! ```
//!
//! Masks are row-major byte buffers where any non-zero byte is foreground.
//! COCO itself is column-major; use [`transpose_bytearray`] when exchanging
//! masks with COCO tooling.
//!
//! ## Example
//!
//! ```rust
//! use encord_client::bitmask::{deserialise_bitmask, serialise_bitmask};
//!
//! let mask = vec![0, 0, 1, 1, 1, 0, 1];
//! let encoded = serialise_bitmask(&mask);
//! assert_eq!(deserialise_bitmask(&encoded, mask.len())?, mask);
//! # Ok::<(), encord_client::Error>(())
//! ```

mod codec;
mod encoded;
mod rle;
mod string;
mod transpose;

use std::collections::BTreeSet;

pub use codec::{Backend, BitmaskCodec, DEFAULT_PARALLEL_THRESHOLD};
pub use encoded::{BitmaskCoordinates, EncodedBitmask};
pub use rle::{mask_to_rle, ranges_to_rle_counts, rle_area, rle_len, rle_to_mask};
pub use string::{rle_to_string, string_to_rle};
pub use transpose::transpose_bytearray;

use crate::Error;

/// Serialise a raw bitmask into a COCO RLE string.
pub fn serialise_bitmask(mask: &[u8]) -> String {
    rle_to_string(&mask_to_rle(mask))
}

/// Deserialise a COCO RLE string into a raw bitmask of `length` bytes.
pub fn deserialise_bitmask(encoded: &str, length: usize) -> Result<Vec<u8>, Error> {
    rle_to_mask(&string_to_rle(encoded)?, length)
}

/// Indices of all foreground pixels described by a COCO RLE string.
///
/// # Example
/// ```
/// use encord_client::bitmask::rle_string_to_points;
///
/// let points = rle_string_to_points("231N")?;
/// assert_eq!(points.into_iter().collect::<Vec<_>>(), vec![2, 3, 4, 6]);
/// # Ok::<(), encord_client::Error>(())
/// ```
pub fn rle_string_to_points(encoded: &str) -> Result<BTreeSet<u64>, Error> {
    let mut points = BTreeSet::new();
    let mut index = 0u64;
    for (i, count) in string_to_rle(encoded)?.into_iter().enumerate() {
        let end = index
            .checked_add(count)
            .ok_or_else(|| Error::MalformedRle("run lengths overflow u64".to_owned()))?;
        if i % 2 == 1 {
            points.extend(index..end);
        }
        index = end;
    }
    Ok(points)
}
