// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Run-length encoding of raw bitmasks.
//!
//! Run lengths alternate between background and foreground, starting with
//! background. A mask that starts with foreground gets a leading zero-length
//! background run so that even indices are always background.

use crate::Error;

/// Encode a raw bitmask into run lengths.
///
/// Any non-zero byte is foreground. An empty mask yields an empty RLE.
///
/// # Example
/// ```
/// use encord_client::bitmask::mask_to_rle;
///
/// assert_eq!(mask_to_rle(&[0, 0, 1, 1, 1, 0, 1]), vec![2, 3, 1, 1]);
/// assert_eq!(mask_to_rle(&[1, 1, 0, 0]), vec![0, 2, 2]);
/// ```
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(len = mask.len())))]
pub fn mask_to_rle(mask: &[u8]) -> Vec<u64> {
    let mut counts = Vec::new();
    let Some(&first) = mask.first() else {
        return counts;
    };

    let mut current = first != 0;
    if current {
        counts.push(0);
    }

    let mut run = 0u64;
    for &v in mask {
        let v = v != 0;
        if v != current {
            counts.push(run);
            run = 0;
            current = v;
        }
        run += 1;
    }
    counts.push(run);

    counts
}

/// Decode run lengths into a raw bitmask of `size` bytes.
///
/// Run lengths covering fewer than `size` pixels leave the tail as
/// background. Run lengths covering more than `size` pixels fail with
/// [`Error::BufferOverflow`] before anything is written.
///
/// # Example
/// ```
/// use encord_client::bitmask::rle_to_mask;
///
/// let mask = rle_to_mask(&[2, 3, 1, 1], 7)?;
/// assert_eq!(mask, vec![0, 0, 1, 1, 1, 0, 1]);
/// # Ok::<(), encord_client::Error>(())
/// ```
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(runs = rle.len(), size = size)))]
pub fn rle_to_mask(rle: &[u64], size: usize) -> Result<Vec<u8>, Error> {
    let required = rle_len(rle).ok_or(Error::BufferOverflow {
        required: u64::MAX,
        size,
    })?;
    if required > size as u64 {
        return Err(Error::BufferOverflow { required, size });
    }
    if required < size as u64 {
        log::debug!(
            "RLE covers {} of {} pixels, padding tail with background",
            required,
            size
        );
    }

    let mut mask = vec![0u8; size];
    let mut pos = 0usize;
    for (i, &count) in rle.iter().enumerate() {
        let end = pos + count as usize;
        if i % 2 == 1 {
            mask[pos..end].fill(1);
        }
        pos = end;
    }

    Ok(mask)
}

/// Total number of pixels described by `rle`, or `None` on overflow.
pub fn rle_len(rle: &[u64]) -> Option<u64> {
    rle.iter().try_fold(0u64, |acc, &c| acc.checked_add(c))
}

/// Number of foreground pixels described by `rle`.
pub fn rle_area(rle: &[u64]) -> u64 {
    rle.iter().skip(1).step_by(2).sum()
}

/// Convert sorted, non-overlapping inclusive `(start, end)` ranges of
/// foreground indices into run lengths.
///
/// Runs in O(number of ranges). The trailing background run is not emitted.
///
/// # Example
/// ```
/// use encord_client::bitmask::ranges_to_rle_counts;
///
/// assert_eq!(ranges_to_rle_counts(&[(2, 4), (6, 6)])?, vec![2, 3, 1, 1]);
/// # Ok::<(), encord_client::Error>(())
/// ```
pub fn ranges_to_rle_counts(ranges: &[(u64, u64)]) -> Result<Vec<u64>, Error> {
    let mut counts = Vec::with_capacity(ranges.len() * 2);
    let mut next_free = 0u64;

    for &(start, end) in ranges {
        if end < start {
            return Err(Error::InvalidParameters(format!(
                "range ({}, {}) ends before it starts",
                start, end
            )));
        }
        if start < next_free {
            return Err(Error::InvalidParameters(format!(
                "range ({}, {}) overlaps or precedes the previous range",
                start, end
            )));
        }
        counts.push(start - next_free);
        counts.push(end - start + 1);
        next_free = end + 1;
    }

    Ok(counts)
}
