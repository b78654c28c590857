// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    Error,
    bitmask::{BitmaskCodec, EncodedBitmask, rle_area, rle_to_mask, rle_to_string, string_to_rle},
};
use serde::{Deserialize, Serialize};

/// Run lengths of a COCO RLE, either as a plain list or as the compressed
/// string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CocoCounts {
    Uncompressed(Vec<u64>),
    Compressed(String),
}

impl CocoCounts {
    /// Run lengths, decoding the compressed form if needed.
    pub fn to_vec(&self) -> Result<Vec<u64>, Error> {
        match self {
            CocoCounts::Uncompressed(counts) => Ok(counts.clone()),
            CocoCounts::Compressed(s) => string_to_rle(s),
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, CocoCounts::Compressed(_))
    }
}

/// A COCO RLE object: `{"size": [height, width], "counts": ...}`.
///
/// COCO masks are column-major, unlike the row-major masks stored by
/// Encord, so conversions go through a transpose.
///
/// # Example
/// ```
/// use encord_client::coco::{CocoCounts, CocoRle};
///
/// // 2×3 mask, column-major: column 0 = [0, 1], column 1 = [1, 1], column 2 = [0, 0].
/// let coco = CocoRle::new(2, 3, CocoCounts::Uncompressed(vec![1, 3, 2]));
/// let bitmask = coco.to_encord()?;
/// assert_eq!(bitmask.height, 2);
/// assert_eq!(bitmask.width, 3);
///
/// let back = CocoRle::from_encord(&bitmask)?;
/// assert_eq!(back.counts.to_vec()?, vec![1, 3, 2]);
/// # Ok::<(), encord_client::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocoRle {
    /// `[height, width]`.
    pub size: [u32; 2],
    pub counts: CocoCounts,
}

impl CocoRle {
    pub fn new(height: u32, width: u32, counts: CocoCounts) -> Self {
        Self {
            size: [height, width],
            counts,
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn height(&self) -> u32 {
        self.size[0]
    }

    pub fn width(&self) -> u32 {
        self.size[1]
    }

    /// Convert to a full-frame Encord bitmask with the default codec.
    pub fn to_encord(&self) -> Result<EncodedBitmask, Error> {
        self.to_encord_with(&BitmaskCodec::new())
    }

    /// Convert to a full-frame Encord bitmask.
    ///
    /// The column-major COCO mask is decoded, transposed to row-major and
    /// re-encoded.
    pub fn to_encord_with(&self, codec: &BitmaskCodec) -> Result<EncodedBitmask, Error> {
        let (height, width) = (self.height(), self.width());
        let len = pixel_count(height, width)?;
        let column_major = rle_to_mask(&self.counts.to_vec()?, len)?;
        let row_major = codec.transpose(&column_major, (width as usize, height as usize))?;

        Ok(EncodedBitmask {
            top: 0,
            left: 0,
            height,
            width,
            rle_string: codec.serialise(&row_major),
        })
    }

    /// Convert an Encord bitmask into a compressed COCO RLE.
    pub fn from_encord(bitmask: &EncodedBitmask) -> Result<Self, Error> {
        Self::from_encord_with(bitmask, &BitmaskCodec::new())
    }

    pub fn from_encord_with(bitmask: &EncodedBitmask, codec: &BitmaskCodec) -> Result<Self, Error> {
        if bitmask.top != 0 || bitmask.left != 0 {
            log::debug!(
                "Ignoring bitmask offset ({}, {}) in COCO conversion",
                bitmask.top,
                bitmask.left
            );
        }
        let len = pixel_count(bitmask.height, bitmask.width)?;
        let row_major = codec.deserialise(&bitmask.rle_string, len)?;
        let column_major = codec.transpose(
            &row_major,
            (bitmask.height as usize, bitmask.width as usize),
        )?;

        Ok(Self::new(
            bitmask.height,
            bitmask.width,
            CocoCounts::Compressed(codec.serialise(&column_major)),
        ))
    }

    /// The same RLE with counts in list form.
    pub fn uncompressed(&self) -> Result<Self, Error> {
        Ok(Self::new(
            self.height(),
            self.width(),
            CocoCounts::Uncompressed(self.counts.to_vec()?),
        ))
    }

    /// The same RLE with counts in string form.
    pub fn compressed(&self) -> Result<Self, Error> {
        Ok(Self::new(
            self.height(),
            self.width(),
            CocoCounts::Compressed(rle_to_string(&self.counts.to_vec()?)),
        ))
    }

    /// Number of foreground pixels.
    pub fn area(&self) -> Result<u64, Error> {
        Ok(rle_area(&self.counts.to_vec()?))
    }
}

fn pixel_count(height: u32, width: u32) -> Result<usize, Error> {
    (height as usize).checked_mul(width as usize).ok_or_else(|| {
        Error::InvalidParameters(format!("mask of {}x{} pixels is too large", height, width))
    })
}
