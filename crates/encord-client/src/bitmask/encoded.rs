// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Bitmask annotations in the Encord label format.

use super::{deserialise_bitmask, rle_area, serialise_bitmask, string_to_rle};
use crate::Error;
use serde::{Deserialize, Serialize};

/// A bitmask as stored in Encord label rows.
///
/// `rle_string` is the COCO string of the row-major mask; `top` and `left`
/// locate the mask inside the frame and are zero for full-frame masks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedBitmask {
    pub top: u32,
    pub left: u32,
    pub height: u32,
    pub width: u32,
    pub rle_string: String,
}

impl EncodedBitmask {
    /// Parse either `{"bitmask": {...}}` or the bare object.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        let inner = value.get("bitmask").unwrap_or(value);
        Ok(serde_json::from_value(inner.clone())?)
    }

    /// Number of pixels covered by the mask.
    pub fn len(&self) -> usize {
        self.height as usize * self.width as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bitmask coordinates of an object instance.
///
/// Wraps an [`EncodedBitmask`] and converts to and from raw row-major
/// masks.
///
/// # Example
/// ```
/// use encord_client::bitmask::BitmaskCoordinates;
///
/// #[rustfmt::skip]
/// let mask = vec![
///     0, 1, 1,
///     0, 1, 0,
/// ];
/// let coords = BitmaskCoordinates::from_mask(&mask, 2, 3)?;
/// assert_eq!(coords.encoded().height, 2);
/// assert_eq!(coords.to_mask()?, mask);
/// # Ok::<(), encord_client::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitmaskCoordinates {
    encoded: EncodedBitmask,
}

impl BitmaskCoordinates {
    /// Encode a row-major `height × width` mask of 0/1 values.
    pub fn from_mask(mask: &[u8], height: u32, width: u32) -> Result<Self, Error> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidMask(format!(
                "bitmask must be 2-dimensional, got {}x{}",
                height, width
            )));
        }
        let expected = height as usize * width as usize;
        if mask.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: mask.len(),
            });
        }
        if let Some(pos) = mask.iter().position(|&v| v > 1) {
            return Err(Error::InvalidMask(format!(
                "bitmask values must be 0 or 1, found {} at index {}",
                mask[pos], pos
            )));
        }

        Ok(Self {
            encoded: EncodedBitmask {
                top: 0,
                left: 0,
                height,
                width,
                rle_string: serialise_bitmask(mask),
            },
        })
    }

    pub fn from_encoded(encoded: EncodedBitmask) -> Self {
        Self { encoded }
    }

    /// Parse the Encord bitmask dictionary format.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        EncodedBitmask::from_json(value).map(Self::from_encoded)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(&self.encoded)?)
    }

    pub fn encoded(&self) -> &EncodedBitmask {
        &self.encoded
    }

    pub fn into_encoded(self) -> EncodedBitmask {
        self.encoded
    }

    /// Decode into a row-major mask of `height * width` bytes.
    pub fn to_mask(&self) -> Result<Vec<u8>, Error> {
        deserialise_bitmask(&self.encoded.rle_string, self.encoded.len())
    }

    /// Number of foreground pixels.
    pub fn area(&self) -> Result<u64, Error> {
        Ok(rle_area(&string_to_rle(&self.encoded.rle_string)?))
    }
}
