// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # Encord Bitmask Client Library
//!
//! Encoding and decoding of the bitmask annotations used by the Encord
//! platform, and conversion of those masks into normalised polygons.
//!
//! ## Features
//!
//! - **COCO RLE codec**: Serialise raw binary masks to COCO compressed RLE
//!   strings and back, with a scalar and a rayon-parallel backend
//! - **Transposition**: Convert between row-major and column-major layouts
//! - **Contours**: Trace masks into polygons with holes and normalise their
//!   coordinates to `[0, 1]`
//! - **COCO objects**: Read and write COCO `{"size", "counts"}` RLE objects
//! - **Settings**: Layered codec configuration from files and environment
//!
//! ## Quick Start
//!
//! ```rust
//! use encord_client::{Error, bitmask::BitmaskCodec, coco::rle_to_polygons_coordinates};
//!
//! # fn main() -> Result<(), Error> {
//! let (height, width) = (16, 16);
//! let mut mask = vec![0u8; height * width];
//! for y in 4..12 {
//!     for x in 4..12 {
//!         mask[y * width + x] = 1;
//!     }
//! }
//!
//! let codec = BitmaskCodec::new();
//! let rle = codec.serialise(&mask);
//! assert_eq!(codec.deserialise(&rle, mask.len())?, mask);
//!
//! let polygons = rle_to_polygons_coordinates(&rle, height as u32, width as u32)?;
//! assert_eq!(polygons.polygons.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional Features
//!
//! - `parallel` (default): rayon backend for large masks
//! - `contours` (default): contour tracing through `imageproc`
//! - `profiling`: `tracing` spans around the codec entry points

pub mod bitmask;
pub mod coco;
mod coordinates;
mod error;
pub mod instrument;
mod settings;

pub use crate::{
    coco::ChainApproximation,
    coordinates::{
        PointCoordinate, Polygon, PolygonCoordinates, Ring, denormalize_polygons,
        normalize_polygons,
    },
    error::Error,
    settings::{BackendChoice, CodecSettings},
};
