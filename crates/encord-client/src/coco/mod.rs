// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # COCO Interoperability
//!
//! Conversion between Encord bitmasks, COCO RLE objects and polygons.
//!
//! - [`CocoRle`] converts column-major COCO RLE objects to and from the
//!   row-major [`EncodedBitmask`](crate::bitmask::EncodedBitmask) form.
//! - [`ContourTracer`] turns binary masks into polygons with holes.
//! - [`rle_to_polygons_coordinates`] chains decoding, tracing and
//!   normalisation.
//!
//! Contour tracing needs the `contours` feature (enabled by default).
//! Without it [`ContourTracer::find_contours`] fails with
//! [`Error::MissingCapability`](crate::Error::MissingCapability).

mod contours;
mod convert;
mod types;

#[cfg(feature = "contours")]
pub use contours::ImageprocExtractor;
pub use contours::{
    Border, BorderKind, ChainApproximation, ContourExtractor, ContourTracer, MissingExtractor,
    assemble_polygons, default_extractor, find_contours,
};
pub use convert::{mask_to_polygons, rle_to_polygons_coordinates, rle_to_polygons_coordinates_with};
pub use types::{CocoCounts, CocoRle};
