// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use super::ContourTracer;
use crate::{Error, Polygon, PolygonCoordinates, bitmask::BitmaskCodec, normalize_polygons};

/// Trace a row-major mask and normalise the polygons to `[0, 1]`.
pub fn mask_to_polygons(
    mask: &[u8],
    height: u32,
    width: u32,
    tracer: &ContourTracer,
) -> Result<Vec<Polygon>, Error> {
    let mut polygons = tracer.find_contours(mask, width, height)?;
    normalize_polygons(&mut polygons, width, height)?;
    Ok(polygons)
}

/// Convert an Encord RLE string of a `height × width` mask into normalised
/// polygon coordinates.
///
/// # Example
/// ```
/// use encord_client::{bitmask::serialise_bitmask, coco::rle_to_polygons_coordinates};
///
/// let mut mask = vec![0u8; 8 * 8];
/// for y in 2..6 {
///     for x in 2..6 {
///         mask[y * 8 + x] = 1;
///     }
/// }
/// let coords = rle_to_polygons_coordinates(&serialise_bitmask(&mask), 8, 8)?;
/// assert_eq!(coords.polygons.len(), 1);
/// assert!(coords.values().iter().all(|p| (0.0..=1.0).contains(&p.x)));
/// # Ok::<(), encord_client::Error>(())
/// ```
pub fn rle_to_polygons_coordinates(
    rle_string: &str,
    height: u32,
    width: u32,
) -> Result<PolygonCoordinates, Error> {
    rle_to_polygons_coordinates_with(
        rle_string,
        height,
        width,
        &BitmaskCodec::new(),
        &ContourTracer::new(),
    )
}

#[cfg_attr(feature = "profiling", tracing::instrument(skip(rle_string, codec, tracer)))]
pub fn rle_to_polygons_coordinates_with(
    rle_string: &str,
    height: u32,
    width: u32,
    codec: &BitmaskCodec,
    tracer: &ContourTracer,
) -> Result<PolygonCoordinates, Error> {
    let len = (height as usize)
        .checked_mul(width as usize)
        .ok_or_else(|| Error::InvalidParameters(format!("{}x{} mask is too large", height, width)))?;
    let mask = codec.deserialise(rle_string, len)?;
    let polygons = mask_to_polygons(&mask, height, width, tracer)?;
    PolygonCoordinates::from_polygons_list(&polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bitmask::serialise_bitmask,
        coco::{Border, BorderKind, ContourExtractor},
    };

    struct Frame;

    impl ContourExtractor for Frame {
        fn name(&self) -> &'static str {
            "frame"
        }

        fn extract(&self, _mask: &[u8], w: u32, h: u32) -> Result<Vec<Border>, Error> {
            Ok(vec![Border {
                points: vec![(0, 0), (0, h - 1), (w - 1, h - 1), (w - 1, 0)],
                kind: BorderKind::Outer,
                parent: None,
            }])
        }
    }

    #[test]
    fn test_mask_to_polygons_normalises() {
        let tracer = ContourTracer::with_extractor(Frame);
        let polygons = mask_to_polygons(&[1; 20], 4, 5, &tracer).unwrap();
        assert_eq!(polygons, vec![vec![vec![0.0, 0.0, 0.0, 0.75, 0.8, 0.75, 0.8, 0.0]]]);
    }

    #[test]
    fn test_rle_with_custom_tracer() {
        let tracer = ContourTracer::with_extractor(Frame);
        let coords = rle_to_polygons_coordinates_with(
            &serialise_bitmask(&[1; 4]),
            2,
            2,
            &BitmaskCodec::default(),
            &tracer,
        )
        .unwrap();
        assert_eq!(coords.values().len(), 4);
        assert_eq!(coords.values()[2].x, 0.5);
    }

    #[test]
    fn test_rle_too_long_for_shape() {
        let result = rle_to_polygons_coordinates_with(
            &serialise_bitmask(&[1; 10]),
            2,
            2,
            &BitmaskCodec::default(),
            &ContourTracer::with_extractor(Frame),
        );
        assert!(matches!(result, Err(Error::BufferOverflow { .. })));
    }

    #[cfg(feature = "contours")]
    #[test]
    fn test_empty_mask_has_no_polygons() {
        let coords = rle_to_polygons_coordinates(&serialise_bitmask(&[0; 16]), 4, 4).unwrap();
        assert!(coords.is_empty());
    }
}
