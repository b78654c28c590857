// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Polygon geometry and coordinate normalisation.
//!
//! ## Coordinate Systems
//!
//! - **Pixel**: `x` in `[0, width]`, `y` in `[0, height]`, top-left origin.
//! - **Normalised**: `x / width`, `y / height`, in `[0, 1]`. This is what
//!   Encord stores, so labels do not depend on image resolution.

use crate::Error;
use serde::{Deserialize, Serialize};

/// One closed boundary as flat coordinates `[x1, y1, x2, y2, ...]`.
pub type Ring = Vec<f64>;

/// An outer ring followed by the rings of its holes.
pub type Polygon = Vec<Ring>;

/// Divide every `x` by `width` and every `y` by `height`, in place.
///
/// Ring order and winding are left untouched.
///
/// # Example
/// ```
/// use encord_client::normalize_polygons;
///
/// let mut polygons = vec![vec![vec![0.0, 0.0, 50.0, 0.0, 50.0, 20.0]]];
/// normalize_polygons(&mut polygons, 100, 40)?;
/// assert_eq!(polygons[0][0], vec![0.0, 0.0, 0.5, 0.0, 0.5, 0.5]);
/// # Ok::<(), encord_client::Error>(())
/// ```
pub fn normalize_polygons(polygons: &mut [Polygon], width: u32, height: u32) -> Result<(), Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidParameters(format!(
            "cannot normalise against a {}x{} image",
            width, height
        )));
    }
    let w = width as f64;
    let h = height as f64;
    for ring in polygons.iter_mut().flatten() {
        for pair in ring.chunks_exact_mut(2) {
            pair[0] /= w;
            pair[1] /= h;
        }
    }
    Ok(())
}

/// Multiply normalised coordinates back into pixel space, in place.
pub fn denormalize_polygons(polygons: &mut [Polygon], width: u32, height: u32) {
    let w = width as f64;
    let h = height as f64;
    for ring in polygons.iter_mut().flatten() {
        for pair in ring.chunks_exact_mut(2) {
            pair[0] *= w;
            pair[1] *= h;
        }
    }
}

/// A single normalised point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PointCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Polygon coordinates as nested points: polygons → rings → points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonCoordinates {
    pub polygons: Vec<Vec<Vec<PointCoordinate>>>,
}

impl PolygonCoordinates {
    /// Build from flat rings. Every ring must hold an even number of values.
    pub fn from_polygons_list(polygons: &[Polygon]) -> Result<Self, Error> {
        let polygons = polygons
            .iter()
            .map(|polygon| {
                polygon
                    .iter()
                    .map(|ring| {
                        if ring.len() % 2 != 0 {
                            return Err(Error::InvalidParameters(format!(
                                "ring has an odd number of coordinates ({})",
                                ring.len()
                            )));
                        }
                        Ok(ring
                            .chunks_exact(2)
                            .map(|p| PointCoordinate::new(p[0], p[1]))
                            .collect())
                    })
                    .collect::<Result<Vec<_>, Error>>()
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self { polygons })
    }

    /// Flatten back into rings of `[x1, y1, x2, y2, ...]`.
    pub fn to_polygons_list(&self) -> Vec<Polygon> {
        self.polygons
            .iter()
            .map(|polygon| {
                polygon
                    .iter()
                    .map(|ring| ring.iter().flat_map(|p| [p.x, p.y]).collect())
                    .collect()
            })
            .collect()
    }

    /// Outer ring of the first polygon, or an empty slice.
    pub fn values(&self) -> &[PointCoordinate] {
        self.polygons
            .first()
            .and_then(|polygon| polygon.first())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bounds() {
        let mut polygons = vec![
            vec![
                vec![0.0, 0.0, 640.0, 0.0, 640.0, 480.0, 0.0, 480.0],
                vec![100.0, 100.0, 200.0, 100.0, 200.0, 200.0],
            ],
            vec![vec![320.0, 240.0]],
        ];
        normalize_polygons(&mut polygons, 640, 480).unwrap();

        for v in polygons.iter().flatten().flatten() {
            assert!((0.0..=1.0).contains(v), "{} out of range", v);
        }
        assert_eq!(polygons[1][0], vec![0.5, 0.5]);
        assert!((polygons[0][1][0] - 100.0 / 640.0).abs() < 1e-12);
        assert!((polygons[0][1][1] - 100.0 / 480.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_preserves_structure() {
        let mut polygons = vec![vec![vec![4.0, 2.0, 2.0, 4.0, 0.0, 0.0], vec![1.0, 1.0]]];
        normalize_polygons(&mut polygons, 4, 4).unwrap();
        assert_eq!(
            polygons,
            vec![vec![vec![1.0, 0.5, 0.5, 1.0, 0.0, 0.0], vec![0.25, 0.25]]]
        );
    }

    #[test]
    fn test_normalize_zero_dimensions() {
        let mut polygons = vec![vec![vec![1.0, 1.0]]];
        assert!(normalize_polygons(&mut polygons, 0, 10).is_err());
        assert!(normalize_polygons(&mut polygons, 10, 0).is_err());
    }

    #[test]
    fn test_denormalize_inverts_normalize() {
        let original = vec![vec![vec![10.0, 20.0, 30.0, 40.0]]];
        let mut polygons = original.clone();
        normalize_polygons(&mut polygons, 50, 80).unwrap();
        denormalize_polygons(&mut polygons, 50, 80);
        for (a, b) in polygons[0][0].iter().zip(&original[0][0]) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_polygon_coordinates_from_list() {
        let coords = PolygonCoordinates::from_polygons_list(&[vec![
            vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            vec![0.5, 0.5],
        ]])
        .unwrap();
        assert_eq!(coords.polygons.len(), 1);
        assert_eq!(coords.polygons[0].len(), 2);
        assert_eq!(coords.values().len(), 3);
        assert_eq!(coords.values()[1], PointCoordinate::new(1.0, 0.0));
        assert_eq!(
            coords.to_polygons_list(),
            vec![vec![vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0], vec![0.5, 0.5]]]
        );
    }

    #[test]
    fn test_polygon_coordinates_odd_ring() {
        assert!(PolygonCoordinates::from_polygons_list(&[vec![vec![0.0, 1.0, 2.0]]]).is_err());
        assert!(PolygonCoordinates::default().values().is_empty());
    }
}
