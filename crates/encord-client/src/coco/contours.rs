// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Contour extraction from binary masks.
//!
//! Border following itself is delegated to a [`ContourExtractor`]; the
//! default one wraps `imageproc::contours` (Suzuki–Abe) and is only compiled
//! with the `contours` feature. This module turns the traced borders into
//! polygons using a two-level hierarchy: every outer border starts a polygon
//! and the holes whose direct parent is that border become its inner rings.
//! Foreground islands inside a hole are outer borders too, so they start
//! polygons of their own.

use crate::{CodecSettings, Error, Polygon, Ring};
use serde::{Deserialize, Serialize};

/// How traced borders are compressed into rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainApproximation {
    /// Keep only the end points of horizontal, vertical and diagonal runs.
    #[default]
    Simple,
    /// Keep every boundary pixel.
    None,
}

/// Whether a border encloses foreground or a hole in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

/// A traced border in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Border {
    /// Boundary pixels `(x, y)` in tracing order.
    pub points: Vec<(u32, u32)>,
    pub kind: BorderKind,
    /// Index of the enclosing border, if any.
    pub parent: Option<usize>,
}

/// Traces the borders of a row-major binary mask.
pub trait ContourExtractor: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Trace every border of `mask`. Non-zero bytes are foreground.
    fn extract(&self, mask: &[u8], width: u32, height: u32) -> Result<Vec<Border>, Error>;
}

/// Border following provided by `imageproc`.
#[cfg(feature = "contours")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocExtractor;

#[cfg(feature = "contours")]
impl ContourExtractor for ImageprocExtractor {
    fn name(&self) -> &'static str {
        "imageproc"
    }

    fn extract(&self, mask: &[u8], width: u32, height: u32) -> Result<Vec<Border>, Error> {
        use imageproc::contours::{BorderType, find_contours};

        check_dimensions(mask, width, height)?;
        let image = padded_image(mask, width, height)?;

        // Points are shifted back out of the one pixel background frame.
        let borders = find_contours::<i32>(&image)
            .into_iter()
            .map(|contour| Border {
                points: contour
                    .points
                    .iter()
                    .map(|p| ((p.x - 1) as u32, (p.y - 1) as u32))
                    .collect(),
                kind: match contour.border_type {
                    BorderType::Outer => BorderKind::Outer,
                    BorderType::Hole => BorderKind::Hole,
                },
                parent: contour.parent,
            })
            .collect();
        Ok(borders)
    }
}

/// Copy `mask` into a binary image with a one pixel background frame.
///
/// Border following only starts outer borders after a background pixel, so
/// regions touching the image edge need the frame to be traced.
#[cfg(feature = "contours")]
fn padded_image(mask: &[u8], width: u32, height: u32) -> Result<image::GrayImage, Error> {
    let too_large = || Error::InvalidMask(format!("cannot build a {}x{} image", width, height));
    let padded_width = width.checked_add(2).ok_or_else(too_large)?;
    let padded_height = height.checked_add(2).ok_or_else(too_large)?;

    let mut image = image::GrayImage::new(padded_width, padded_height);
    if width == 0 {
        return Ok(image);
    }
    for (y, row) in mask.chunks_exact(width as usize).enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v != 0 {
                image.put_pixel(x as u32 + 1, y as u32 + 1, image::Luma([255]));
            }
        }
    }
    Ok(image)
}

/// Stand-in used when no tracing backend is compiled in.
///
/// Every call fails with [`Error::MissingCapability`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingExtractor;

impl ContourExtractor for MissingExtractor {
    fn name(&self) -> &'static str {
        "missing"
    }

    fn extract(&self, _mask: &[u8], _width: u32, _height: u32) -> Result<Vec<Border>, Error> {
        Err(Error::MissingCapability(
            "contour tracing requires the `contours` feature (image + imageproc)".to_owned(),
        ))
    }
}

/// The best extractor compiled into this build.
pub fn default_extractor() -> Box<dyn ContourExtractor> {
    #[cfg(feature = "contours")]
    {
        Box::new(ImageprocExtractor)
    }
    #[cfg(not(feature = "contours"))]
    {
        Box::new(MissingExtractor)
    }
}

/// Mask to polygon conversion with a fixed extractor and approximation.
///
/// # Example
/// ```
/// use encord_client::coco::ContourTracer;
///
/// #[rustfmt::skip]
/// let mask = vec![
///     0, 0, 0, 0,
///     0, 1, 1, 0,
///     0, 1, 1, 0,
///     0, 0, 0, 0,
/// ];
/// let polygons = ContourTracer::new().find_contours(&mask, 4, 4)?;
/// assert_eq!(polygons.len(), 1);
/// assert_eq!(polygons[0].len(), 1);
/// # Ok::<(), encord_client::Error>(())
/// ```
pub struct ContourTracer {
    extractor: Box<dyn ContourExtractor>,
    approximation: ChainApproximation,
}

impl Default for ContourTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContourTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContourTracer")
            .field("extractor", &self.extractor.name())
            .field("approximation", &self.approximation)
            .finish()
    }
}

impl ContourTracer {
    pub fn new() -> Self {
        Self {
            extractor: default_extractor(),
            approximation: ChainApproximation::Simple,
        }
    }

    pub fn with_extractor<E: ContourExtractor + 'static>(extractor: E) -> Self {
        Self {
            extractor: Box::new(extractor),
            approximation: ChainApproximation::Simple,
        }
    }

    pub fn from_settings(settings: &CodecSettings) -> Self {
        Self::new().with_approximation(settings.approximation)
    }

    pub fn with_approximation(self, approximation: ChainApproximation) -> Self {
        Self {
            approximation,
            ..self
        }
    }

    pub fn approximation(&self) -> ChainApproximation {
        self.approximation
    }

    /// Trace a row-major `width × height` mask into pixel-space polygons.
    #[cfg_attr(feature = "profiling", tracing::instrument(skip(self, mask), fields(extractor = self.extractor.name())))]
    pub fn find_contours(&self, mask: &[u8], width: u32, height: u32) -> Result<Vec<Polygon>, Error> {
        check_dimensions(mask, width, height)?;
        let borders = self.extractor.extract(mask, width, height)?;
        let polygons = assemble_polygons(&borders, self.approximation);
        log::debug!(
            "Traced {} borders into {} polygons with {}",
            borders.len(),
            polygons.len(),
            self.extractor.name()
        );
        Ok(polygons)
    }
}

/// Trace a row-major mask with the default extractor and simple
/// approximation.
pub fn find_contours(mask: &[u8], width: u32, height: u32) -> Result<Vec<Polygon>, Error> {
    ContourTracer::new().find_contours(mask, width, height)
}

/// Group traced borders into polygons: one per outer border, followed by the
/// holes directly inside it.
pub fn assemble_polygons(borders: &[Border], approximation: ChainApproximation) -> Vec<Polygon> {
    let mut holes: Vec<Vec<usize>> = vec![Vec::new(); borders.len()];
    for (i, border) in borders.iter().enumerate() {
        if border.kind != BorderKind::Hole {
            continue;
        }
        match border.parent {
            Some(parent) if borders.get(parent).map(|b| b.kind) == Some(BorderKind::Outer) => {
                holes[parent].push(i)
            }
            _ => log::warn!("Dropping hole border {} without an outer parent", i),
        }
    }

    borders
        .iter()
        .enumerate()
        .filter(|(_, border)| border.kind == BorderKind::Outer)
        .map(|(i, border)| {
            std::iter::once(border)
                .chain(holes[i].iter().map(|&h| &borders[h]))
                .map(|b| to_ring(&b.points, approximation))
                .collect()
        })
        .collect()
}

fn to_ring(points: &[(u32, u32)], approximation: ChainApproximation) -> Ring {
    let points = match approximation {
        ChainApproximation::Simple => simplify_chain(points),
        ChainApproximation::None => points.to_vec(),
    };
    points
        .iter()
        .flat_map(|&(x, y)| [x as f64, y as f64])
        .collect()
}

/// Drop points lying strictly inside a straight run of a closed chain.
fn simplify_chain(points: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut chain: Vec<(i64, i64)> = points.iter().map(|&(x, y)| (x as i64, y as i64)).collect();
    chain.dedup();
    if chain.len() > 1 && chain.first() == chain.last() {
        chain.pop();
    }

    let n = chain.len();
    if n < 3 {
        return chain.iter().map(|&(x, y)| (x as u32, y as u32)).collect();
    }

    (0..n)
        .filter(|&i| {
            let prev = chain[(i + n - 1) % n];
            let cur = chain[i];
            let next = chain[(i + 1) % n];
            !continues_straight(prev, cur, next)
        })
        .map(|i| (chain[i].0 as u32, chain[i].1 as u32))
        .collect()
}

fn continues_straight(a: (i64, i64), b: (i64, i64), c: (i64, i64)) -> bool {
    let (d1x, d1y) = (b.0 - a.0, b.1 - a.1);
    let (d2x, d2y) = (c.0 - b.0, c.1 - b.1);
    d1x * d2y - d1y * d2x == 0 && d1x * d2x + d1y * d2y > 0
}

fn check_dimensions(mask: &[u8], width: u32, height: u32) -> Result<(), Error> {
    let expected = width as usize * height as usize;
    if mask.len() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            actual: mask.len(),
        });
    }
    Ok(())
}
