// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Row-major ↔ column-major reordering of 2-D byte buffers.
//!
//! COCO stores masks in column-major (Fortran) order while masks are held in
//! memory row-major, so every COCO import or export passes through here.

use crate::Error;

/// Transpose a row-major `rows × cols` byte buffer.
///
/// Writes `out[col * rows + row] = data[row * cols + col]`. Transposing the
/// result with the shape `(cols, rows)` restores the input.
///
/// # Example
/// ```
/// use encord_client::bitmask::transpose_bytearray;
///
/// let t = transpose_bytearray(&[1, 2, 3, 4, 5, 6], (2, 3))?;
/// assert_eq!(t, vec![1, 4, 2, 5, 3, 6]);
/// # Ok::<(), encord_client::Error>(())
/// ```
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(rows = shape.0, cols = shape.1)))]
pub fn transpose_bytearray(data: &[u8], shape: (usize, usize)) -> Result<Vec<u8>, Error> {
    let (rows, cols) = shape;
    check_shape(data, shape)?;

    let mut out = vec![0u8; data.len()];
    for row in 0..rows {
        let src = &data[row * cols..(row + 1) * cols];
        for (col, &v) in src.iter().enumerate() {
            out[col * rows + row] = v;
        }
    }
    Ok(out)
}

pub(crate) fn check_shape(data: &[u8], (rows, cols): (usize, usize)) -> Result<(), Error> {
    let expected = rows.checked_mul(cols).ok_or_else(|| {
        Error::InvalidParameters(format!("shape ({}, {}) overflows usize", rows, cols))
    })?;
    if expected != data.len() {
        return Err(Error::ShapeMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_2x3() {
        let t = transpose_bytearray(&[1, 2, 3, 4, 5, 6], (2, 3)).unwrap();
        assert_eq!(t, vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_transpose_twice_is_identity() {
        let data: Vec<u8> = (0..35u8).collect();
        let once = transpose_bytearray(&data, (5, 7)).unwrap();
        assert_ne!(once, data);
        let twice = transpose_bytearray(&once, (7, 5)).unwrap();
        assert_eq!(twice, data);
    }

    #[test]
    fn test_transpose_single_row_and_column() {
        let data = vec![9, 8, 7];
        assert_eq!(transpose_bytearray(&data, (1, 3)).unwrap(), data);
        assert_eq!(transpose_bytearray(&data, (3, 1)).unwrap(), data);
    }

    #[test]
    fn test_transpose_empty() {
        assert!(transpose_bytearray(&[], (0, 4)).unwrap().is_empty());
        assert!(transpose_bytearray(&[], (4, 0)).unwrap().is_empty());
    }

    #[test]
    fn test_transpose_shape_mismatch() {
        match transpose_bytearray(&[1, 2, 3], (2, 2)) {
            Err(Error::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }
}
