// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! End-to-end tests for the bitmask codec and polygon extraction.

use encord_client::{
    Error,
    bitmask::{
        Backend, BitmaskCodec, deserialise_bitmask, mask_to_rle, rle_to_mask, rle_to_string,
        serialise_bitmask, string_to_rle, transpose_bytearray,
    },
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_mask(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let density = rng.gen_range(0.0..=1.0);
    (0..len).map(|_| rng.gen_bool(density) as u8).collect()
}

fn codecs() -> Vec<BitmaskCodec> {
    let mut codecs = vec![BitmaskCodec::with_backend(Backend::Scalar).unwrap()];
    if Backend::Parallel.is_available() {
        codecs.push(
            BitmaskCodec::with_backend(Backend::Parallel)
                .unwrap()
                .with_parallel_threshold(16),
        );
    }
    codecs
}

#[test]
fn test_random_masks_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for codec in codecs() {
        for _ in 0..200 {
            let len = rng.gen_range(0..2048);
            let mask = random_mask(&mut rng, len);
            let encoded = codec.serialise(&mask);
            assert_eq!(
                codec.deserialise(&encoded, len).unwrap(),
                mask,
                "backend {}",
                codec.backend()
            );
        }
    }
}

#[test]
fn test_run_lengths_cover_mask() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let len = rng.gen_range(1..4096);
        let mask = random_mask(&mut rng, len);
        let rle = mask_to_rle(&mask);

        assert_eq!(rle.iter().sum::<u64>(), len as u64);
        assert!(rle.iter().skip(1).all(|&c| c > 0), "only the first run may be empty");
        let foreground: u64 = rle.iter().skip(1).step_by(2).sum();
        assert_eq!(foreground, mask.iter().filter(|&&v| v != 0).count() as u64);
    }
}

#[test]
fn test_counts_string_roundtrip() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let n = rng.gen_range(0..32);
        let counts: Vec<u64> = (0..n)
            .map(|_| match rng.gen_range(0..3) {
                0 => rng.gen_range(0..32),
                1 => rng.gen_range(0..1_000_000),
                _ => rng.r#gen::<u64>(),
            })
            .collect();
        let s = rle_to_string(&counts);
        assert!(s.bytes().all(|b| (48..48 + 64).contains(&b)));
        assert_eq!(string_to_rle(&s).unwrap(), counts);
    }
}

#[test]
fn test_transpose_involution() {
    let mut rng = StdRng::seed_from_u64(11);
    for codec in codecs() {
        for _ in 0..50 {
            let rows = rng.gen_range(0..40);
            let cols = rng.gen_range(0..40);
            let data: Vec<u8> = (0..rows * cols).map(|_| rng.r#gen()).collect();
            let t = codec.transpose(&data, (rows, cols)).unwrap();
            assert_eq!(codec.transpose(&t, (cols, rows)).unwrap(), data);
        }
    }
}

#[test]
fn test_known_vectors() {
    assert_eq!(mask_to_rle(&[0, 0, 1, 1, 1, 0, 1]), vec![2, 3, 1, 1]);
    assert_eq!(mask_to_rle(&[1, 1, 0, 0]), vec![0, 2, 2]);
    assert_eq!(
        transpose_bytearray(&[1, 2, 3, 4, 5, 6], (2, 3)).unwrap(),
        vec![1, 4, 2, 5, 3, 6]
    );
    assert_eq!(rle_to_mask(&[2, 3, 1, 1], 7).unwrap(), vec![0, 0, 1, 1, 1, 0, 1]);
}

#[test]
fn test_short_rle_pads_long_rle_fails() {
    assert_eq!(rle_to_mask(&[1, 1], 4).unwrap(), vec![0, 1, 0, 0]);
    assert!(matches!(
        rle_to_mask(&[3, 3], 4),
        Err(Error::BufferOverflow { required: 6, size: 4 })
    ));
    assert!(matches!(
        deserialise_bitmask(&serialise_bitmask(&[1; 9]), 8),
        Err(Error::BufferOverflow { .. })
    ));
}

#[test]
fn test_malformed_string() {
    assert!(matches!(string_to_rle("5 5"), Err(Error::MalformedRle(_))));
    assert!(matches!(deserialise_bitmask("@", 4), Err(Error::MalformedRle(_))));
}

#[cfg(feature = "contours")]
mod polygons {
    use encord_client::{
        bitmask::serialise_bitmask,
        coco::{ChainApproximation, ContourTracer, rle_to_polygons_coordinates},
    };

    fn square_with_hole() -> Vec<u8> {
        let mut mask = vec![0u8; 100 * 100];
        for y in 25..75 {
            for x in 25..75 {
                mask[y * 100 + x] = if (40..60).contains(&x) && (40..60).contains(&y) {
                    0
                } else {
                    1
                };
            }
        }
        mask
    }

    #[test]
    fn test_square_with_hole_end_to_end() {
        let rle = serialise_bitmask(&square_with_hole());
        let coords = rle_to_polygons_coordinates(&rle, 100, 100).unwrap();

        assert_eq!(coords.polygons.len(), 1);
        assert_eq!(coords.polygons[0].len(), 2);
        for p in coords.polygons.iter().flatten().flatten() {
            assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
        }

        let outer = coords.values();
        assert_eq!(outer.len(), 4);
        for p in outer {
            assert!(p.x == 0.25 || p.x == 0.74, "x = {}", p.x);
            assert!(p.y == 0.25 || p.y == 0.74, "y = {}", p.y);
        }
    }

    #[test]
    fn test_full_chain_keeps_every_boundary_pixel() {
        let simple = ContourTracer::new();
        let full = ContourTracer::new().with_approximation(ChainApproximation::None);
        let mask = square_with_hole();

        let a = simple.find_contours(&mask, 100, 100).unwrap();
        let b = full.find_contours(&mask, 100, 100).unwrap();
        assert_eq!(a.len(), b.len());
        assert!(b[0][0].len() > a[0][0].len());
    }

    #[test]
    fn test_all_background_and_all_foreground() {
        let empty = rle_to_polygons_coordinates(&serialise_bitmask(&[0; 100]), 10, 10).unwrap();
        assert!(empty.is_empty());

        let full = rle_to_polygons_coordinates(&serialise_bitmask(&[1; 100]), 10, 10).unwrap();
        assert_eq!(full.polygons.len(), 1);
        assert_eq!(full.polygons[0].len(), 1);
        assert_eq!(full.values().len(), 4);
    }
}
