// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! COCO compressed RLE string encoding.
//!
//! Each run length is written as a signed variable-length integer made of
//! 5-bit groups, least significant group first. A character is
//! `group + 48`, with bit `0x20` of the group set when another group
//! follows. From the fourth value onwards the value stored is the
//! difference against the run two positions back.

use crate::Error;

const GROUP_BITS: u32 = 5;
const GROUP_MASK: i128 = 0x1f;
const SIGN_BIT: i128 = 0x10;
const MORE_BIT: i128 = 0x20;
const CHAR_OFFSET: u8 = 48;
/// Longest value that fits the accumulator with its sign intact.
const MAX_GROUPS: u32 = 25;

/// Serialise run lengths into a COCO RLE string.
///
/// # Example
/// ```
/// use encord_client::bitmask::rle_to_string;
///
/// assert_eq!(rle_to_string(&[5, 3, 92]), "53l2");
/// assert_eq!(rle_to_string(&[]), "");
/// ```
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(runs = rle.len())))]
pub fn rle_to_string(rle: &[u64]) -> String {
    let mut s = String::with_capacity(rle.len() * 2);
    for (i, &count) in rle.iter().enumerate() {
        let mut x = count as i128;
        if i > 2 {
            x -= rle[i - 2] as i128;
        }
        encode_value(&mut s, x);
    }
    s
}

fn encode_value(s: &mut String, mut x: i128) {
    loop {
        let mut c = x & GROUP_MASK;
        x >>= GROUP_BITS;
        let more = if c & SIGN_BIT != 0 { x != -1 } else { x != 0 };
        if more {
            c |= MORE_BIT;
        }
        s.push(char::from(c as u8 + CHAR_OFFSET));
        if !more {
            break;
        }
    }
}

/// Deserialise a COCO RLE string into run lengths.
///
/// The string is not structurally validated: a dangling continuation bit at
/// the end of the input simply terminates the last value. Decoding only
/// fails when the result cannot be a run length: a byte below `'0'`, a value
/// longer than 25 groups, or a value that is negative or larger than
/// `u64::MAX`.
///
/// # Example
/// ```
/// use encord_client::bitmask::string_to_rle;
///
/// assert_eq!(string_to_rle("53l2")?, vec![5, 3, 92]);
/// # Ok::<(), encord_client::Error>(())
/// ```
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(len = s.len())))]
pub fn string_to_rle(s: &str) -> Result<Vec<u64>, Error> {
    let bytes = s.as_bytes();
    let mut counts: Vec<u64> = Vec::with_capacity(bytes.len() / 2);
    let mut p = 0usize;

    while p < bytes.len() {
        let mut x: i128 = 0;
        let mut k = 0u32;
        let mut more = true;

        while more && p < bytes.len() {
            let byte = bytes[p];
            let c = byte.checked_sub(CHAR_OFFSET).ok_or_else(|| {
                Error::MalformedRle(format!(
                    "invalid character {:?} at offset {}",
                    byte as char, p
                ))
            })? as i128;
            if k == MAX_GROUPS {
                return Err(Error::MalformedRle(format!(
                    "value ending at offset {} is longer than {} groups",
                    p, MAX_GROUPS
                )));
            }
            x |= (c & GROUP_MASK) << (GROUP_BITS * k);
            more = c & MORE_BIT != 0;
            p += 1;
            k += 1;

            if !more && c & SIGN_BIT != 0 {
                x |= -1i128 << (GROUP_BITS * k);
            }
        }

        if counts.len() > 2 {
            x = x
                .checked_add(counts[counts.len() - 2] as i128)
                .ok_or_else(|| Error::MalformedRle(format!("value overflow before offset {}", p)))?;
        }

        let count = u64::try_from(x).map_err(|_| {
            Error::MalformedRle(format!(
                "run {} decodes to {}, which is not a valid length",
                counts.len(),
                x
            ))
        })?;
        counts.push(count);
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rle_to_string_known_values() {
        assert_eq!(rle_to_string(&[5, 3, 92]), "53l2");
        assert_eq!(rle_to_string(&[0]), "0");
        assert_eq!(rle_to_string(&[15]), "?");
    }

    #[test]
    fn test_rle_to_string_uses_two_back_delta() {
        // The fourth value is stored as 2 - 5 = -3.
        assert_eq!(rle_to_string(&[10, 5, 3, 2]), ":53M");
        assert_eq!(string_to_rle(":53M").unwrap(), vec![10, 5, 3, 2]);
        // 1 - 3 = -2.
        assert_eq!(rle_to_string(&[2, 3, 1, 1]), "231N");
        assert_eq!(string_to_rle("231N").unwrap(), vec![2, 3, 1, 1]);
    }

    #[test]
    fn test_rle_to_string_empty() {
        assert_eq!(rle_to_string(&[]), "");
        assert!(string_to_rle("").unwrap().is_empty());
    }

    #[test]
    fn test_sign_boundary_values() {
        // 16 has the sign bit of its first group set and needs a second group.
        let s = rle_to_string(&[16]);
        assert_eq!(s.len(), 2);
        assert_eq!(string_to_rle(&s).unwrap(), vec![16]);
    }

    #[test]
    fn test_roundtrip_large_values() {
        let rle = vec![0, u64::MAX, 1, u64::MAX - 7, 0, 1 << 40, 3, 0];
        let s = rle_to_string(&rle);
        assert_eq!(string_to_rle(&s).unwrap(), rle);
    }

    #[test]
    fn test_roundtrip_long_sequences() {
        let rle: Vec<u64> = (0..2000u64).map(|i| (i * 7919) % 1031).collect();
        let s = rle_to_string(&rle);
        assert_eq!(string_to_rle(&s).unwrap(), rle);
    }

    #[test]
    fn test_output_is_printable_ascii() {
        let rle: Vec<u64> = vec![1, 1_000_000, 3, 17, 900_000, 2, 65_536];
        let s = rle_to_string(&rle);
        assert!(s.bytes().all(|b| (48..=126).contains(&b)), "{}", s);
    }

    #[test]
    fn test_string_to_rle_rejects_low_bytes() {
        let result = string_to_rle("5/");
        assert!(matches!(result, Err(Error::MalformedRle(_))));
    }

    #[test]
    fn test_string_to_rle_rejects_negative_counts() {
        // '@' is group 16 with no continuation, which sign-extends to -16.
        let result = string_to_rle("@");
        assert!(matches!(result, Err(Error::MalformedRle(_))));
    }

    #[test]
    fn test_string_to_rle_dangling_continuation() {
        // 'P' is group 0 with the continuation bit set and nothing after it.
        assert_eq!(string_to_rle("5P").unwrap(), vec![5, 0]);
    }

    #[test]
    fn test_string_to_rle_rejects_overlong_values() {
        // 25 continuation groups then a final group with the sign bit set.
        let negative = format!("{}@", "P".repeat(25));
        assert!(matches!(string_to_rle(&negative), Err(Error::MalformedRle(_))));

        let positive = format!("{}1", "P".repeat(25));
        assert!(matches!(string_to_rle(&positive), Err(Error::MalformedRle(_))));

        // 25 groups still decode; this one is a negative count.
        let longest = format!("{}@", "P".repeat(24));
        assert!(matches!(string_to_rle(&longest), Err(Error::MalformedRle(_))));
        let longest = format!("{}0", "P".repeat(24));
        assert_eq!(string_to_rle(&longest).unwrap(), vec![0]);
    }
}
