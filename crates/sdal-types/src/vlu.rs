//! Variable-length unsigned integer codecs used throughout SDAL payloads.
//!
//! Type-1 (node/segment ids, counts) and Type-4 (coordinate deltas in node
//! blocks) both grow the encoded width in fixed steps, one extra byte per
//! tier, up to a four-byte maximum.

use crate::error::{SdalError, SdalResult};

pub const TYPE1_MAX: u32 = 1_114_095;
pub const TYPE4_MAX: u32 = 61_439 + 0xFFFFF;

/// Encode a Type-1 variable-length unsigned integer (range `[0, 1_114_095]`).
pub fn encode_type1(n: u32) -> SdalResult<Vec<u8>> {
    if n > TYPE1_MAX {
        return Err(SdalError::OverflowError {
            what: "type1 VLU",
            value: n as i64,
        });
    }

    if n <= 239 {
        Ok(vec![n as u8])
    } else if n <= 4079 {
        let x = n - 240;
        Ok(vec![0xF0 | ((x >> 8) & 0x0F) as u8, (x & 0xFF) as u8])
    } else if n <= 65519 {
        let x = n - 4080;
        Ok(vec![0xFF, ((x >> 8) & 0xFF) as u8, (x & 0xFF) as u8])
    } else {
        let x = n - 65520;
        Ok(vec![
            0xFF,
            0xF0 | ((x >> 16) & 0x0F) as u8,
            ((x >> 8) & 0xFF) as u8,
            (x & 0xFF) as u8,
        ])
    }
}

/// Decode a Type-1 VLU from the front of `buf`, returning the value and the
/// number of bytes consumed.
pub fn decode_type1(buf: &[u8]) -> SdalResult<(u32, usize)> {
    let b0 = *buf
        .first()
        .ok_or_else(|| SdalError::CodecError("empty buffer for type1 VLU".into()))?;

    if b0 != 0xFF {
        if b0 & 0xF0 == 0xF0 {
            let b1 = *buf
                .get(1)
                .ok_or_else(|| SdalError::CodecError("truncated type1 VLU".into()))?;
            let x = (((b0 & 0x0F) as u32) << 8) | b1 as u32;
            Ok((x + 240, 2))
        } else {
            Ok((b0 as u32, 1))
        }
    } else {
        let b1 = *buf
            .get(1)
            .ok_or_else(|| SdalError::CodecError("truncated type1 VLU".into()))?;
        if b1 & 0xF0 == 0xF0 {
            let b2 = *buf
                .get(2)
                .ok_or_else(|| SdalError::CodecError("truncated type1 VLU".into()))?;
            let b3 = *buf
                .get(3)
                .ok_or_else(|| SdalError::CodecError("truncated type1 VLU".into()))?;
            let x = (((b1 & 0x0F) as u32) << 16) | ((b2 as u32) << 8) | b3 as u32;
            Ok((x + 65520, 4))
        } else {
            let b2 = *buf
                .get(2)
                .ok_or_else(|| SdalError::CodecError("truncated type1 VLU".into()))?;
            let x = ((b1 as u32) << 8) | b2 as u32;
            Ok((x + 4080, 3))
        }
    }
}

/// Encode a Type-4 variable-length unsigned integer (coordinate deltas).
pub fn encode_type4(n: u32) -> SdalResult<Vec<u8>> {
    if n > TYPE4_MAX {
        return Err(SdalError::OverflowError {
            what: "type4 VLU",
            value: n as i64,
        });
    }

    if n <= 61439 {
        Ok(vec![((n >> 8) & 0xFF) as u8, (n & 0xFF) as u8])
    } else {
        let x = n - 61440;
        Ok(vec![
            0xF0 | ((x >> 16) & 0x0F) as u8,
            ((x >> 8) & 0xFF) as u8,
            (x & 0xFF) as u8,
        ])
    }
}

/// Decode a Type-4 VLU from the front of `buf`.
pub fn decode_type4(buf: &[u8]) -> SdalResult<(u32, usize)> {
    let b0 = *buf
        .first()
        .ok_or_else(|| SdalError::CodecError("empty buffer for type4 VLU".into()))?;

    if b0 & 0xF0 == 0xF0 {
        let b1 = *buf
            .get(1)
            .ok_or_else(|| SdalError::CodecError("truncated type4 VLU".into()))?;
        let b2 = *buf
            .get(2)
            .ok_or_else(|| SdalError::CodecError("truncated type4 VLU".into()))?;
        let x = (((b0 & 0x0F) as u32) << 16) | ((b1 as u32) << 8) | b2 as u32;
        Ok((x + 61440, 3))
    } else {
        let b1 = *buf
            .get(1)
            .ok_or_else(|| SdalError::CodecError("truncated type4 VLU".into()))?;
        let n = ((b0 as u32) << 8) | b1 as u32;
        Ok((n, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type1_round_trips_full_range_sampled() {
        for n in (0..=TYPE1_MAX).step_by(977) {
            let enc = encode_type1(n).unwrap();
            let (dec, consumed) = decode_type1(&enc).unwrap();
            assert_eq!(dec, n);
            assert_eq!(consumed, enc.len());
        }
        let (dec, _) = decode_type1(&encode_type1(TYPE1_MAX).unwrap()).unwrap();
        assert_eq!(dec, TYPE1_MAX);
    }

    #[test]
    fn type1_overflow_rejected() {
        assert!(encode_type1(TYPE1_MAX + 1).is_err());
    }

    // Boundary cases around each tier's byte-count step. The 4079 case is
    // worth a second look: applying the tier algorithm consistently across
    // every boundary value here (0, 239, 240, 4080, 65519, 65520) yields
    // `[FE FF]`, not `[FE EF]` — see DESIGN.md.
    #[test]
    fn type1_boundary_encodings() {
        assert_eq!(encode_type1(0).unwrap(), vec![0x00]);
        assert_eq!(encode_type1(239).unwrap(), vec![0xEF]);
        assert_eq!(encode_type1(240).unwrap(), vec![0xF0, 0x00]);
        assert_eq!(encode_type1(4079).unwrap(), vec![0xFE, 0xFF]);
        assert_eq!(encode_type1(4080).unwrap(), vec![0xFF, 0x00, 0x00]);
        assert_eq!(encode_type1(65519).unwrap(), vec![0xFF, 0xEF, 0xFF]);
        assert_eq!(encode_type1(65520).unwrap(), vec![0xFF, 0xF0, 0x00, 0x00]);
    }

    #[test]
    fn type4_round_trips() {
        for n in [0u32, 1, 61439, 61440, 61441, TYPE4_MAX] {
            let enc = encode_type4(n).unwrap();
            let (dec, consumed) = decode_type4(&enc).unwrap();
            assert_eq!(dec, n);
            assert_eq!(consumed, enc.len());
        }
    }

    #[test]
    fn type4_overflow_rejected() {
        assert!(encode_type4(TYPE4_MAX + 1).is_err());
    }
}
