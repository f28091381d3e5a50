//! CRC32 (IEEE 802.3) for the OEM `INIT.SDL` config block.

use crc::{Crc, CRC_32_ISO_HDLC};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// `crc32_ieee(bytes, init=0xFFFFFFFF) ^ 0xFFFFFFFF` — the parameters the
/// `crc` crate's `CRC_32_ISO_HDLC` table already bakes in, matching the
/// standard IEEE 802.3 polynomial.
pub fn crc32_ieee(bytes: &[u8]) -> u32 {
    CRC32.checksum(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector_matches_standard_crc32() {
        // "123456789" is the canonical CRC-32/ISO-HDLC test vector.
        assert_eq!(crc32_ieee(b"123456789"), 0xCBF4_3926);
    }
}
