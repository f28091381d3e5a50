//! `INIT.SDL`: the standard-mode three-parcel locale bundle,
//! and the OEM self-standing config block with its CRC32-protected header.

use sdal_types::{encode_parcel, ParcelMeta, SdalResult};

use crate::crc::crc32_ieee;

pub const OEM_CONFIG_BLOCK_LEN: usize = 0x1_2048;
pub const OEM_COUNTRY_TABLE_OFFSET: u32 = 0x100;
pub const OEM_SECTOR_SIZE: usize = 2048;

/// Standard-mode `GLB_MEDIA_HEADER` payload: version triple, region
/// count, a 256-byte parcel-size-index table, and offsets (in units) to
/// the locale and symbol parcels that follow it.
pub fn encode_glb_media_header(region_count: u16, locale_offset_units: u32, symbol_offset_units: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(512);
    out.extend_from_slice(&1u16.to_be_bytes()); // major
    out.extend_from_slice(&7u16.to_be_bytes()); // minor
    out.extend_from_slice(&1999u16.to_be_bytes()); // year
    out.extend_from_slice(&region_count.to_be_bytes());
    out.extend_from_slice(&[0u8; 256]); // parcel-size-index table
    out.extend_from_slice(&locale_offset_units.to_be_bytes());
    out.extend_from_slice(&symbol_offset_units.to_be_bytes());
    out.resize(512, 0);
    out
}

/// Standard-mode `LOCALE` payload: a country table of per-language
/// translation rows, handed over pre-encoded (built by the caller from
/// the same dictionary `region_oem` draws from).
pub fn encode_locale(country_table: &[u8]) -> Vec<u8> {
    country_table.to_vec()
}

/// Standard-mode `SYMBOL` payload: a 256-byte-per-symbol table. A stub
/// (all-zero single entry) is a conforming minimal implementation.
pub fn encode_symbol_stub() -> Vec<u8> {
    vec![0u8; 256]
}

/// Assemble the three standard-mode INIT.SDL parcels in order.
pub fn encode_init_standard(
    region_count: u16,
    locale_offset_units: u32,
    symbol_offset_units: u32,
    country_table: &[u8],
) -> SdalResult<Vec<Vec<u8>>> {
    let media_header = encode_glb_media_header(region_count, locale_offset_units, symbol_offset_units);
    let locale = encode_locale(country_table);
    let symbol = encode_symbol_stub();

    let meta = |desc: u16| ParcelMeta {
        region: 0,
        desc,
        ptype: 0,
        compress_type: 0,
        offset_units: 0,
        size_index: 0,
        redundancy: false,
        external: false,
    };

    Ok(vec![
        encode_parcel(None, &media_header, meta(0))?,
        encode_parcel(None, &locale, meta(1))?,
        encode_parcel(None, &symbol, meta(2))?,
    ])
}

/// Assemble the OEM-mode INIT.SDL: a fixed config block (CRC32-patched
/// at offset 0x0C) followed by the region-entry table, padded to the
/// next 2048-byte sector boundary.
pub fn encode_init_oem(country_refs: &[[u8; 32]], feature_entries: &[[u8; 20]], region_entries: &[[u8; 68]]) -> Vec<u8> {
    let mut block = vec![0u8; OEM_CONFIG_BLOCK_LEN];

    block[0x00..0x04].copy_from_slice(&0x4C41_4453u32.to_le_bytes());
    block[0x04..0x08].copy_from_slice(&0x0001_0000u32.to_le_bytes());
    block[0x08..0x0C].copy_from_slice(&(OEM_CONFIG_BLOCK_LEN as u32).to_le_bytes());
    // 0x0C..0x10 (crc32) patched below.
    block[0x10..0x14].copy_from_slice(&(country_refs.len() as u32).to_le_bytes());
    block[0x14..0x18].copy_from_slice(&OEM_COUNTRY_TABLE_OFFSET.to_le_bytes());

    let country_start = OEM_COUNTRY_TABLE_OFFSET as usize;
    for (i, entry) in country_refs.iter().enumerate() {
        let off = country_start + i * 32;
        block[off..off + 32].copy_from_slice(entry);
    }

    let feature_start = {
        let raw = country_start + country_refs.len() * 32;
        (raw + 3) & !3 // 4-byte align
    };
    block[0x18..0x1C].copy_from_slice(&(feature_start as u32).to_le_bytes());
    for (i, entry) in feature_entries.iter().enumerate() {
        let off = feature_start + i * 20;
        if off + 20 <= block.len() {
            block[off..off + 20].copy_from_slice(entry);
        }
    }

    let crc = crc32_ieee(&block[0x10..OEM_CONFIG_BLOCK_LEN]);
    block[0x0C..0x10].copy_from_slice(&crc.to_le_bytes());

    let mut out = block;
    for entry in region_entries {
        out.extend_from_slice(entry);
    }

    let rem = out.len() % OEM_SECTOR_SIZE;
    if rem != 0 {
        out.resize(out.len() + (OEM_SECTOR_SIZE - rem), 0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_self_consistent() {
        let file = encode_init_oem(&[[0u8; 32]; 2], &[[0u8; 20]], &[[0u8; 68]]);
        let stored = u32::from_le_bytes(file[0x0C..0x10].try_into().unwrap());
        let recomputed = crc32_ieee(&file[0x10..OEM_CONFIG_BLOCK_LEN]);
        assert_eq!(stored ^ 0, recomputed);
    }

    #[test]
    fn magic_and_version_little_endian() {
        let file = encode_init_oem(&[], &[], &[]);
        assert_eq!(u32::from_le_bytes(file[0..4].try_into().unwrap()), 0x4C41_4453);
        assert_eq!(u32::from_le_bytes(file[4..8].try_into().unwrap()), 0x0001_0000);
    }

    #[test]
    fn file_padded_to_sector_boundary() {
        let file = encode_init_oem(&[[0u8; 32]; 3], &[], &[[0u8; 68]; 2]);
        assert_eq!(file.len() % OEM_SECTOR_SIZE, 0);
    }

    #[test]
    fn standard_mode_yields_three_parcels() {
        let parcels = encode_init_standard(1, 5, 6, &[]).unwrap();
        assert_eq!(parcels.len(), 3);
    }
}
