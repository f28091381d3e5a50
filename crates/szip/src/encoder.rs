//! Top-level SZIP block encoder and a conformance-checking decoder.
//!
//! The decoder exists to let this crate's own tests verify round-trips,
//! but it is exposed publicly since nothing about it is test-only in
//! nature.

use std::collections::HashMap;

use sdal_types::{
    assign_canonical_codes, build_code_lengths, BitReader, BitWriter, Code, SdalError, SdalResult,
};

use crate::codelen_rle::{decode_lengths, encode_lengths, RleSymbol, CLCL_ORDER};
use crate::lz77::{tokenize, Token};
use crate::tables::{distance_symbol, length_symbol, DISTANCE_TABLE, END_OF_BLOCK, LENGTH_TABLE, WINDOW_SIZE};

const LITLEN_ALPHABET: usize = 286;
const DISTANCE_ALPHABET: usize = 30;
const CODE_LENGTH_ALPHABET: usize = 19;

/// 20-byte little-endian header preceding every SZIP block.
#[derive(Debug, Clone, Copy)]
pub struct HuffOffsets {
    pub tree1_offset: u32,
    pub tree2_offset: u32,
    pub tree3_offset: u32,
    pub window_size: u32,
    pub data_offset: u32,
}

impl HuffOffsets {
    pub const LEN: usize = 20;

    fn to_bytes(self) -> [u8; 20] {
        let mut out = [0u8; 20];
        out[0..4].copy_from_slice(&self.tree1_offset.to_le_bytes());
        out[4..8].copy_from_slice(&self.tree2_offset.to_le_bytes());
        out[8..12].copy_from_slice(&self.tree3_offset.to_le_bytes());
        out[12..16].copy_from_slice(&self.window_size.to_le_bytes());
        out[16..20].copy_from_slice(&self.data_offset.to_le_bytes());
        out
    }

    fn from_bytes(buf: &[u8]) -> SdalResult<Self> {
        if buf.len() < Self::LEN {
            return Err(SdalError::CodecError("truncated HuffOffsets".into()));
        }
        Ok(Self {
            tree1_offset: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            tree2_offset: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
            tree3_offset: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
            window_size: u32::from_le_bytes(buf[12..16].try_into().unwrap()),
            data_offset: u32::from_le_bytes(buf[16..20].try_into().unwrap()),
        })
    }
}

fn write_symbol(bw: &mut BitWriter, codes: &[Option<Code>], symbol: usize) -> SdalResult<()> {
    let code = codes[symbol]
        .ok_or_else(|| SdalError::CodecError(format!("missing Huffman code for symbol {symbol}")))?;
    bw.write_bits(code.bits, code.length);
    Ok(())
}

fn reverse_map(codes: &[Option<Code>]) -> HashMap<(u8, u32), u32> {
    let mut map = HashMap::new();
    for (sym, code) in codes.iter().enumerate() {
        if let Some(c) = code {
            map.insert((c.length, c.bits), sym as u32);
        }
    }
    map
}

fn read_symbol(br: &mut BitReader, map: &HashMap<(u8, u32), u32>, max_len: u8) -> SdalResult<u32> {
    let mut bits = 0u32;
    for len in 1..=max_len {
        let bit = br
            .read_bits(1)
            .ok_or_else(|| SdalError::CodecError("bitstream exhausted mid-symbol".into()))?;
        bits = (bits << 1) | bit;
        if let Some(&sym) = map.get(&(len, bits)) {
            return Ok(sym);
        }
    }
    Err(SdalError::CodecError("no matching Huffman code".into()))
}

/// Compress `data` into a full SZIP block (header + tables + bitstream).
pub fn compress(data: &[u8]) -> SdalResult<Vec<u8>> {
    let tokens = tokenize(data);

    let mut litlen_freq = vec![0u64; LITLEN_ALPHABET];
    let mut dist_freq = vec![0u64; DISTANCE_ALPHABET];

    for t in &tokens {
        match *t {
            Token::Literal(b) => litlen_freq[b as usize] += 1,
            Token::Match { distance, length } => {
                let (lcode, _, _) = length_symbol(length);
                litlen_freq[lcode as usize] += 1;
                let (dcode, _, _) = distance_symbol(distance);
                dist_freq[dcode as usize] += 1;
            }
        }
    }
    litlen_freq[END_OF_BLOCK as usize] += 1;

    let litlen_lengths = build_code_lengths(&litlen_freq);
    let litlen_codes = assign_canonical_codes(&litlen_lengths);
    let dist_lengths = build_code_lengths(&dist_freq);
    let dist_codes = assign_canonical_codes(&dist_lengths);

    let litlen_rle = encode_lengths(&litlen_lengths);
    let dist_rle = encode_lengths(&dist_lengths);

    let mut clcl_freq = vec![0u64; CODE_LENGTH_ALPHABET];
    for s in litlen_rle.iter().chain(dist_rle.iter()) {
        clcl_freq[s.code() as usize] += 1;
    }
    let clcl_lengths = build_code_lengths(&clcl_freq);
    let clcl_codes = assign_canonical_codes(&clcl_lengths);

    // Section 1: the code-length code's own 19 lengths, 3 bits each, in
    // the fixed header order.
    let mut bw1 = BitWriter::new();
    for &idx in CLCL_ORDER.iter() {
        bw1.write_bits(clcl_lengths[idx] as u32, 3);
    }
    let bytes1 = bw1.finish();

    let write_rle_section = |symbols: &[RleSymbol]| -> SdalResult<Vec<u8>> {
        let mut bw = BitWriter::new();
        for s in symbols {
            write_symbol(&mut bw, &clcl_codes, s.code() as usize)?;
            match s {
                RleSymbol::Length(_) => {}
                RleSymbol::RepeatPrev { count } => bw.write_bits((*count - 3) as u32, 2),
                RleSymbol::ZeroShort { count } => bw.write_bits((*count - 3) as u32, 3),
                RleSymbol::ZeroLong { count } => bw.write_bits((*count - 11) as u32, 7),
            }
        }
        Ok(bw.finish())
    };

    let bytes2a = write_rle_section(&litlen_rle)?;
    let bytes2b = write_rle_section(&dist_rle)?;

    let mut bw3 = BitWriter::new();
    for t in &tokens {
        match *t {
            Token::Literal(b) => write_symbol(&mut bw3, &litlen_codes, b as usize)?,
            Token::Match { distance, length } => {
                let (lcode, lextra_bits, lextra) = length_symbol(length);
                write_symbol(&mut bw3, &litlen_codes, lcode as usize)?;
                if lextra_bits > 0 {
                    bw3.write_bits(lextra as u32, lextra_bits);
                }
                let (dcode, dextra_bits, dextra) = distance_symbol(distance);
                write_symbol(&mut bw3, &dist_codes, dcode as usize)?;
                if dextra_bits > 0 {
                    bw3.write_bits(dextra, dextra_bits);
                }
            }
        }
    }
    write_symbol(&mut bw3, &litlen_codes, END_OF_BLOCK as usize)?;
    let bytes3 = bw3.finish();

    let tree1_offset = HuffOffsets::LEN as u32;
    let tree2_offset = tree1_offset + bytes1.len() as u32;
    let tree3_offset = tree2_offset + bytes2a.len() as u32;
    let data_offset = tree3_offset + bytes2b.len() as u32;

    let header = HuffOffsets {
        tree1_offset,
        tree2_offset,
        tree3_offset,
        window_size: WINDOW_SIZE as u32,
        data_offset,
    };

    let mut out = Vec::with_capacity(data_offset as usize + bytes3.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&bytes1);
    out.extend_from_slice(&bytes2a);
    out.extend_from_slice(&bytes2b);
    out.extend_from_slice(&bytes3);
    Ok(out)
}

/// Decompress a block produced by [`compress`] back into the original bytes.
pub fn decompress(block: &[u8]) -> SdalResult<Vec<u8>> {
    let header = HuffOffsets::from_bytes(block)?;

    let mut clcl_lengths = vec![0u8; CODE_LENGTH_ALPHABET];
    {
        let section = &block[header.tree1_offset as usize..header.tree2_offset as usize];
        let mut br = BitReader::new(section);
        for &idx in CLCL_ORDER.iter() {
            let v = br
                .read_bits(3)
                .ok_or_else(|| SdalError::CodecError("truncated code-length-code header".into()))?;
            clcl_lengths[idx] = v as u8;
        }
    }
    let clcl_codes = assign_canonical_codes(&clcl_lengths);
    let clcl_map = reverse_map(&clcl_codes);
    let clcl_max_len = clcl_lengths.iter().copied().max().unwrap_or(0);

    let read_rle_section = |buf: &[u8], alphabet_len: usize| -> SdalResult<Vec<u8>> {
        let mut br = BitReader::new(buf);
        let mut symbols = Vec::new();
        let mut total = 0usize;
        while total < alphabet_len {
            let code = read_symbol(&mut br, &clcl_map, clcl_max_len)?;
            let extra = match code {
                0..=15 => 0,
                16 => br
                    .read_bits(2)
                    .ok_or_else(|| SdalError::CodecError("truncated RLE extra bits".into()))?,
                17 => br
                    .read_bits(3)
                    .ok_or_else(|| SdalError::CodecError("truncated RLE extra bits".into()))?,
                18 => br
                    .read_bits(7)
                    .ok_or_else(|| SdalError::CodecError("truncated RLE extra bits".into()))?,
                _ => return Err(SdalError::CodecError("invalid code-length symbol".into())),
            };
            let run = match code {
                0..=15 => 1,
                16 => extra + 3,
                17 => extra + 3,
                18 => extra + 11,
                _ => unreachable!(),
            };
            symbols.push((code as u8, extra));
            total += run as usize;
        }
        Ok(decode_lengths(&symbols, alphabet_len))
    };

    let litlen_lengths = read_rle_section(
        &block[header.tree2_offset as usize..header.tree3_offset as usize],
        LITLEN_ALPHABET,
    )?;
    let dist_lengths = read_rle_section(
        &block[header.tree3_offset as usize..header.data_offset as usize],
        DISTANCE_ALPHABET,
    )?;

    let litlen_codes = assign_canonical_codes(&litlen_lengths);
    let dist_codes = assign_canonical_codes(&dist_lengths);
    let litlen_map = reverse_map(&litlen_codes);
    let dist_map = reverse_map(&dist_codes);
    let litlen_max_len = litlen_lengths.iter().copied().max().unwrap_or(0);
    let dist_max_len = dist_lengths.iter().copied().max().unwrap_or(1).max(1);

    let mut out = Vec::new();
    let mut br = BitReader::new(&block[header.data_offset as usize..]);
    loop {
        let sym = read_symbol(&mut br, &litlen_map, litlen_max_len)?;
        if sym == END_OF_BLOCK as u32 {
            break;
        }
        if sym < 256 {
            out.push(sym as u8);
            continue;
        }
        let (_, extra_bits, base) = LENGTH_TABLE[sym as usize - 257];
        let extra = if extra_bits > 0 {
            br.read_bits(extra_bits)
                .ok_or_else(|| SdalError::CodecError("truncated length extra bits".into()))?
        } else {
            0
        };
        let length = base + extra as u16;

        let dsym = read_symbol(&mut br, &dist_map, dist_max_len)?;
        let (_, dextra_bits, dbase) = DISTANCE_TABLE[dsym as usize];
        let dextra = if dextra_bits > 0 {
            br.read_bits(dextra_bits)
                .ok_or_else(|| SdalError::CodecError("truncated distance extra bits".into()))?
        } else {
            0
        };
        let distance = dbase + dextra;

        let start = out
            .len()
            .checked_sub(distance as usize)
            .ok_or_else(|| SdalError::CodecError("back-reference before start of output".into()))?;
        for i in 0..length as usize {
            let b = out[start + i];
            out.push(b);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_repetitive_text() {
        let data = b"the quick brown fox jumps over the lazy dog. the quick brown fox jumps again.".to_vec();
        let compressed = compress(&data).unwrap();
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn round_trips_empty_input() {
        let data: Vec<u8> = Vec::new();
        let compressed = compress(&data).unwrap();
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn round_trips_single_repeated_byte() {
        let data = vec![0x41u8; 5000];
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn round_trips_all_byte_values() {
        let data: Vec<u8> = (0..=255u8).cycle().take(2000).collect();
        let compressed = compress(&data).unwrap();
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn huff_offsets_are_monotonic() {
        let data = b"abcabcabcabcxyzxyzxyz123123123".to_vec();
        let compressed = compress(&data).unwrap();
        let header = HuffOffsets::from_bytes(&compressed).unwrap();
        assert!(header.tree1_offset < header.tree2_offset);
        assert!(header.tree2_offset < header.tree3_offset);
        assert!(header.tree3_offset <= header.data_offset);
        assert_eq!(header.window_size, WINDOW_SIZE as u32);
    }
}
