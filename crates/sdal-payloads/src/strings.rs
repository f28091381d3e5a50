//! Strings parcel: `u32 count || count × u32 offset ||
//! concatenated NUL-terminated ASCII bytes`.
//!
//! Input is normalized before encoding: accented Latin letters are folded
//! to their base ASCII form (a hand-rolled stand-in for decomposition,
//! since no normalization crate is available in this stack — see
//! `UtmProjector` for the same tradeoff on the projection side), then
//! anything left outside ASCII is dropped.

pub const CHUNK_SIZE: usize = 2_000;

/// Fold a handful of common accented Latin letters to ASCII, then drop any
/// remaining non-ASCII code point.
pub fn normalize_to_ascii(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(fold_to_ascii)
        .map(|c| c as u8)
        .collect()
}

fn fold_to_ascii(c: char) -> Option<char> {
    if c.is_ascii() {
        return Some(c);
    }
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        'ý' | 'ÿ' | 'Ý' => 'y',
        _ => return None,
    };
    Some(if c.is_uppercase() {
        folded.to_ascii_uppercase()
    } else {
        folded
    })
}

/// Split `strings` into chunks of at most [`CHUNK_SIZE`] and encode each
/// chunk's payload.
pub fn encode_strings_chunked(strings: &[String]) -> Vec<Vec<u8>> {
    strings
        .chunks(CHUNK_SIZE)
        .map(encode_strings_chunk)
        .collect()
}

fn encode_strings_chunk(strings: &[String]) -> Vec<u8> {
    let normalized: Vec<Vec<u8>> = strings.iter().map(|s| normalize_to_ascii(s)).collect();

    let mut blob = Vec::new();
    let mut offsets = Vec::with_capacity(normalized.len());
    for bytes in &normalized {
        offsets.push(blob.len() as u32);
        blob.extend_from_slice(bytes);
        blob.push(0);
    }

    let mut out = Vec::with_capacity(4 + offsets.len() * 4 + blob.len());
    out.extend_from_slice(&(normalized.len() as u32).to_be_bytes());
    for off in &offsets {
        out.extend_from_slice(&off.to_be_bytes());
    }
    out.extend_from_slice(&blob);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_drops_unrepresentable() {
        assert_eq!(normalize_to_ascii("Café"), b"Cafe".to_vec());
        assert_eq!(normalize_to_ascii("北京"), Vec::<u8>::new());
        assert_eq!(normalize_to_ascii("plain"), b"plain".to_vec());
    }

    #[test]
    fn single_chunk_layout_matches_spec() {
        let strings = vec!["abc".to_string(), "de".to_string()];
        let chunks = encode_strings_chunked(&strings);
        assert_eq!(chunks.len(), 1);
        let payload = &chunks[0];

        let count = u32::from_be_bytes(payload[0..4].try_into().unwrap());
        assert_eq!(count, 2);
        let off0 = u32::from_be_bytes(payload[4..8].try_into().unwrap());
        let off1 = u32::from_be_bytes(payload[8..12].try_into().unwrap());
        assert_eq!(off0, 0);
        assert_eq!(off1, 4); // "abc\0" is 4 bytes

        let blob = &payload[12..];
        assert_eq!(blob, b"abc\0de\0");
    }

    #[test]
    fn empty_input_yields_count_only_header() {
        let chunks = encode_strings_chunked(&[]);
        assert!(chunks.is_empty());
    }

    #[test]
    fn chunks_at_two_thousand_strings() {
        let strings: Vec<String> = (0..4500).map(|i| format!("s{i}")).collect();
        let chunks = encode_strings_chunked(&strings);
        assert_eq!(chunks.len(), 3);
        let count0 = u32::from_be_bytes(chunks[0][0..4].try_into().unwrap());
        let count2 = u32::from_be_bytes(chunks[2][0..4].try_into().unwrap());
        assert_eq!(count0, CHUNK_SIZE as u32);
        assert_eq!(count2, 500);
    }
}
