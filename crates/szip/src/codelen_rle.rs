//! Run-length encoding of concatenated code lengths over the 19-symbol
//! code-length alphabet: lengths 0-15 are literal, 16-18 are
//! repeat markers.

pub const CODE_LENGTH_ALPHABET: usize = 19;

/// The fixed order in which code-length-code lengths are written to the
/// header, matching the DEFLATE-family convention this RLE scheme is
/// drawn from.
pub const CLCL_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleSymbol {
    /// A literal code length 0-15.
    Length(u8),
    /// Repeat the previous length 3-6 times (2 extra bits).
    RepeatPrev { count: u8 },
    /// A run of zero-length codes, 3-10 (3 extra bits).
    ZeroShort { count: u8 },
    /// A run of zero-length codes, 11-138 (7 extra bits).
    ZeroLong { count: u8 },
}

impl RleSymbol {
    pub fn code(&self) -> u8 {
        match self {
            RleSymbol::Length(l) => *l,
            RleSymbol::RepeatPrev { .. } => 16,
            RleSymbol::ZeroShort { .. } => 17,
            RleSymbol::ZeroLong { .. } => 18,
        }
    }
}

/// Encode a flat list of code lengths into RLE symbols.
pub fn encode_lengths(lengths: &[u8]) -> Vec<RleSymbol> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < lengths.len() {
        let cur = lengths[i];
        let mut run = 1usize;
        while i + run < lengths.len() && lengths[i + run] == cur {
            run += 1;
        }

        if cur == 0 {
            let mut remaining = run;
            while remaining > 0 {
                if remaining >= 11 {
                    let take = remaining.min(138);
                    out.push(RleSymbol::ZeroLong { count: take as u8 });
                    remaining -= take;
                } else if remaining >= 3 {
                    let take = remaining.min(10);
                    out.push(RleSymbol::ZeroShort { count: take as u8 });
                    remaining -= take;
                } else {
                    for _ in 0..remaining {
                        out.push(RleSymbol::Length(0));
                    }
                    remaining = 0;
                }
            }
        } else {
            out.push(RleSymbol::Length(cur));
            let mut remaining = run - 1;
            while remaining > 0 {
                if remaining >= 3 {
                    let take = remaining.min(6);
                    out.push(RleSymbol::RepeatPrev { count: take as u8 });
                    remaining -= take;
                } else {
                    for _ in 0..remaining {
                        out.push(RleSymbol::Length(cur));
                    }
                    remaining = 0;
                }
            }
        }
        i += run;
    }
    out
}

/// Decode RLE symbols back into a flat list of `total` code lengths.
pub fn decode_lengths(symbols: &[(u8, u32)], total: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(total);
    let mut prev = 0u8;
    for &(code, extra) in symbols {
        match code {
            0..=15 => {
                out.push(code);
                prev = code;
            }
            16 => {
                for _ in 0..(extra + 3) {
                    out.push(prev);
                }
            }
            17 => {
                for _ in 0..(extra + 3) {
                    out.push(0);
                }
            }
            18 => {
                for _ in 0..(extra + 11) {
                    out.push(0);
                }
            }
            _ => unreachable!("code-length symbol out of range"),
        }
        if out.len() >= total {
            break;
        }
    }
    out.truncate(total);
    out
}
