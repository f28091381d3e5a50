//! The SDAL dialect of LZ77 + canonical-Huffman compression.
//!
//! Non-goal: this is not a general-purpose compressor and does not aim for
//! DEFLATE compatibility — only the SDAL bitstream layout.

pub mod codelen_rle;
pub mod encoder;
pub mod lz77;
pub mod tables;

pub use encoder::{compress, decompress, HuffOffsets};
pub use lz77::{detokenize, tokenize, Token};
