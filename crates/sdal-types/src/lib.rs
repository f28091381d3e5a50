//! Numeric primitives and the parcel container shared by every other SDAL
//! crate: NTU coordinates, the Type-1/Type-4 variable-length codecs, the
//! MSB-first bit writer, canonical-Huffman balancing, and `PclHdr`.

pub mod bitwriter;
pub mod error;
pub mod huffman;
pub mod ntu;
pub mod parcel;
pub mod vlu;

pub use bitwriter::{BitReader, BitWriter};
pub use error::{SdalError, SdalResult};
pub use huffman::{assign_canonical_codes, build_canonical_codes, build_code_lengths, Code};
pub use ntu::{from_ntu, to_ntu};
pub use parcel::{decode_header, decode_parcel_id, encode_parcel, make_parcel_id, ParcelId, ParcelMeta, PclHdr, HEADER_LEN};
pub use vlu::{decode_type1, decode_type4, encode_type1, encode_type4, TYPE1_MAX, TYPE4_MAX};
