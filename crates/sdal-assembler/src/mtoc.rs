//! `MTOC.SDL`: the master table of contents listing every
//! SDL file on the disc, by name, in emission order.

pub const FILE_LEN: usize = 4096;
const LEADING_ZEROS: usize = 64;
const RECORD_LEN: usize = 64;
const NAME_OFFSET: usize = 8;
const NAME_LEN: usize = 16;
const TYPE_OFFSET: usize = 28;
const SEQ_OFFSET: usize = 29;

/// Type marker byte for a file name, derived from its suffix.
fn type_marker(file_name: &str) -> u8 {
    let upper = file_name.to_ascii_uppercase();
    if upper.ends_with("0.SDL") || upper.ends_with("1.SDL") {
        return b'M'; // MAP marker
    }
    match upper.split('.').next().unwrap_or("") {
        "CARTOTOP" => b'T',
        "INIT" => b'I',
        "MTOC" => b'C',
        "REGION" | "REGIONS" => b'R',
        _ => b'D',
    }
}

fn encode_record(file_name: &str, sequence: u32) -> [u8; RECORD_LEN] {
    let mut rec = [0u8; RECORD_LEN];
    let upper = file_name.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    let n = bytes.len().min(NAME_LEN);
    rec[NAME_OFFSET..NAME_OFFSET + n].copy_from_slice(&bytes[..n]);
    rec[TYPE_OFFSET] = type_marker(file_name);

    let seq_bytes = sequence.to_be_bytes(); // take the low 3 bytes, big-endian
    rec[SEQ_OFFSET..SEQ_OFFSET + 3].copy_from_slice(&seq_bytes[1..4]);
    rec
}

/// Assemble MTOC.SDL from the ordered list of file names written to the
/// disc image. CARTOTOP and INIT/MTOC themselves are listed alongside
/// every region file.
pub fn encode_mtoc(file_names: &[String]) -> Vec<u8> {
    let mut out = vec![0u8; LEADING_ZEROS];
    for (i, name) in file_names.iter().enumerate() {
        let record = encode_record(name, (i + 1) as u32);
        out.extend_from_slice(&record);
    }
    out.resize(FILE_LEN, 0);
    out.truncate(FILE_LEN);
    out
}
