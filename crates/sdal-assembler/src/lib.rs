//! Region-file and global-index assembly: the parcel sequencer, the
//! topology ledger, and the cross-file indexes (`CARTOTOP.SDL`,
//! `KDTREE.SDL`, `POINAMES.SDL`, `POIGEOM.SDL`, `DENS{code}0/1.SDL`,
//! `REGION.SDL`/`REGIONS.SDL`, `INIT.SDL`, `MTOC.SDL`).

pub mod cartotop;
pub mod crc;
pub mod global_index;
pub mod init;
pub mod mtoc;
pub mod region;
pub mod region_oem;

pub use cartotop::{encode_cartotop, PID_CARTOTOP};
pub use crc::crc32_ieee;
pub use global_index::{
    disc_code_for_continent, encode_dens_body_sdl, encode_dens_header_sdl, encode_kdtree_sdl, encode_poigeom_sdl,
    encode_poinames_sdl,
};
pub use init::{encode_glb_media_header, encode_init_oem, encode_init_standard, encode_locale, encode_symbol_stub};
pub use mtoc::encode_mtoc;
pub use region::{encode_rgn_hdr, write_region_file, FormatMode, ParcelBuilder, ParcelPayload, TopologyEntry};
pub use region_oem::{encode_region_sdl, encode_regions_sdl, RegionInfo};
