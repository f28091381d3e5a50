//! Payload encoders: strings, cartography, B-tree/POI-index,
//! KD-tree index, and density-tile parcels. Each returns raw payload
//! bytes; callers wrap them with `sdal_types::encode_parcel`.

pub mod cartography;
pub mod density;
pub mod kdindex;
pub mod poi_index;
pub mod strings;

pub use cartography::{encode_cartography_chunked, CartographyRecord};
pub use density::{encode_density_for_region, encode_density_header, encode_density_tiles, RegionDensityInput};
pub use kdindex::encode_kdtree_index_chunked;
pub use poi_index::encode_poi_index;
pub use strings::encode_strings_chunked;
