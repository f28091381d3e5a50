//! External-collaborator interfaces: geo-extractor, projection service, and
//! image writer. Core encoding crates depend on nothing in this module
//! directly; only `sdal-cli` wires a concrete adapter to the pipeline.

use std::path::{Path, PathBuf};

use sdal_types::SdalResult;

/// Default POI tag set consumed when no caller-supplied set is given.
pub const DEFAULT_POI_TAGS: &[&str] = &[
    "amenity",
    "shop",
    "tourism",
    "leisure",
    "historic",
    "office",
    "craft",
    "man_made",
    "healthcare",
    "sport",
    "emergency",
    "public_transport",
    "railway",
    "aeroway",
    "natural",
];

/// A road, named and classified, carried as one or more line-strings (a
/// `MultiLineString` collapses to several entries sharing `way_id`).
#[derive(Debug, Clone)]
pub struct RoadFeature {
    pub way_id: u32,
    pub name: String,
    pub speed_class: u8,
    pub oneway: bool,
    pub lines: Vec<Vec<(f64, f64)>>,
}

/// A point of interest. Non-point geometry is replaced by its centroid
/// before reaching this type.
#[derive(Debug, Clone)]
pub struct PoiFeature {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

pub trait RoadSource {
    fn load_roads(&self, pbf_path: &Path) -> SdalResult<Vec<RoadFeature>>;
}

pub trait PoiSource {
    fn load_pois(&self, pbf_path: &Path, tag_set: &[&str]) -> SdalResult<Vec<PoiFeature>>;
}

/// Given a bounding box in WGS84, select a UTM zone and reproject points
/// into it.
pub trait Projector {
    /// `z = floor((center_lon + 180) / 6) + 1`, EPSG `32600 + z`.
    fn select_utm_zone(&self, bbox: (f64, f64, f64, f64)) -> (u16, u32);

    fn reproject(&self, points: &[(f64, f64)], zone: u16) -> Vec<(f64, f64)>;
}

/// Produces an ISO9660 level-3 image from a set of staged input files.
pub trait ImageWriter {
    fn write_iso(&self, file_paths: &[PathBuf], out_path: &Path, volume_id: &str) -> SdalResult<()>;
}
