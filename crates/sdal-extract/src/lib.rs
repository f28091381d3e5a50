//! External-collaborator traits and their default adapters: OSM/PBF road
//! and POI extraction, UTM reprojection, and ISO9660 image staging. The
//! core encoding crates never depend on this crate directly — only the
//! CLI wires a concrete adapter into the pipeline.

pub mod error;
pub mod image_writer;
pub mod osm;
pub mod projector;
pub mod traits;

pub use error::ExtractError;
pub use image_writer::FilesystemImageWriter;
pub use osm::{OsmPbfPoiSource, OsmPbfRoadSource};
pub use projector::UtmProjector;
pub use traits::{ImageWriter, PoiFeature, PoiSource, Projector, RoadFeature, RoadSource, DEFAULT_POI_TAGS};
