//! Default geo-extractor adapters over `osmpbf`: a two-pass node/way scan,
//! filtering ways to routable highway classes and nodes/ways to the default
//! POI tag set.

use std::path::Path;

use hashbrown::HashMap;
use log::info;
use osmpbf::{Element, ElementReader};

use sdal_types::SdalResult;

use crate::error::ExtractError;
use crate::traits::{PoiFeature, PoiSource, RoadFeature, RoadSource};

fn highway_class(kind: &str) -> Option<(u8, bool)> {
    let class = match kind {
        "motorway" | "motorway_link" => 1,
        "trunk" | "trunk_link" => 2,
        "primary" | "primary_link" => 3,
        "secondary" | "secondary_link" => 4,
        "tertiary" | "tertiary_link" => 5,
        "residential" | "living_street" => 6,
        "service" | "unclassified" => 7,
        "track" | "path" | "footway" | "cycleway" => 8,
        _ => return None,
    };
    Some((class, kind.ends_with("_link")))
}

#[derive(Default)]
pub struct OsmPbfRoadSource;

impl RoadSource for OsmPbfRoadSource {
    fn load_roads(&self, pbf_path: &Path) -> SdalResult<Vec<RoadFeature>> {
        let path_str = pbf_path.display().to_string();

        // Pass 1: index every node's coordinates.
        let mut nodes: HashMap<i64, (f64, f64)> = HashMap::new();
        ElementReader::from_path(pbf_path)
            .map_err(|e| ExtractError::PbfRead { path: path_str.clone(), source: e })?
            .for_each(|elem| {
                let (id, lon, lat) = match elem {
                    Element::Node(n) => (n.id(), n.lon(), n.lat()),
                    Element::DenseNode(n) => (n.id(), n.lon(), n.lat()),
                    _ => return,
                };
                nodes.insert(id, (lon, lat));
            })
            .map_err(|e| ExtractError::PbfRead { path: path_str.clone(), source: e })?;

        // Pass 2: classify ways, resolve their node refs to coordinates.
        let mut roads = Vec::new();
        ElementReader::from_path(pbf_path)
            .map_err(|e| ExtractError::PbfRead { path: path_str.clone(), source: e })?
            .for_each(|elem| {
                let Element::Way(way) = elem else { return };
                let highway = way.tags().find_map(|(k, v)| (k == "highway").then_some(v));
                let Some(highway) = highway else { return };
                let Some((speed_class, oneway_from_link)) = highway_class(highway) else { return };
                let oneway = oneway_from_link
                    || way.tags().any(|(k, v)| k == "oneway" && (v == "yes" || v == "1"));
                let name = way
                    .tags()
                    .find_map(|(k, v)| (k == "name").then(|| v.to_string()))
                    .unwrap_or_default();

                let mut line = Vec::with_capacity(way.refs().len());
                for node_ref in way.refs() {
                    if let Some(&coord) = nodes.get(&node_ref) {
                        line.push(coord);
                    }
                }
                if line.len() >= 2 {
                    roads.push(RoadFeature {
                        way_id: way.id() as u32,
                        name,
                        speed_class,
                        oneway,
                        lines: vec![line],
                    });
                }
            })
            .map_err(|e| ExtractError::PbfRead { path: path_str.clone(), source: e })?;

        info!("loaded {} road features from {}", roads.len(), path_str);
        Ok(roads)
    }
}

#[derive(Default)]
pub struct OsmPbfPoiSource;

impl PoiSource for OsmPbfPoiSource {
    fn load_pois(&self, pbf_path: &Path, tag_set: &[&str]) -> SdalResult<Vec<PoiFeature>> {
        let path_str = pbf_path.display().to_string();

        // Node POIs, taken directly; way POIs, replaced by their centroid.
        let mut node_coords: HashMap<i64, (f64, f64)> = HashMap::new();
        let mut pois = Vec::new();

        ElementReader::from_path(pbf_path)
            .map_err(|e| ExtractError::PbfRead { path: path_str.clone(), source: e })?
            .for_each(|elem| {
                let (id, lon, lat, tags): (i64, f64, f64, Vec<(&str, &str)>) = match &elem {
                    Element::Node(n) => (n.id(), n.lon(), n.lat(), n.tags().collect()),
                    Element::DenseNode(n) => (n.id(), n.lon(), n.lat(), n.tags().collect()),
                    _ => return,
                };
                node_coords.insert(id, (lon, lat));

                if let Some(name) = poi_name_if_matches(&tags, tag_set) {
                    pois.push(PoiFeature { name, lon, lat });
                }
            })
            .map_err(|e| ExtractError::PbfRead { path: path_str.clone(), source: e })?;

        ElementReader::from_path(pbf_path)
            .map_err(|e| ExtractError::PbfRead { path: path_str.clone(), source: e })?
            .for_each(|elem| {
                let Element::Way(way) = elem else { return };
                let tags: Vec<(&str, &str)> = way.tags().collect();
                let Some(name) = poi_name_if_matches(&tags, tag_set) else { return };

                let mut sum_lon = 0.0;
                let mut sum_lat = 0.0;
                let mut n = 0u32;
                for node_ref in way.refs() {
                    if let Some(&(lon, lat)) = node_coords.get(&node_ref) {
                        sum_lon += lon;
                        sum_lat += lat;
                        n += 1;
                    }
                }
                if n > 0 {
                    pois.push(PoiFeature { name, lon: sum_lon / n as f64, lat: sum_lat / n as f64 });
                }
            })
            .map_err(|e| ExtractError::PbfRead { path: path_str.clone(), source: e })?;

        info!("loaded {} POI features from {}", pois.len(), path_str);
        Ok(pois)
    }
}

fn poi_name_if_matches(tags: &[(&str, &str)], tag_set: &[&str]) -> Option<String> {
    let matches = tags.iter().any(|(k, _)| tag_set.contains(k));
    if !matches {
        return None;
    }
    Some(
        tags.iter()
            .find_map(|(k, v)| (*k == "name").then(|| v.to_string()))
            .unwrap_or_default(),
    )
}
