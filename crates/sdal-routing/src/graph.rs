//! Node/segment graph construction from road line-strings.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct RoadLineString {
    pub speed_class: u8,
    pub oneway: bool,
    /// `(lon, lat)` vertices in degrees, in line order.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub node_id: u32,
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub segment_ids: Vec<u32>,
    pub seg_base_index: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub seg_id: u32,
    pub from_node_id: u32,
    pub to_node_id: u32,
    pub length_m: f32,
    pub speed_class: u8,
    pub oneway: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RoutingGraph {
    pub nodes: Vec<Node>,
    pub segments: Vec<Segment>,
}

/// Euclidean approximation used by the source builder: longitude degrees
/// scaled by 111,320m·cos(mean latitude), latitude degrees scaled by a
/// fixed 110,540m/degree.
fn segment_length_m(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> f32 {
    let mean_lat_rad = ((lat0 + lat1) / 2.0).to_radians();
    let dx = (lon1 - lon0) * 111_320.0 * mean_lat_rad.cos();
    let dy = (lat1 - lat0) * 110_540.0;
    (dx * dx + dy * dy).sqrt() as f32
}

/// Build a graph from a region's road line-strings. Vertices are deduped
/// by exact `(lon, lat)` float pair; node IDs are assigned in first-seen
/// (insertion) order.
pub fn build_graph(lines: &[RoadLineString]) -> RoutingGraph {
    let mut node_index: HashMap<(u64, u64), u32> = HashMap::new();
    let mut nodes: Vec<Node> = Vec::new();
    let mut segments: Vec<Segment> = Vec::new();

    for line in lines {
        let mut prev_id: Option<u32> = None;
        for &(lon, lat) in &line.points {
            let key = (lon.to_bits(), lat.to_bits());
            let node_id = *node_index.entry(key).or_insert_with(|| {
                let id = nodes.len() as u32;
                nodes.push(Node {
                    node_id: id,
                    lon_deg: lon,
                    lat_deg: lat,
                    segment_ids: Vec::new(),
                    seg_base_index: 0,
                });
                id
            });

            if let Some(pid) = prev_id {
                if pid != node_id {
                    let (plon, plat) = (nodes[pid as usize].lon_deg, nodes[pid as usize].lat_deg);
                    let length_m = segment_length_m(plon, plat, lon, lat);
                    let seg_id = segments.len() as u32;
                    segments.push(Segment {
                        seg_id,
                        from_node_id: pid,
                        to_node_id: node_id,
                        length_m,
                        speed_class: line.speed_class,
                        oneway: line.oneway,
                    });
                    nodes[pid as usize].segment_ids.push(seg_id);
                    nodes[node_id as usize].segment_ids.push(seg_id);
                }
            }
            prev_id = Some(node_id);
        }
    }

    let mut base = 0u32;
    for node in nodes.iter_mut() {
        node.seg_base_index = base;
        base += node.segment_ids.len() as u32;
    }

    RoutingGraph { nodes, segments }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_shared_vertices_across_lines() {
        let lines = vec![
            RoadLineString {
                speed_class: 3,
                oneway: false,
                points: vec![(2.0, 48.0), (2.001, 48.001)],
            },
            RoadLineString {
                speed_class: 3,
                oneway: false,
                points: vec![(2.001, 48.001), (2.002, 48.002)],
            },
        ];
        let graph = build_graph(&lines);
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.segments.len(), 2);
        // the shared vertex must reference both segments.
        assert_eq!(graph.nodes[1].segment_ids.len(), 2);
    }

    #[test]
    fn every_segment_endpoint_exists_as_a_node() {
        let lines = vec![RoadLineString {
            speed_class: 1,
            oneway: true,
            points: vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)],
        }];
        let graph = build_graph(&lines);
        for seg in &graph.segments {
            assert!((seg.from_node_id as usize) < graph.nodes.len());
            assert!((seg.to_node_id as usize) < graph.nodes.len());
        }
    }

    #[test]
    fn degenerate_repeated_vertex_yields_no_zero_length_segment() {
        let lines = vec![RoadLineString {
            speed_class: 1,
            oneway: false,
            points: vec![(5.0, 5.0), (5.0, 5.0), (6.0, 6.0)],
        }];
        let graph = build_graph(&lines);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.segments.len(), 1);
    }
}
