use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use rayon::prelude::*;

use std::collections::HashMap;

use sdal_assembler::{
    cartotop, disc_code_for_continent, encode_dens_body_sdl, encode_dens_header_sdl, encode_init_oem,
    encode_init_standard, encode_kdtree_sdl, encode_mtoc, encode_poigeom_sdl, encode_poinames_sdl, encode_region_sdl,
    encode_regions_sdl, write_region_file, FormatMode, ParcelBuilder, ParcelPayload, RegionInfo, TopologyEntry,
};
use sdal_extract::{DEFAULT_POI_TAGS, ImageWriter, OsmPbfPoiSource, OsmPbfRoadSource, PoiFeature, PoiSource, Projector, RoadSource, UtmProjector};
use sdal_extract::FilesystemImageWriter;
use sdal_payloads::{CartographyRecord, RegionDensityInput};
use sdal_routing::{build_graph, select_scale_shift, RoadLineString};
use sdal_spatial::PoiPoint;
use sdal_types::to_ntu;

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum FormatModeArg {
    Oem,
    Sdal,
}

/// Encodes a set of region extracts into an SDAL 1.7 navigation disc image.
#[derive(Parser, Debug)]
#[command(name = "sdal", version)]
struct Args {
    /// Region slugs, e.g. `europe/cyprus`. Each is expected to have a
    /// cached `<slug>.osm.pbf` under `--work`.
    regions: Vec<String>,

    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value = "work")]
    work: PathBuf,

    /// Comma-separated supported language codes, e.g. `ENG,FRA,DEU`.
    #[arg(long, default_value = "")]
    supp_lang: String,

    #[arg(long, value_enum, default_value_t = FormatModeArg::Sdal)]
    format_mode: FormatModeArg,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct RegionOutput {
    index: usize,
    file_name: String,
    native_name: String,
    continent: String,
    topology: Vec<TopologyEntry>,
    pois: Vec<PoiFeature>,
    density: RegionDensityInput,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    fs::create_dir_all(&args.work).context("creating work directory")?;
    fs::create_dir_all(&args.out).context("creating output directory")?;

    let mode = match args.format_mode {
        FormatModeArg::Oem => FormatMode::Oem,
        FormatModeArg::Sdal => FormatMode::Standard,
    };
    let supported_langs: Vec<String> = args.supp_lang.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect();

    info!("encoding {} region(s) in {:?} mode", args.regions.len(), args.format_mode);

    // Parallel per-region encoding; order is recovered below, not assumed
    // from completion order.
    let results: Vec<Option<RegionOutput>> = args
        .regions
        .par_iter()
        .enumerate()
        .map(|(index, slug)| match process_region(index, slug, &args.work, mode) {
            Ok(output) => Some(output),
            Err(e) => {
                error!("region={slug}: {e:#}");
                None
            }
        })
        .collect();

    let mut indexed: Vec<RegionOutput> = results.into_iter().flatten().collect();
    indexed.sort_by_key(|r| r.index);

    if indexed.len() != args.regions.len() {
        anyhow::bail!("{} of {} region(s) failed to encode", args.regions.len() - indexed.len(), args.regions.len());
    }

    let mut topology = Vec::new();
    let mut region_file_names = Vec::new();
    let mut region_infos = Vec::new();
    for r in &indexed {
        topology.extend(r.topology.iter().cloned());
        region_file_names.push(r.file_name.clone());
        region_infos.push(RegionInfo { native_name: r.native_name.clone(), translations: Default::default() });
    }

    let mut written_files = Vec::new();
    for r in &indexed {
        written_files.push(args.work.join(&r.file_name));
    }

    let cartotop_bytes = cartotop::encode_cartotop(&topology);
    written_files.push(write_sibling(&args.work, "CARTOTOP.SDL", &cartotop_bytes)?);

    let region_sdl = encode_region_sdl("World", &supported_langs, &region_infos);
    written_files.push(write_sibling(&args.work, "REGION.SDL", &region_sdl)?);
    let regions_sdl = encode_regions_sdl(&region_infos, &supported_langs);
    written_files.push(write_sibling(&args.work, "REGIONS.SDL", &regions_sdl)?);

    // POIs form a single global set: index is a dense sequence starting at
    // 0, assigned here in region order, not per-region.
    let mut poi_names = Vec::new();
    let mut poi_points = Vec::new();
    for r in &indexed {
        for p in &r.pois {
            let index = poi_points.len() as u32;
            poi_points.push(PoiPoint { index, lon: p.lon, lat: p.lat });
            poi_names.push(p.name.clone());
        }
    }

    let kdtree_bytes = encode_kdtree_sdl(&poi_points)?;
    written_files.push(write_sibling(&args.work, "KDTREE.SDL", &kdtree_bytes)?);
    let poinames_bytes = encode_poinames_sdl(&poi_names)?;
    written_files.push(write_sibling(&args.work, "POINAMES.SDL", &poinames_bytes)?);
    let poigeom_bytes = encode_poigeom_sdl(&poi_points)?;
    written_files.push(write_sibling(&args.work, "POIGEOM.SDL", &poigeom_bytes)?);

    // Density tiles are grouped by disc code (continent of the region
    // that produced them), not by input region, then each group's tiles
    // are concatenated in input order.
    let mut dens_groups: HashMap<String, Vec<RegionDensityInput>> = HashMap::new();
    for r in &indexed {
        let code = disc_code_for_continent(&r.continent);
        dens_groups.entry(code).or_default().push(r.density.clone());
    }
    let mut dens_codes: Vec<&String> = dens_groups.keys().collect();
    dens_codes.sort();
    let mut dens_file_names = Vec::new();
    for code in dens_codes {
        let regions = &dens_groups[code];
        let (_, tile_count) = sdal_payloads::encode_density_tiles(regions);
        let dens0 = encode_dens_header_sdl(tile_count)?;
        let dens1 = encode_dens_body_sdl(regions);
        let name0 = format!("DENS{code}0.SDL");
        let name1 = format!("DENS{code}1.SDL");
        written_files.push(write_sibling(&args.work, &name0, &dens0)?);
        written_files.push(write_sibling(&args.work, &name1, &dens1)?);
        dens_file_names.push(name0);
        dens_file_names.push(name1);
    }

    match mode {
        FormatMode::Standard => {
            let parcels = encode_init_standard(indexed.len() as u16, 1, 2, &[])?;
            let mut init_bytes = Vec::new();
            for p in parcels {
                init_bytes.extend_from_slice(&p);
            }
            written_files.push(write_sibling(&args.work, "INIT.SDL", &init_bytes)?);
        }
        FormatMode::Oem => {
            let init_bytes = encode_init_oem(&[], &[], &[]);
            written_files.push(write_sibling(&args.work, "INIT.SDL", &init_bytes)?);
        }
    }

    let mut mtoc_names: Vec<String> = vec![
        "CARTOTOP.SDL".to_string(),
        "KDTREE.SDL".to_string(),
        "POINAMES.SDL".to_string(),
        "POIGEOM.SDL".to_string(),
        "INIT.SDL".to_string(),
    ];
    mtoc_names.extend(dens_file_names.iter().cloned());
    mtoc_names.extend(region_file_names.iter().cloned());
    let mtoc_bytes = encode_mtoc(&mtoc_names);
    written_files.push(write_sibling(&args.work, "MTOC.SDL", &mtoc_bytes)?);

    let volume_id = chrono::Local::now().format("%y%m%d_%H").to_string();
    let writer = FilesystemImageWriter;
    writer
        .write_iso(&written_files, &args.out, &volume_id)
        .context("writing ISO9660 image")?;

    info!("wrote {} file(s) to {}", written_files.len(), args.out.display());
    Ok(())
}

fn write_sibling(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn process_region(index: usize, slug: &str, work_dir: &Path, mode: FormatMode) -> Result<RegionOutput> {
    let native_name = slug.rsplit('/').next().unwrap_or(slug).to_string();
    let continent = slug.split('/').next().unwrap_or(slug).to_string();
    let pbf_path = work_dir.join(format!("{}.osm.pbf", slug.replace('/', "_")));

    let road_source = OsmPbfRoadSource;
    let poi_source = OsmPbfPoiSource;
    let roads = road_source.load_roads(&pbf_path).with_context(|| format!("region={slug}: loading roads"))?;
    let pois = poi_source
        .load_pois(&pbf_path, DEFAULT_POI_TAGS)
        .with_context(|| format!("region={slug}: loading POIs"))?;

    let bbox = region_bbox(&roads, &pois);

    let cartography: Vec<CartographyRecord> = roads
        .iter()
        .map(|r| CartographyRecord {
            way_id: r.way_id,
            coords: r.lines.first().map(|line| line.iter().map(|&(lon, lat)| (to_ntu(lon), to_ntu(lat))).collect()).unwrap_or_default(),
        })
        .collect();

    let lines: Vec<RoadLineString> = roads
        .iter()
        .filter_map(|r| r.lines.first().map(|points| RoadLineString { speed_class: r.speed_class, oneway: r.oneway, points: points.clone() }))
        .collect();
    let graph = build_graph(&lines);
    let scale_shift = select_scale_shift(&graph.nodes);

    let projector = UtmProjector;
    let (zone, _epsg) = projector.select_utm_zone(bbox);
    let projected_lines: Vec<Vec<(f64, f64)>> = lines.iter().map(|l| projector.reproject(&l.points, zone)).collect();
    let projected_bbox = projected_bounds(&projected_lines);
    let density_input = RegionDensityInput { lines: projected_lines, bbox: projected_bbox };

    let mut builders = Vec::new();
    for chunk in cartography.chunks(sdal_payloads::cartography::CHUNK_SIZE) {
        builders.push(ParcelBuilder {
            pid: None,
            desc: 0,
            ptype: 1,
            layer_type: 1,
            rect: bbox_to_ntu_rect(bbox),
            scale_min: 0,
            scale_max: 0xFFFF,
            redundancy: false,
            external: false,
            payload: ParcelPayload::Carto(chunk.to_vec()),
        });
    }

    if !graph.nodes.is_empty() {
        builders.push(ParcelBuilder {
            pid: None,
            desc: 4,
            ptype: 4,
            layer_type: 2,
            rect: bbox_to_ntu_rect(bbox),
            scale_min: 0,
            scale_max: 0xFFFF,
            redundancy: false,
            external: false,
            payload: ParcelPayload::Routing { nodes: graph.nodes, segments: graph.segments, scale_shift },
        });
    } else {
        warn!("region={slug}: no routable roads extracted");
    }

    let mut topology = Vec::new();
    let db_id = (index + 1) as u32;
    let file_name = format!("R{:04}.SDL", db_id);
    let file_bytes = write_region_file(db_id, &file_name, db_id as u8, mode, &builders, &mut topology)?;
    fs::write(work_dir.join(&file_name), file_bytes)?;

    Ok(RegionOutput { index, file_name, native_name, continent, topology, pois, density: density_input })
}

fn region_bbox(roads: &[sdal_extract::RoadFeature], pois: &[sdal_extract::PoiFeature]) -> (f64, f64, f64, f64) {
    let mut min_lon = f64::MAX;
    let mut min_lat = f64::MAX;
    let mut max_lon = f64::MIN;
    let mut max_lat = f64::MIN;
    let mut touch = |lon: f64, lat: f64| {
        min_lon = min_lon.min(lon);
        min_lat = min_lat.min(lat);
        max_lon = max_lon.max(lon);
        max_lat = max_lat.max(lat);
    };
    for r in roads {
        for line in &r.lines {
            for &(lon, lat) in line {
                touch(lon, lat);
            }
        }
    }
    for p in pois {
        touch(p.lon, p.lat);
    }
    if min_lon > max_lon {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (min_lon, min_lat, max_lon, max_lat)
    }
}

fn projected_bounds(lines: &[Vec<(f64, f64)>]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for line in lines {
        for &(x, y) in line {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x > max_x {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (min_x, min_y, max_x, max_y)
    }
}

fn bbox_to_ntu_rect(bbox: (f64, f64, f64, f64)) -> (i32, i32, i32, i32) {
    let (min_lon, min_lat, max_lon, max_lat) = bbox;
    (to_ntu(min_lon), to_ntu(min_lat), to_ntu(max_lon), to_ntu(max_lat))
}
