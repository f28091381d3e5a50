//! Default projection service: UTM zone selection plus a closed-form
//! forward transverse Mercator (Snyder's series, WGS84 ellipsoid) — no
//! `pyproj`/GDAL-equivalent crate appears anywhere in this corpus, so the
//! projection math is hand-rolled directly against the WGS84 constants
//! below.

use crate::traits::Projector;

pub mod wgs84 {
    pub const A: f64 = 6_378_137.0;
    pub const F: f64 = 1.0 / 298.257_223_563;
    pub const E2: f64 = F * (2.0 - F);
    pub const K0: f64 = 0.9996;
}

#[derive(Default)]
pub struct UtmProjector;

impl Projector for UtmProjector {
    fn select_utm_zone(&self, bbox: (f64, f64, f64, f64)) -> (u16, u32) {
        let (min_lon, _min_lat, max_lon, _max_lat) = bbox;
        let center_lon = 0.5 * (min_lon + max_lon);
        let z = ((center_lon + 180.0) / 6.0).floor() as i64 + 1;
        let zone = z.clamp(1, 60) as u16;
        (zone, 32600 + zone as u32)
    }

    fn reproject(&self, points: &[(f64, f64)], zone: u16) -> Vec<(f64, f64)> {
        let central_meridian = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;
        points
            .iter()
            .map(|&(lon, lat)| forward_tm(lat, lon, central_meridian))
            .collect()
    }
}

/// Forward transverse Mercator projection: (lat, lon) in degrees, relative
/// to `central_meridian_deg`, to (easting, northing) meters with the
/// standard 500,000 m false easting (no false northing: southern-hemisphere
/// offsetting is left to the caller, out of scope here).
fn forward_tm(lat_deg: f64, lon_deg: f64, central_meridian_deg: f64) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon_diff = (lon_deg - central_meridian_deg).to_radians();

    let e2 = wgs84::E2;
    let ep2 = e2 / (1.0 - e2);
    let (sin_lat, cos_lat) = lat.sin_cos();
    let tan_lat = lat.tan();

    let n = wgs84::A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = ep2 * cos_lat * cos_lat;
    let a = lon_diff * cos_lat;

    // Meridional arc length from the equator (Snyder eq. 3-21).
    let m = wgs84::A
        * ((1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e2 * e2 / 32.0 + 45.0 * e2 * e2 * e2 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e2 * e2 / 256.0 + 45.0 * e2 * e2 * e2 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e2 * e2 * e2 / 3072.0) * (6.0 * lat).sin());

    let easting = wgs84::K0
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + 500_000.0;

    let northing = wgs84::K0
        * (m + n
            * tan_lat
            * (a.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

    (easting, northing)
}
