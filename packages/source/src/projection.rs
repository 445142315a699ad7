//! Planar projection applied to every coordinate on ingestion.
//!
//! Areas are only meaningful in a meter-based coordinate system. Inputs
//! that are already projected use [`Projection::Planar`]; geographic
//! (longitude/latitude) inputs are projected with a transverse Mercator
//! on the GRS80 ellipsoid, which covers the Finnish ETRS-GK zones.

use geo::{Coord, MapCoords, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

/// GRS80 semi-major axis in meters.
const GRS80_A: f64 = 6_378_137.0;
/// GRS80 flattening.
const GRS80_F: f64 = 1.0 / 298.257_222_101;

/// Coordinate transformation applied on ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// Coordinates are already planar meters; leave them untouched.
    #[default]
    Planar,
    /// ETRS-GK zone (e.g. 25 for EPSG:3879): central meridian at `zone`
    /// degrees east, scale 1, false easting `zone * 1e6 + 500 000`.
    EtrsGk {
        /// Zone number, equal to the central meridian in degrees.
        zone: u8,
    },
    /// Generic transverse Mercator from longitude/latitude degrees.
    TransverseMercator {
        /// Central meridian in degrees.
        central_meridian: f64,
        /// Scale factor on the central meridian.
        scale_factor: f64,
        /// False easting in meters.
        false_easting: f64,
        /// False northing in meters.
        false_northing: f64,
    },
}

impl Projection {
    /// ETRS-GK25, the Helsinki-area plane coordinate system (EPSG:3879).
    pub const ETRS_GK25: Self = Self::EtrsGk { zone: 25 };

    /// Projects a single coordinate.
    #[must_use]
    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        match *self {
            Self::Planar => coord,
            Self::EtrsGk { zone } => {
                let zone = f64::from(zone);
                transverse_mercator(coord, zone, 1.0, zone.mul_add(1_000_000.0, 500_000.0), 0.0)
            }
            Self::TransverseMercator {
                central_meridian,
                scale_factor,
                false_easting,
                false_northing,
            } => transverse_mercator(
                coord,
                central_meridian,
                scale_factor,
                false_easting,
                false_northing,
            ),
        }
    }

    /// Projects every vertex of a multipolygon.
    #[must_use]
    pub fn project_multi_polygon(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        if *self == Self::Planar {
            return geometry.clone();
        }
        geometry.map_coords(|c| self.project(c))
    }

    /// Projects every vertex of a polygon.
    #[must_use]
    pub fn project_polygon(&self, geometry: &Polygon<f64>) -> Polygon<f64> {
        if *self == Self::Planar {
            return geometry.clone();
        }
        geometry.map_coords(|c| self.project(c))
    }
}

/// Forward transverse Mercator (series expansion to sixth order in
/// longitude difference), `x` = longitude and `y` = latitude in degrees.
#[allow(clippy::many_single_char_names, clippy::suboptimal_flops)]
fn transverse_mercator(
    coord: Coord<f64>,
    central_meridian: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
) -> Coord<f64> {
    let e2 = 2.0 * GRS80_F - GRS80_F * GRS80_F;
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);

    let phi = coord.y.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = GRS80_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = (coord.x - central_meridian).to_radians() * cos_phi;

    let m = GRS80_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

    let x = k0
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0);
    let y = k0
        * (m + n
            * tan_phi
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

    Coord {
        x: false_easting + x,
        y: false_northing + y,
    }
}
