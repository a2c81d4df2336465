use serde::{Deserialize, Serialize};

/// Meters per degree of latitude, and per degree of longitude at the equator.
const METERS_PER_DEGREE: f64 = 111_000.0;

/// A geographic position in floating-point degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat { lon, lat }
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Ground distance in meters, using an equirectangular approximation with
    /// the longitude axis scaled by the cosine of this point's latitude.
    pub fn dist_meters(self, other: LonLat) -> f64 {
        let north = (other.lat - self.lat) * METERS_PER_DEGREE;
        let east = (other.lon - self.lon) * METERS_PER_DEGREE * self.lat.to_radians().cos();
        north.hypot(east)
    }

    /// Straight-line length in degree space. Only meaningful for comparing
    /// journeys within the same small region.
    pub fn degree_dist(self, other: LonLat) -> f64 {
        (other.lat - self.lat).hypot(other.lon - self.lon)
    }

    /// Squared degree-space distance, for sorting without the sqrt.
    pub fn dist2(self, other: LonLat) -> f64 {
        let dlat = other.lat - self.lat;
        let dlon = other.lon - self.lon;
        dlat * dlat + dlon * dlon
    }
}

/// The visible area: an immutable rectangle in geographic coordinates, set
/// once at startup.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> anyhow::Result<Bounds> {
        if min_lon >= max_lon || min_lat >= max_lat {
            bail!(
                "Degenerate bounds: lon {} to {}, lat {} to {}",
                min_lon,
                max_lon,
                min_lat,
                max_lat
            );
        }
        Ok(Bounds {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        })
    }

    /// Centered on a home point, extending half a span in each direction.
    pub fn from_spans(home: LonLat, lon_span: f64, lat_span: f64) -> anyhow::Result<Bounds> {
        Bounds::new(
            home.lon - lon_span,
            home.lon + lon_span,
            home.lat - lat_span,
            home.lat + lat_span,
        )
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn contains(&self, pt: LonLat) -> bool {
        pt.lon >= self.min_lon
            && pt.lon <= self.max_lon
            && pt.lat >= self.min_lat
            && pt.lat <= self.max_lat
    }

    pub fn corners(&self) -> [LonLat; 4] {
        [
            LonLat::new(self.min_lon, self.min_lat),
            LonLat::new(self.min_lon, self.max_lat),
            LonLat::new(self.max_lon, self.min_lat),
            LonLat::new(self.max_lon, self.max_lat),
        ]
    }
}

/// Decompose a compass heading (degrees, 0 = north, clockwise positive) into
/// a (north, east) direction in degree space at the given latitude. The east
/// component is stretched by 1/cos(lat), matching how a fixed ground speed
/// covers longitude faster away from the equator.
pub fn heading_components(heading_degs: f64, at_lat: f64) -> (f64, f64) {
    let rad = heading_degs.to_radians();
    let cos_lat = at_lat.to_radians().cos();
    (rad.cos(), rad.sin() / cos_lat)
}

/// The compass heading (degrees in [0, 360)) pointing from one position to
/// another nearby one.
pub fn heading_between(from: LonLat, to: LonLat) -> f64 {
    let north = to.lat - from.lat;
    let east = (to.lon - from.lon) * from.lat.to_radians().cos();
    let degs = east.atan2(north).to_degrees();
    if degs < 0.0 {
        degs + 360.0
    } else {
        degs
    }
}
