use serde::Serialize;

use crate::geo::{Bounds, LonLat};

/// A position in viewport pixels. The origin is the top-left corner, so north
/// is a smaller y.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScreenPt {
    pub x: f64,
    pub y: f64,
}

impl ScreenPt {
    pub fn new(x: f64, y: f64) -> ScreenPt {
        ScreenPt { x, y }
    }
}

/// Affine mapping between the bounding region and the viewport, per axis.
/// Both directions are pure; inputs outside the region extrapolate rather
/// than fail, since exit points land exactly on a boundary.
#[derive(Clone, Debug)]
pub struct Projector {
    bounds: Bounds,
    width: f64,
    height: f64,
}

impl Projector {
    pub fn new(bounds: Bounds, width: f64, height: f64) -> Projector {
        Projector {
            bounds,
            width,
            height,
        }
    }

    /// The viewport changed size. Trajectories are defined in geographic
    /// coordinates, so nothing else needs to restart; subsequent frames
    /// re-project under the new dimensions.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn to_screen(&self, pt: LonLat) -> ScreenPt {
        let x = (pt.lon - self.bounds.min_lon) / self.bounds.lon_span() * self.width;
        let y = (1.0 - (pt.lat - self.bounds.min_lat) / self.bounds.lat_span()) * self.height;
        ScreenPt::new(x, y)
    }

    pub fn to_geo(&self, pt: ScreenPt) -> LonLat {
        let lon = self.bounds.min_lon + pt.x / self.width * self.bounds.lon_span();
        let lat = self.bounds.min_lat + (1.0 - pt.y / self.height) * self.bounds.lat_span();
        LonLat::new(lon, lat)
    }
}
