//! Mercator projection onto a fixed world map

use serde::{Deserialize, Serialize};

/// Sphere radius used by the map (metres)
pub const EARTH_RADIUS_M: f64 = 6_370_997.0;

/// Projected map position in metres from the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct MercatorProjection {
    pub lower_left_lat: f64,
    pub upper_right_lat: f64,
    pub lower_left_lon: f64,
    pub upper_right_lon: f64,
    /// Latitude of true scale
    pub lat_ts: f64,
}

impl Default for MercatorProjection {
    /// World map from 80S to 80N, true scale at 20 degrees
    fn default() -> Self {
        Self {
            lower_left_lat: -80.0,
            upper_right_lat: 80.0,
            lower_left_lon: -180.0,
            upper_right_lon: 180.0,
            lat_ts: 20.0,
        }
    }
}

impl MercatorProjection {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lower_left_lat..=self.upper_right_lat).contains(&latitude)
            && (self.lower_left_lon..=self.upper_right_lon).contains(&longitude)
    }

    /// Project a coordinate pair; `None` when it falls outside the map.
    pub fn project(&self, latitude: f64, longitude: f64) -> Option<Point> {
        if !self.contains(latitude, longitude) {
            return None;
        }
        Some(Point {
            x: self.raw_x(longitude) - self.raw_x(self.lower_left_lon),
            y: self.raw_y(latitude) - self.raw_y(self.lower_left_lat),
        })
    }

    /// Map extent in metres
    pub fn extent(&self) -> Point {
        Point {
            x: self.raw_x(self.upper_right_lon) - self.raw_x(self.lower_left_lon),
            y: self.raw_y(self.upper_right_lat) - self.raw_y(self.lower_left_lat),
        }
    }

    fn scale(&self) -> f64 {
        EARTH_RADIUS_M * self.lat_ts.to_radians().cos()
    }

    fn raw_x(&self, longitude: f64) -> f64 {
        self.scale() * longitude.to_radians()
    }

    fn raw_y(&self, latitude: f64) -> f64 {
        let phi = latitude.to_radians();
        self.scale() * (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln()
    }
}
