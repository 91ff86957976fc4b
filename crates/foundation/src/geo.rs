/// Geographic primitives (WGS84 degrees).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// Axis-aligned viewport bounds in degrees.
///
/// Convention matches the map provider: `south_west` is the minimum corner,
/// `north_east` the maximum. Antimeridian-crossing views are not modeled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl GeoBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        GeoBounds {
            south_west,
            north_east,
        }
    }

    /// Build bounds of `2*half_width x 2*half_height` degrees around a center.
    pub fn centered_at(center: LatLng, half_width: f64, half_height: f64) -> Self {
        GeoBounds {
            south_west: LatLng::new(center.lat - half_height, center.lng - half_width),
            north_east: LatLng::new(center.lat + half_height, center.lng + half_width),
        }
    }

    pub fn width(&self) -> f64 {
        (self.north_east.lng - self.south_west.lng).abs()
    }

    pub fn height(&self) -> f64 {
        (self.north_east.lat - self.south_west.lat).abs()
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) * 0.5,
            (self.south_west.lng + self.north_east.lng) * 0.5,
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }
}
