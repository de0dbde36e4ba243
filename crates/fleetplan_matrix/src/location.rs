use geo::{Distance, Haversine};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self {
            point: geo::Point::new(lng, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lng(&self) -> f64 {
        self.point.x()
    }

    /// Great-circle distance in kilometers.
    pub fn haversine_km(&self, to: &Location) -> f64 {
        Haversine.distance(self.point, to.point) / 1000.0
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_km() {
        let a = Location::from_lat_lng(0.0, 0.0);
        let b = Location::from_lat_lng(1.0, 0.0);

        // One degree of latitude is roughly 111.2 km.
        let distance = a.haversine_km(&b);
        assert!((distance - 111.19).abs() < 0.1, "got {distance}");
        assert_eq!(a.haversine_km(&a), 0.0);
    }

    #[test]
    fn test_lat_lng_order() {
        let location = Location::from_lat_lng(50.85, 4.35);
        assert_eq!(location.lat(), 50.85);
        assert_eq!(location.lng(), 4.35);
    }
}
