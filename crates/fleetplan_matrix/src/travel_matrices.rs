use tracing::instrument;

use crate::{error::MatrixError, kmh::Kmh, location::Location};

pub type DistanceKm = f64;
pub type Minutes = i64;

/// Pairwise great-circle distances stored in a flat vector.
/// The entry for a pair of locations lives at `from * num_locations + to`.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: Vec<DistanceKm>,
    num_locations: usize,
}

impl TravelMatrices {
    #[instrument(skip_all, level = "debug", fields(locations = locations.len()))]
    pub fn from_haversine(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate().skip(i + 1) {
                let distance = from.haversine_km(to);
                distances[i * num_locations + j] = distance;
                distances[j * num_locations + i] = distance;
            }
        }

        TravelMatrices {
            distances,
            num_locations,
        }
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_locations + to
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    #[inline(always)]
    pub fn distance_km(&self, from: usize, to: usize) -> DistanceKm {
        self.distances[self.index(from, to)]
    }

    /// Travel minutes for every pair at a constant `speed`, rounded to whole minutes.
    pub fn travel_minutes(&self, speed: Kmh) -> Result<TravelTimeMatrix, MatrixError> {
        let speed = Kmh::try_new(speed.value())?;

        Ok(TravelTimeMatrix {
            minutes: self
                .distances
                .iter()
                .map(|&distance| speed.travel_minutes(distance).round() as Minutes)
                .collect(),
            num_locations: self.num_locations,
        })
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.num_locations).all(|i| {
            (0..self.num_locations).all(|j| self.distance_km(i, j) == self.distance_km(j, i))
        })
    }
}

#[derive(Debug, Clone)]
pub struct TravelTimeMatrix {
    minutes: Vec<Minutes>,
    num_locations: usize,
}

impl TravelTimeMatrix {
    #[inline(always)]
    pub fn minutes(&self, from: usize, to: usize) -> Minutes {
        self.minutes[from * self.num_locations + to]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations() -> Vec<Location> {
        vec![
            Location::from_lat_lng(0.0, 0.0),
            Location::from_lat_lng(0.5, 0.0),
            Location::from_lat_lng(0.5, 0.5),
        ]
    }

    #[test]
    fn test_diagonal_is_zero_and_symmetric() {
        let matrices = TravelMatrices::from_haversine(&locations());

        assert_eq!(matrices.num_locations(), 3);
        for i in 0..3 {
            assert_eq!(matrices.distance_km(i, i), 0.0);
        }
        assert!(matrices.is_symmetric());
        assert!(matrices.distance_km(0, 1) > 55.0);
    }

    #[test]
    fn test_travel_minutes_at_speed() {
        let matrices = TravelMatrices::from_haversine(&locations());
        let times = matrices.travel_minutes(Kmh::new(60.0)).unwrap();

        let expected = matrices.distance_km(0, 2).round() as i64;
        assert_eq!(times.minutes(0, 2), expected);
        assert_eq!(times.minutes(2, 0), expected);
        assert_eq!(times.minutes(1, 1), 0);
    }

    #[test]
    fn test_travel_minutes_rejects_zero_speed() {
        let matrices = TravelMatrices::from_haversine(&locations());
        assert!(matches!(
            matrices.travel_minutes(Kmh::new(0.0)),
            Err(MatrixError::InvalidSpeed(_))
        ));
    }
}
