//! Haversine travel-time matrix provider (fallback when OSRM is unavailable).
//!
//! Uses great-circle distance and an assumed speed, so it ignores roads.
//! Locations are `(lat, lng)`.

use std::convert::Infallible;

use rayon::prelude::*;

use crate::traits::DistanceMatrixProvider;
use crate::Minutes;

const DEFAULT_SPEED_KMH: f64 = 40.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);

        EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
    }

    fn km_to_minutes(&self, km: f64) -> Minutes {
        (km / self.speed_kmh * 60.0).round() as Minutes
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    type Error = Infallible;

    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<Minutes>>, Infallible> {
        let matrix: Vec<Vec<Minutes>> = locations
            .par_iter()
            .map(|&from| {
                locations
                    .iter()
                    .map(|&to| self.km_to_minutes(Self::haversine_km(from, to)))
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Las Vegas to Los Angeles is roughly 370 km.
        let dist = HaversineMatrix::haversine_km((36.17, -115.14), (34.05, -118.24));
        assert!(dist > 350.0 && dist < 400.0, "LV to LA should be ~370km, got {}", dist);
    }

    #[test]
    fn test_matrix_diagonal_is_zero_and_symmetric() {
        let provider = HaversineMatrix::default();
        let locations = vec![(36.1, -115.1), (36.2, -115.2), (36.3, -115.3)];
        let matrix = provider.matrix_for(&locations).unwrap();

        for i in 0..locations.len() {
            assert_eq!(matrix[i][i], 0);
        }
        assert_eq!(matrix[0][2], matrix[2][0]);
        assert!(matrix[0][2] > matrix[0][1]);
    }

    #[test]
    fn test_reasonable_travel_time() {
        // 10 km at 40 km/h is 15 minutes.
        assert_eq!(HaversineMatrix::new(40.0).km_to_minutes(10.0), 15);
    }
}
