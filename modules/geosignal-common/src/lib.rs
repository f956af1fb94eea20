pub mod cancel;
pub mod config;
pub mod error;
pub mod health;
pub mod quality;
pub mod types;

pub use cancel::CancelToken;
pub use config::Config;
pub use error::GeoSignalError;
pub use health::HealthMonitor;
pub use quality::*;
pub use types::*;

/// Great-circle distance between two lat/lng points, in kilometers.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Straight-line distance in degrees, as used by the consolidator's proximity
/// clustering (§4.7) — not a great-circle distance, the spec's radius is defined
/// in degrees directly.
pub fn degree_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    ((lat1 - lat2).powi(2) + (lng1 - lng2).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_distance() {
        assert_eq!(haversine_km(48.5, 37.5, 48.5, 37.5), 0.0);
    }

    #[test]
    fn degree_distance_matches_pythagorean() {
        let d = degree_distance(0.0, 0.0, 3.0, 4.0);
        assert!((d - 5.0).abs() < 1e-9);
    }
}
