//! Distance orthodromique (formule de haversine)

use geo::Point;

/// Rayon terrestre utilisé pour les regroupements (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance haversine en kilomètres entre deux points (x = longitude, y = latitude, en degrés)
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let d_lat = (b.y() - a.y()).to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
