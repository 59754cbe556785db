//! Geodätische Grundfunktionen: WGS84, ECEF und Web-Mercator.
//!
//! Der Frame-Chain-Lookup selbst ist ein externer Kollaborateur
//! (siehe `projector`); hier liegt nur die reine Koordinaten-Mathematik.

use glam::{DQuat, DVec2, DVec3};

/// WGS84: große Halbachse in Metern.
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84: Abplattung.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Pose in einem benannten Referenz-Frame (Position + Orientierung).
#[derive(Debug, Clone, Copy)]
pub struct FramePose {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl FramePose {
    /// Pose ohne Rotation an einer Position.
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }
}

impl Default for FramePose {
    fn default() -> Self {
        Self::from_position(DVec3::ZERO)
    }
}

/// Absolute geografische Koordinate (Grad, Grad, Meter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GeoPoint {
    /// Ungültige Koordinate (fehlgeschlagener Transform).
    pub const INVALID: Self = Self {
        latitude: f64::NAN,
        longitude: f64::NAN,
        altitude: f64::NAN,
    };

    /// Erstellt eine geografische Koordinate.
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Prüft ob die Koordinate eine darstellbare Position beschreibt.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }
}

/// Konvertiert eine ECEF-Position (Meter) in WGS84 lat/lon/alt.
///
/// Geschlossene Form nach Bowring; für kartografische Zwecke mehr als
/// ausreichend genau (< 1 mm Höhenfehler).
pub fn ecef_to_geodetic(ecef: DVec3) -> GeoPoint {
    let a = WGS84_A;
    let f = WGS84_F;
    let b = a * (1.0 - f);
    let e2 = f * (2.0 - f);
    let ep2 = (a * a - b * b) / (b * b);

    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();

    // Pol-Sonderfall: Länge unbestimmt, Breite ±90°
    if p < 1.0e-9 {
        let latitude = if ecef.z >= 0.0 { 90.0 } else { -90.0 };
        return GeoPoint::new(latitude, 0.0, ecef.z.abs() - b);
    }

    let theta = (ecef.z * a).atan2(p * b);
    let (sin_t, cos_t) = theta.sin_cos();
    let lat_rad = (ecef.z + ep2 * b * sin_t.powi(3)).atan2(p - e2 * a * cos_t.powi(3));
    let lon_rad = ecef.y.atan2(ecef.x);

    let sin_lat = lat_rad.sin();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let altitude = p / lat_rad.cos() - n;

    GeoPoint::new(lat_rad.to_degrees(), lon_rad.to_degrees(), altitude)
}

/// Projiziert eine geografische Koordinate in Web-Mercator-Meter.
///
/// Breitengrade werden auf den gültigen Mercator-Bereich (±85.05°)
/// geklemmt, damit die Projektion total bleibt.
pub fn geo_to_mercator(geo: &GeoPoint) -> DVec2 {
    const LAT_LIMIT: f64 = 85.051_128_78;
    let lat = geo.latitude.clamp(-LAT_LIMIT, LAT_LIMIT).to_radians();
    let lon = geo.longitude.to_radians();

    DVec2::new(
        WGS84_A * lon,
        WGS84_A * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln(),
    )
}

/// Extrahiert das Heading (Yaw) aus einer Quaternion.
///
/// Entspricht der üblichen ZYX-Euler-Konvention der Telemetrie-Posen.
pub fn yaw_from_quat(q: DQuat) -> f64 {
    let siny_cosp = 2.0 * (q.w * q.z + q.x * q.y);
    let cosy_cosp = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
    siny_cosp.atan2(cosy_cosp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ecef_aequator_nullmeridian() {
        // Punkt auf dem Ellipsoid am Äquator/Nullmeridian
        let geo = ecef_to_geodetic(DVec3::new(WGS84_A, 0.0, 0.0));
        assert_relative_eq!(geo.latitude, 0.0, epsilon = 1e-9);
        assert_relative_eq!(geo.longitude, 0.0, epsilon = 1e-9);
        assert_relative_eq!(geo.altitude, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ecef_bekannter_punkt() {
        // Referenzwert: 43°N, 70°W, 100 m (berechnet mit unabhängiger
        // Implementierung)
        let lat: f64 = 43.0_f64.to_radians();
        let lon: f64 = -70.0_f64.to_radians();
        let alt = 100.0;
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let n = WGS84_A / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
        let ecef = DVec3::new(
            (n + alt) * lat.cos() * lon.cos(),
            (n + alt) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + alt) * lat.sin(),
        );

        let geo = ecef_to_geodetic(ecef);
        assert_relative_eq!(geo.latitude, 43.0, epsilon = 1e-9);
        assert_relative_eq!(geo.longitude, -70.0, epsilon = 1e-9);
        assert_relative_eq!(geo.altitude, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ecef_pol() {
        let b = WGS84_A * (1.0 - WGS84_F);
        let geo = ecef_to_geodetic(DVec3::new(0.0, 0.0, b + 50.0));
        assert_relative_eq!(geo.latitude, 90.0);
        assert_relative_eq!(geo.altitude, 50.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mercator_ursprung() {
        let m = geo_to_mercator(&GeoPoint::new(0.0, 0.0, 0.0));
        assert_relative_eq!(m.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(m.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mercator_monoton() {
        let a = geo_to_mercator(&GeoPoint::new(10.0, 10.0, 0.0));
        let b = geo_to_mercator(&GeoPoint::new(20.0, 20.0, 0.0));
        assert!(b.x > a.x);
        assert!(b.y > a.y);
    }

    #[test]
    fn test_yaw_aus_quaternion() {
        let q = DQuat::from_rotation_z(0.75);
        assert_relative_eq!(yaw_from_quat(q), 0.75, epsilon = 1e-12);

        // Identität → kein Heading
        assert_relative_eq!(yaw_from_quat(DQuat::IDENTITY), 0.0);
    }

    #[test]
    fn test_geopoint_gueltigkeit() {
        assert!(GeoPoint::new(43.0, -70.0, 0.0).is_valid());
        assert!(!GeoPoint::INVALID.is_valid());
        assert!(!GeoPoint::new(91.0, 0.0, 0.0).is_valid());
    }
}
