//! Kartenreferenz: bildet geografische Koordinaten auf den Pixel-Raum
//! der aktuell geladenen Hintergrundkarte ab.

use glam::{DVec2, Vec2};

use super::geodesy::{geo_to_mercator, GeoPoint};

/// Georeferenzierte Hintergrundkarte als reine Projektionsvorschrift.
///
/// `geo_to_local` ist eine totale Funktion der aktuellen Referenz; sie
/// schlägt nie fehl. Ein Wechsel der Referenz erfordert eine Neuprojektion
/// aller Live-Marker (siehe `MarkerOverlayEngine::set_map_reference`).
#[derive(Debug, Clone, PartialEq)]
pub struct MapReference {
    /// Nordwest-Ecke der Karte in Web-Mercator-Metern
    origin_mercator: DVec2,
    /// Meter pro Pixel
    pixel_size: f64,
    /// Anzeige-Skalierung des Hosts (Zoom-abhängig)
    display_scale: f64,
}

impl MapReference {
    /// Erstellt eine Referenz aus der Nordwest-Ecke und der Auflösung.
    pub fn new(northwest: GeoPoint, pixel_size: f64) -> Self {
        Self {
            origin_mercator: geo_to_mercator(&northwest),
            pixel_size: pixel_size.max(f64::EPSILON),
            display_scale: 1.0,
        }
    }

    /// Erstellt eine Referenz aus dem Kartenzentrum und den Pixel-Maßen.
    pub fn from_center(center: GeoPoint, pixel_size: f64, width_px: u32, height_px: u32) -> Self {
        let center_m = geo_to_mercator(&center);
        let half = DVec2::new(
            width_px as f64 * pixel_size / 2.0,
            height_px as f64 * pixel_size / 2.0,
        );
        Self {
            origin_mercator: DVec2::new(center_m.x - half.x, center_m.y + half.y),
            pixel_size: pixel_size.max(f64::EPSILON),
            display_scale: 1.0,
        }
    }

    /// Setzt die Anzeige-Skalierung (Builder-Stil).
    pub fn with_display_scale(mut self, display_scale: f64) -> Self {
        self.display_scale = display_scale.max(f64::EPSILON);
        self
    }

    /// Meter pro Pixel der Karte.
    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    /// Aktuelle Anzeige-Skalierung des Hosts.
    pub fn display_scale(&self) -> f64 {
        self.display_scale
    }

    /// Projiziert eine geografische Koordinate in lokale Pixel-Koordinaten.
    ///
    /// X wächst nach Osten, Y nach Süden (Raster-Konvention).
    pub fn geo_to_local(&self, geo: &GeoPoint) -> Vec2 {
        let m = geo_to_mercator(geo);
        Vec2::new(
            ((m.x - self.origin_mercator.x) / self.pixel_size) as f32,
            ((self.origin_mercator.y - m.y) / self.pixel_size) as f32,
        )
    }
}
