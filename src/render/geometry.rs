//! Geometrie-Konstruktion: Live-Record + Pixel-Maßstab → zeichenbare Form.
//!
//! Reine Funktionen ohne gehaltenen Zustand; für verschiedene Records
//! parallel aufrufbar. Die Formeln entsprechen der Raster-Konvention der
//! Kartenansicht (X nach Osten, Y nach Süden).

use glam::Vec2;

use crate::core::marker::{MarkerRecord, MarkerShape};
use crate::shared::options::OverlayOptions;

/// Achsen-paralleles Begrenzungsrechteck im Pixel-Raum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl PixelBounds {
    /// Rechteck um einen Mittelpunkt mit Halb-Ausdehnung.
    pub fn from_center_half_extent(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Kleinstes Rechteck um eine Punktmenge; `None` bei leerer Menge.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            bounds.min = bounds.min.min(*p);
            bounds.max = bounds.max.max(*p);
        }
        Some(bounds)
    }

    /// Vereinigung zweier Rechtecke.
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Rechteck um `margin` in alle Richtungen vergrößert.
    pub fn expanded(self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Prüft ob ein Punkt innerhalb liegt (inklusive Rand).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Mittelpunkt des Rechtecks.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }
}

/// Zeichenbare Form eines Markers im Pixel-Raum.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerGeometry {
    /// Ellipse um `center` (Sphere)
    Ellipse { center: Vec2, radii: Vec2 },
    /// Linienzug mit Strichbreite in Pixeln (LineStrip)
    Polyline { points: Vec<Vec2>, width: f32 },
    /// Zentriertes Text-Label (TextLabel)
    Text {
        center: Vec2,
        font_px: f32,
        text: String,
    },
    /// Keine Geometrie (unbekannte Shape)
    Empty,
}

/// Geschätzte Pixelbreite eines Texts.
///
/// Vorschub pro Glyphe = 6/7 der Schrifthöhe (5×7-Font-Konvention:
/// 5 Einheiten Glyphe + 1 Einheit Abstand bei 7 Einheiten Höhe).
pub fn text_width_px(text: &str, font_px: f32) -> f32 {
    text.chars().count() as f32 * font_px * 6.0 / 7.0
}

/// Baut die zeichenbare Form eines Records.
///
/// `pixel_size` ist der Meter-pro-Pixel-Maßstab der aktuellen Karte,
/// `display_scale` die Anzeige-Skalierung des Hosts (nur Text-Labels).
pub fn build_geometry(
    record: &MarkerRecord,
    pixel_size: f32,
    display_scale: f32,
    options: &OverlayOptions,
) -> MarkerGeometry {
    match record.shape {
        MarkerShape::Sphere => MarkerGeometry::Ellipse {
            center: record.local_position,
            radii: Vec2::new(
                record.scale.x / 2.0 / pixel_size,
                record.scale.y / 2.0 / pixel_size,
            ),
        },
        MarkerShape::LineStrip => {
            // Stützpunkte um -yaw rotieren, skalieren, an die lokale
            // Position verschieben
            let cosr = (-record.yaw).cos() as f32;
            let sinr = (-record.yaw).sin() as f32;
            let points = record
                .points
                .iter()
                .map(|p| {
                    let x = p.x * cosr + p.y * sinr;
                    let y = p.x * sinr - p.y * cosr;
                    record.local_position + Vec2::new(x / pixel_size, y / pixel_size)
                })
                .collect();
            MarkerGeometry::Polyline {
                points,
                width: record.scale.x / pixel_size,
            }
        }
        MarkerShape::TextLabel => MarkerGeometry::Text {
            center: record.local_position,
            font_px: (record.scale.z * display_scale * options.font_scale_factor)
                .max(options.min_font_px),
            text: record.text.clone(),
        },
        MarkerShape::Other(_) => MarkerGeometry::Empty,
    }
}

/// Begrenzungsrechteck einer Form; `None` für leere Geometrie.
pub fn geometry_bounds(geometry: &MarkerGeometry) -> Option<PixelBounds> {
    match geometry {
        MarkerGeometry::Ellipse { center, radii } => {
            Some(PixelBounds::from_center_half_extent(*center, *radii))
        }
        MarkerGeometry::Polyline { points, width } => {
            PixelBounds::from_points(points).map(|b| b.expanded(width / 2.0))
        }
        MarkerGeometry::Text {
            center,
            font_px,
            text,
        } => Some(PixelBounds::from_center_half_extent(
            *center,
            Vec2::new(text_width_px(text, *font_px) / 2.0, font_px / 2.0),
        )),
        MarkerGeometry::Empty => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geodesy::GeoPoint;
    use crate::core::marker::MarkerKey;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use std::time::{Duration, UNIX_EPOCH};

    fn record(shape: MarkerShape) -> MarkerRecord {
        MarkerRecord {
            key: MarkerKey::new("geom", 1),
            shape,
            color: [1.0, 1.0, 1.0, 1.0],
            scale: Vec3::new(4.0, 2.0, 1.5),
            points: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 5.0, 0.0),
            ],
            text: "Hallo".to_string(),
            publish_time: UNIX_EPOCH + Duration::from_secs(100),
            lifetime: Duration::ZERO,
            geo_position: GeoPoint::new(43.0, -70.0, 0.0),
            yaw: 0.0,
            local_position: Vec2::new(100.0, 200.0),
        }
    }

    #[test]
    fn test_sphere_radien_aus_scale_und_pixelgroesse() {
        let geometry = build_geometry(&record(MarkerShape::Sphere), 2.0, 1.0, &OverlayOptions::default());
        match geometry {
            MarkerGeometry::Ellipse { center, radii } => {
                assert_eq!(center, Vec2::new(100.0, 200.0));
                // scale.x/2 / pixel_size, scale.y/2 / pixel_size
                assert_relative_eq!(radii.x, 1.0);
                assert_relative_eq!(radii.y, 0.5);
            }
            other => panic!("Ellipse erwartet, war {:?}", other),
        }
    }

    #[test]
    fn test_linestrip_ohne_yaw() {
        let geometry = build_geometry(
            &record(MarkerShape::LineStrip),
            2.0,
            1.0,
            &OverlayOptions::default(),
        );
        match geometry {
            MarkerGeometry::Polyline { points, width } => {
                assert_relative_eq!(width, 2.0); // scale.x / pixel_size
                assert_eq!(points[0], Vec2::new(100.0, 200.0));
                assert_relative_eq!(points[1].x, 105.0);
                // y' = x·sin(0) - y·cos(0) = -y → Punkt (10,5) landet bei -2.5
                assert_relative_eq!(points[2].y, 197.5);
            }
            other => panic!("Polyline erwartet, war {:?}", other),
        }
    }

    #[test]
    fn test_linestrip_rotation_um_minus_yaw() {
        let mut rec = record(MarkerShape::LineStrip);
        rec.points = vec![Vec3::new(10.0, 0.0, 0.0)];
        rec.yaw = std::f64::consts::FRAC_PI_2;

        let geometry = build_geometry(&rec, 1.0, 1.0, &OverlayOptions::default());
        match geometry {
            MarkerGeometry::Polyline { points, .. } => {
                // x' = x·cos(-π/2) = 0, y' = x·sin(-π/2) = -10
                assert_relative_eq!(points[0].x - 100.0, 0.0, epsilon = 1e-4);
                assert_relative_eq!(points[0].y - 200.0, -10.0, epsilon = 1e-4);
            }
            other => panic!("Polyline erwartet, war {:?}", other),
        }
    }

    #[test]
    fn test_text_schriftgroesse_mit_untergrenze() {
        let opts = OverlayOptions::default();
        // scale.z=1.5, display_scale=2.0 → 1.5*2*10 = 30 px
        let geometry = build_geometry(&record(MarkerShape::TextLabel), 2.0, 2.0, &opts);
        match geometry {
            MarkerGeometry::Text { font_px, .. } => assert_relative_eq!(font_px, 30.0),
            other => panic!("Text erwartet, war {:?}", other),
        }

        // Winziger Maßstab → auf Untergrenze geklemmt
        let mut rec = record(MarkerShape::TextLabel);
        rec.scale.z = 0.01;
        let geometry = build_geometry(&rec, 2.0, 1.0, &opts);
        match geometry {
            MarkerGeometry::Text { font_px, .. } => assert_relative_eq!(font_px, opts.min_font_px),
            other => panic!("Text erwartet, war {:?}", other),
        }
    }

    #[test]
    fn test_unbekannte_shape_ohne_geometrie() {
        let geometry = build_geometry(
            &record(MarkerShape::Other(11)),
            2.0,
            1.0,
            &OverlayOptions::default(),
        );
        assert_eq!(geometry, MarkerGeometry::Empty);
        assert!(geometry_bounds(&geometry).is_none());
    }

    #[test]
    fn test_bounds_ellipse() {
        let bounds = geometry_bounds(&MarkerGeometry::Ellipse {
            center: Vec2::new(10.0, 10.0),
            radii: Vec2::new(2.0, 1.0),
        })
        .unwrap();
        assert_eq!(bounds.min, Vec2::new(8.0, 9.0));
        assert_eq!(bounds.max, Vec2::new(12.0, 11.0));
        assert!(bounds.contains(Vec2::new(10.0, 10.0)));
        assert!(!bounds.contains(Vec2::new(13.0, 10.0)));
    }

    #[test]
    fn test_bounds_polyline_mit_strichbreite() {
        let bounds = geometry_bounds(&MarkerGeometry::Polyline {
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 4.0)],
            width: 2.0,
        })
        .unwrap();
        assert_eq!(bounds.min, Vec2::new(-1.0, -1.0));
        assert_eq!(bounds.max, Vec2::new(11.0, 5.0));
    }

    #[test]
    fn test_bounds_union() {
        let a = PixelBounds::from_center_half_extent(Vec2::ZERO, Vec2::splat(1.0));
        let b = PixelBounds::from_center_half_extent(Vec2::new(10.0, 0.0), Vec2::splat(1.0));
        let u = a.union(b);
        assert_eq!(u.min, Vec2::new(-1.0, -1.0));
        assert_eq!(u.max, Vec2::new(11.0, 1.0));
    }

    #[test]
    fn test_textbreite_proportional_zur_schrifthoehe() {
        assert_relative_eq!(text_width_px("ab", 7.0), 12.0);
        assert_relative_eq!(text_width_px("", 7.0), 0.0);
    }
}
