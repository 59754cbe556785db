//! Render-Fassade des Overlays: aggregierte Bounds, Paint und Hit-Test.
//!
//! Die View hält keinen Marker-Zustand; Store und Kartenreferenz werden
//! pro Aufruf ausgeliehen (nur für die Dauer des Aufrufs).

use std::time::Duration;

use glam::Vec2;

use crate::core::map_reference::MapReference;
use crate::core::marker::{MarkerKey, MarkerShape};
use crate::core::store::MarkerStore;
use crate::render::geometry::{build_geometry, geometry_bounds, MarkerGeometry, PixelBounds};
use crate::render::surface::PaintSurface;
use crate::shared::options::OverlayOptions;
use crate::shared::throttle::LogThrottle;

/// Render-seitige Sicht auf den Live-Store.
pub struct OverlayView {
    visible: bool,
    unknown_shape_warn: LogThrottle,
}

impl OverlayView {
    /// Erstellt eine sichtbare View.
    pub fn new(options: &OverlayOptions) -> Self {
        Self {
            visible: true,
            unknown_shape_warn: LogThrottle::new(Duration::from_secs_f32(
                options.unknown_warn_secs.max(0.0),
            )),
        }
    }

    /// Schaltet die Sichtbarkeit um; unabhängig vom Store-Inhalt.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Aktuelle Sichtbarkeit.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Vereinigung der Begrenzungsrechtecke aller Live-Marker.
    ///
    /// `None` wenn das Overlay versteckt, der Store leer oder keine
    /// Karte geladen ist.
    pub fn bounding_rect(
        &self,
        store: &MarkerStore,
        map_reference: Option<&MapReference>,
        options: &OverlayOptions,
    ) -> Option<PixelBounds> {
        if !self.visible {
            return None;
        }
        let map = map_reference?;
        let pixel_size = map.pixel_size() as f32;
        let display_scale = map.display_scale() as f32;

        store
            .records()
            .filter_map(|record| {
                geometry_bounds(&build_geometry(record, pixel_size, display_scale, options))
            })
            .reduce(PixelBounds::union)
    }

    /// Zeichnet alle Live-Marker in Store-Reihenfolge.
    ///
    /// Es gibt keine Zeichenreihenfolge-Garantie über Namespaces hinweg.
    pub fn paint(
        &self,
        surface: &mut dyn PaintSurface,
        store: &MarkerStore,
        map_reference: Option<&MapReference>,
        options: &OverlayOptions,
    ) {
        if !self.visible {
            return;
        }
        let Some(map) = map_reference else {
            return;
        };
        let pixel_size = map.pixel_size() as f32;
        let display_scale = map.display_scale() as f32;

        for record in store.records() {
            match build_geometry(record, pixel_size, display_scale, options) {
                MarkerGeometry::Ellipse { center, radii } => {
                    // Füllung halbtransparent, Kontur in voller Deckkraft
                    let fill = [
                        record.color[0],
                        record.color[1],
                        record.color[2],
                        record.color[3] * 0.5,
                    ];
                    surface.fill_ellipse(center, radii, fill, record.color, options.outline_width_px);
                }
                MarkerGeometry::Polyline { points, width } => {
                    surface.stroke_polyline(&points, width, record.color);
                }
                MarkerGeometry::Text {
                    center,
                    font_px,
                    text,
                } => {
                    surface.draw_text(center, font_px, &text, record.color);
                }
                MarkerGeometry::Empty => {
                    if let MarkerShape::Other(code) = record.shape {
                        if self.unknown_shape_warn.allow(&code.to_string()) {
                            log::warn!("Marker-Shape nicht unterstützt: {}", code);
                        }
                    }
                }
            }
        }
    }

    /// Schlüssel aller Marker, deren Begrenzungsrechteck `pos` enthält.
    pub fn hit_test(
        &self,
        pos: Vec2,
        store: &MarkerStore,
        map_reference: Option<&MapReference>,
        options: &OverlayOptions,
    ) -> Vec<MarkerKey> {
        if !self.visible {
            return Vec::new();
        }
        let Some(map) = map_reference else {
            return Vec::new();
        };
        let pixel_size = map.pixel_size() as f32;
        let display_scale = map.display_scale() as f32;

        store
            .records()
            .filter(|record| {
                geometry_bounds(&build_geometry(record, pixel_size, display_scale, options))
                    .is_some_and(|bounds| bounds.contains(pos))
            })
            .map(|record| record.key.clone())
            .collect()
    }
}
