//! Zeichenfläche-Vertrag zwischen Overlay und Host-UI.
//!
//! Der Core zeichnet ausschließlich über diese Schnittstelle; die
//! egui-Implementierung lebt hier, damit Hosts ohne eigene Anbindung
//! direkt auf einen `egui::Painter` rendern können.

use glam::Vec2;

/// Primitive Zeichenoperationen, die ein Host bereitstellen muss.
///
/// Farben sind RGBA in [0,1]; Koordinaten liegen im Pixel-Raum der
/// aktuellen Kartenreferenz.
pub trait PaintSurface {
    /// Gefüllte Ellipse mit Kontur.
    fn fill_ellipse(
        &mut self,
        center: Vec2,
        radii: Vec2,
        fill: [f32; 4],
        outline: [f32; 4],
        outline_width: f32,
    );

    /// Linienzug mit Strichbreite in Pixeln.
    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: [f32; 4]);

    /// Horizontal und vertikal auf `center` zentrierter Text.
    fn draw_text(&mut self, center: Vec2, font_px: f32, text: &str, color: [f32; 4]);
}

/// Konvertiert eine RGBA-Farbe in `egui::Color32`.
fn to_color32(rgba: [f32; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        (rgba[0].clamp(0.0, 1.0) * 255.0) as u8,
        (rgba[1].clamp(0.0, 1.0) * 255.0) as u8,
        (rgba[2].clamp(0.0, 1.0) * 255.0) as u8,
        (rgba[3].clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// `PaintSurface` über einem `egui::Painter`.
///
/// `offset` und `zoom` bilden den Overlay-Pixel-Raum auf Screen-Punkte ab
/// (der Host positioniert die Hintergrundkarte).
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    offset: Vec2,
    zoom: f32,
}

impl<'a> EguiSurface<'a> {
    /// Erstellt eine Zeichenfläche über dem Painter des Hosts.
    pub fn new(painter: &'a egui::Painter, offset: Vec2, zoom: f32) -> Self {
        Self {
            painter,
            offset,
            zoom: zoom.max(f32::EPSILON),
        }
    }

    fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        let s = self.offset + p * self.zoom;
        egui::pos2(s.x, s.y)
    }
}

impl PaintSurface for EguiSurface<'_> {
    fn fill_ellipse(
        &mut self,
        center: Vec2,
        radii: Vec2,
        fill: [f32; 4],
        outline: [f32; 4],
        outline_width: f32,
    ) {
        let shape = egui::epaint::EllipseShape {
            center: self.to_screen(center),
            radius: egui::vec2(radii.x * self.zoom, radii.y * self.zoom),
            fill: to_color32(fill),
            stroke: egui::Stroke::new(outline_width, to_color32(outline)),
        };
        self.painter.add(egui::Shape::Ellipse(shape));
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: [f32; 4]) {
        if points.len() < 2 {
            return;
        }
        let screen_points: Vec<egui::Pos2> = points.iter().map(|p| self.to_screen(*p)).collect();
        self.painter.add(egui::Shape::line(
            screen_points,
            egui::Stroke::new(width * self.zoom, to_color32(color)),
        ));
    }

    fn draw_text(&mut self, center: Vec2, font_px: f32, text: &str, color: [f32; 4]) {
        self.painter.text(
            self.to_screen(center),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(font_px * self.zoom),
            to_color32(color),
        );
    }
}
