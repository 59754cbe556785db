//! Core-Datenmodell für Live-Marker aus dem Telemetrie-Bus.
//!
//! Ein Marker ist durch (Namespace, Id) eindeutig identifiziert und bleibt
//! über Updates hinweg stabil, bis er explizit gelöscht wird oder abläuft.

use std::time::{Duration, SystemTime};

use glam::{Vec2, Vec3};

use super::geodesy::{FramePose, GeoPoint};

// ── Wire-Codes des Telemetrie-Busses ────────────────────────────────

/// Action-Code: Marker anlegen oder ersetzen.
pub const ACTION_ADD: i32 = 0;
/// Action-Code: Marker löschen.
pub const ACTION_DELETE: i32 = 2;
/// Action-Code: alle Marker eines Namespace löschen.
pub const ACTION_DELETE_ALL: i32 = 3;

/// Shape-Code: Kugel (als Ellipse gezeichnet).
pub const SHAPE_SPHERE: i32 = 2;
/// Shape-Code: Linienzug.
pub const SHAPE_LINE_STRIP: i32 = 4;
/// Shape-Code: bildschirmzugewandtes Text-Label.
pub const SHAPE_TEXT_LABEL: i32 = 9;

/// Eindeutiger Schlüssel eines Markers innerhalb eines Topics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerKey {
    /// Namespace des Publishers
    pub namespace: String,
    /// Numerische Id innerhalb des Namespace
    pub id: i32,
}

impl MarkerKey {
    /// Erstellt einen neuen Schlüssel.
    pub fn new(namespace: impl Into<String>, id: i32) -> Self {
        Self {
            namespace: namespace.into(),
            id,
        }
    }
}

/// Darstellungsform eines Markers.
///
/// Unbekannte Wire-Codes werden als `Other` mitgeführt, erzeugen aber
/// keine Geometrie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Sphere,
    LineStrip,
    TextLabel,
    Other(i32),
}

impl MarkerShape {
    /// Dekodiert einen Shape-Code des Busses.
    pub fn from_code(code: i32) -> Self {
        match code {
            SHAPE_SPHERE => Self::Sphere,
            SHAPE_LINE_STRIP => Self::LineStrip,
            SHAPE_TEXT_LABEL => Self::TextLabel,
            other => Self::Other(other),
        }
    }
}

/// Roh-Update wie es der Telemetrie-Bus liefert (bereits deserialisiert).
///
/// `action` und `shape_type` sind bewusst rohe Wire-Codes: Die Dekodierung
/// samt Behandlung unbekannter Codes passiert erst im Feed.
#[derive(Debug, Clone)]
pub struct MarkerUpdate {
    pub namespace: String,
    pub id: i32,
    pub action: i32,
    pub shape_type: i32,
    /// RGBA, Komponenten in [0,1]
    pub color: [f32; 4],
    /// Bedeutung hängt von der Shape ab (Radien / Linienbreite / Texthöhe)
    pub scale: Vec3,
    /// Stützpunkte relativ zur Pose (nur LineStrip)
    pub points: Vec<Vec3>,
    /// Label-Text (nur TextLabel)
    pub text: String,
    /// Pose im Referenz-Frame des Publishers
    pub pose: FramePose,
    /// Referenz-Frame der Pose
    pub reference_frame: String,
    /// Absoluter Zeitstempel des Quell-Events
    pub timestamp: SystemTime,
    /// Lebensdauer; `Duration::ZERO` = unbegrenzt
    pub lifetime: Duration,
}

impl MarkerUpdate {
    /// Schlüssel dieses Updates.
    pub fn key(&self) -> MarkerKey {
        MarkerKey::new(self.namespace.clone(), self.id)
    }
}

/// Live-Record im Store: aufgelöstes Update mit geografischer Position.
#[derive(Debug, Clone)]
pub struct MarkerRecord {
    pub key: MarkerKey,
    pub shape: MarkerShape,
    pub color: [f32; 4],
    pub scale: Vec3,
    pub points: Vec<Vec3>,
    pub text: String,
    pub publish_time: SystemTime,
    pub lifetime: Duration,
    /// Absolute geografische Position, einmalig bei der Ingestion berechnet
    pub geo_position: GeoPoint,
    /// Heading in Radiant, aus der Pose-Orientierung abgeleitet
    pub yaw: f64,
    /// Position im Pixel-Raum der aktuellen Karte; wird bei
    /// Kartenwechsel neu berechnet, nicht bei jedem Paint
    pub local_position: Vec2,
}

impl MarkerRecord {
    /// Marker ohne Lebensdauer bleiben bis zum expliziten Löschen.
    pub fn is_immortal(&self) -> bool {
        self.lifetime.is_zero()
    }

    /// Prüft ob der Marker zum Zeitpunkt `now` abgelaufen ist.
    pub fn is_expired(&self, now: SystemTime) -> bool {
        !self.is_immortal() && self.publish_time + self.lifetime < now
    }
}

/// Dekodiertes Event in der Übergabe-Queue zwischen Ingestion- und
/// Render-Kontext.
#[derive(Debug, Clone)]
pub enum MarkerEvent {
    /// Marker anlegen oder ersetzen (Position bereits aufgelöst)
    Upsert(Box<MarkerRecord>),
    /// Marker löschen
    Delete(MarkerKey),
    /// Alle Marker eines Namespace löschen
    DeleteAll(String),
}
