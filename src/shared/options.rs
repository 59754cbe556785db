//! Zentrale Laufzeit-Optionen des Marker-Overlays.
//!
//! `OverlayOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── Transform ───────────────────────────────────────────────────────

/// Begrenztes Lookup-Fenster des Frame-Chain-Kollaborateurs in Sekunden.
pub const TRANSFORM_TIMEOUT_SECS: f32 = 1.5;

// ── Ablauf ──────────────────────────────────────────────────────────

/// Schutzmarge auf den Weck-Termin gegen Uhren-Drift in Sekunden.
pub const EXPIRY_GUARD_SECS: f32 = 1.0;

// ── Text-Rendering ──────────────────────────────────────────────────

/// Untergrenze der Label-Schriftgröße in Pixeln (Lesbarkeit).
pub const MIN_FONT_PX: f32 = 5.0;
/// Faktor von `scale.z * display_scale` auf die Schriftgröße.
pub const FONT_SCALE_FACTOR: f32 = 10.0;

// ── Log-Drosselung ──────────────────────────────────────────────────

/// Fenster für Transform-Warnungen in Sekunden.
pub const TRANSFORM_WARN_SECS: f32 = 1.0;
/// Fenster für Debug-Meldungen zu veralteten Updates in Sekunden.
pub const STALE_DEBUG_SECS: f32 = 5.0;
/// Fenster für Warnungen zu unbekannten Codes in Sekunden.
pub const UNKNOWN_WARN_SECS: f32 = 5.0;

// ── Zeichnen ────────────────────────────────────────────────────────

/// Konturbreite von Ellipsen in Pixeln.
pub const OUTLINE_WIDTH_PX: f32 = 1.0;

/// Laufzeit-Optionen des Overlays (TOML-persistierbar).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Lookup-Fenster des Transform-Kollaborateurs (Sekunden)
    pub transform_timeout_secs: f32,
    /// Schutzmarge auf Weck-Termine (Sekunden)
    pub expiry_guard_secs: f32,
    /// Untergrenze der Label-Schriftgröße (Pixel)
    pub min_font_px: f32,
    /// Skalierungsfaktor der Label-Schriftgröße
    pub font_scale_factor: f32,
    /// Drossel-Fenster für Transform-Warnungen (Sekunden)
    pub transform_warn_secs: f32,
    /// Drossel-Fenster für Veraltet-Meldungen (Sekunden)
    pub stale_debug_secs: f32,
    /// Drossel-Fenster für Unbekannt-Warnungen (Sekunden)
    pub unknown_warn_secs: f32,
    /// Konturbreite von Ellipsen (Pixel)
    pub outline_width_px: f32,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            transform_timeout_secs: TRANSFORM_TIMEOUT_SECS,
            expiry_guard_secs: EXPIRY_GUARD_SECS,
            min_font_px: MIN_FONT_PX,
            font_scale_factor: FONT_SCALE_FACTOR,
            transform_warn_secs: TRANSFORM_WARN_SECS,
            stale_debug_secs: STALE_DEBUG_SECS,
            unknown_warn_secs: UNKNOWN_WARN_SECS,
            outline_width_px: OUTLINE_WIDTH_PX,
        }
    }
}

impl OverlayOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Overlay-Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Overlay-Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Lookup-Fenster als `Duration`.
    pub fn transform_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.transform_timeout_secs.max(0.0))
    }

    /// Schutzmarge als `Duration`.
    pub fn expiry_guard(&self) -> Duration {
        Duration::from_secs_f32(self.expiry_guard_secs.max(0.0))
    }
}
