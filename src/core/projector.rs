//! Geodätischer Projektor: löst Marker-Posen über den externen
//! Transform-Kollaborateur in absolute geografische Koordinaten auf.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use thiserror::Error;

use super::geodesy::{ecef_to_geodetic, FramePose, GeoPoint};

/// Fehler des Frame-Chain-Lookups.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Kein gültiger Frame-Pfad zum erdfesten Frame im Lookup-Fenster.
    #[error("kein Transform nach earth für Frame '{frame}': {detail}")]
    Unavailable { frame: String, detail: String },
}

/// Externer Kollaborateur: Frame-Chain-Lookup in den erdfesten ECEF-Frame.
///
/// Die Implementierung gehört dem Host (z.B. ein tf-Buffer); dieser Core
/// konsumiert nur das Ergebnis. Der Lookup darf blockieren, aber höchstens
/// bis `timeout`.
pub trait TransformLookup: Send + Sync {
    /// Transformiert `pose` aus `frame` zum Zeitpunkt `stamp` in ECEF.
    fn to_earth(
        &self,
        pose: &FramePose,
        frame: &str,
        stamp: SystemTime,
        timeout: Duration,
    ) -> Result<FramePose, TransformError>;
}

/// Kombiniert Frame-Lookup und geodätische Konversion.
#[derive(Clone)]
pub struct GeodeticProjector {
    lookup: Arc<dyn TransformLookup>,
    timeout: Duration,
}

impl GeodeticProjector {
    /// Erstellt einen Projektor mit begrenztem Lookup-Fenster.
    pub fn new(lookup: Arc<dyn TransformLookup>, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }

    /// Löst eine Pose in eine absolute geografische Koordinate auf.
    pub fn to_geographic(
        &self,
        pose: &FramePose,
        frame: &str,
        stamp: SystemTime,
    ) -> Result<GeoPoint, TransformError> {
        let earth = self.lookup.to_earth(pose, frame, stamp, self.timeout)?;
        Ok(ecef_to_geodetic(earth.position))
    }
}

/// Statischer Lookup über fest konfigurierte Frame-Posen in ECEF.
///
/// Für Tests und Hosts ohne dynamischen Frame-Baum: jeder bekannte Frame
/// ist als konstante ECEF-Pose hinterlegt, unbekannte Frames schlagen fehl.
#[derive(Default)]
pub struct FixedFrameTransform {
    frames: std::collections::HashMap<String, FramePose>,
}

impl FixedFrameTransform {
    /// Erstellt einen leeren Lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert einen Frame mit seiner ECEF-Pose.
    pub fn insert_frame(&mut self, name: impl Into<String>, pose: FramePose) {
        self.frames.insert(name.into(), pose);
    }
}

impl TransformLookup for FixedFrameTransform {
    fn to_earth(
        &self,
        pose: &FramePose,
        frame: &str,
        _stamp: SystemTime,
        _timeout: Duration,
    ) -> Result<FramePose, TransformError> {
        let base = self
            .frames
            .get(frame)
            .ok_or_else(|| TransformError::Unavailable {
                frame: frame.to_string(),
                detail: "Frame nicht registriert".to_string(),
            })?;

        Ok(FramePose {
            position: base.position + base.orientation * pose.position,
            orientation: base.orientation * pose.orientation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geodesy::WGS84_A;
    use approx::assert_relative_eq;
    use glam::DVec3;
    use std::time::UNIX_EPOCH;

    fn equator_frame() -> FixedFrameTransform {
        let mut frames = FixedFrameTransform::new();
        // Frame-Ursprung auf dem Ellipsoid am Äquator/Nullmeridian
        frames.insert_frame(
            "equator",
            FramePose::from_position(DVec3::new(WGS84_A, 0.0, 0.0)),
        );
        frames
    }

    #[test]
    fn test_projektion_bekannter_frame() {
        let projector = Arc::new(equator_frame());
        let projector = GeodeticProjector::new(projector, Duration::from_secs_f64(1.5));

        let geo = projector
            .to_geographic(&FramePose::default(), "equator", UNIX_EPOCH)
            .expect("Frame ist registriert");
        assert_relative_eq!(geo.latitude, 0.0, epsilon = 1e-9);
        assert_relative_eq!(geo.longitude, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_projektion_mit_offset() {
        let projector =
            GeodeticProjector::new(Arc::new(equator_frame()), Duration::from_secs_f64(1.5));

        // 1000 m nach oben (entlang der X-Achse des ECEF am Äquator)
        let pose = FramePose::from_position(DVec3::new(1000.0, 0.0, 0.0));
        let geo = projector
            .to_geographic(&pose, "equator", UNIX_EPOCH)
            .unwrap();
        assert_relative_eq!(geo.altitude, 1000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_unbekannter_frame_schlaegt_fehl() {
        let projector =
            GeodeticProjector::new(Arc::new(equator_frame()), Duration::from_secs_f64(1.5));

        let result = projector.to_geographic(&FramePose::default(), "odom", UNIX_EPOCH);
        assert!(matches!(
            result,
            Err(TransformError::Unavailable { frame, .. }) if frame == "odom"
        ));
    }
}
