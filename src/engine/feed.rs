//! Producer-Seite der Pipeline: validiert Bus-Updates, löst die Pose in
//! eine geografische Koordinate auf und reicht Events in den Puffer.
//!
//! Läuft auf den Callback-Threads des Telemetrie-Busses; teuer ist hier
//! nur der Frame-Lookup, und der passiert bewusst außerhalb des
//! Puffer-Locks.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::core::geodesy::yaw_from_quat;
use crate::core::ingest::IngestionBuffer;
use crate::core::marker::{
    MarkerEvent, MarkerRecord, MarkerShape, MarkerUpdate, ACTION_ADD, ACTION_DELETE,
    ACTION_DELETE_ALL,
};
use crate::core::projector::GeodeticProjector;
use crate::shared::options::OverlayOptions;
use crate::shared::throttle::LogThrottle;

use glam::Vec2;

/// Thread-sicherer Einspeise-Handle für Bus-Callbacks.
///
/// Jedes fehlgeschlagene Update wird einzeln verworfen und gedrosselt
/// geloggt; die Ingestion nachfolgender Updates läuft immer weiter.
pub struct MarkerFeed {
    buffer: Arc<IngestionBuffer>,
    projector: GeodeticProjector,
    transform_warn: LogThrottle,
    stale_debug: LogThrottle,
    malformed_debug: LogThrottle,
    unknown_warn: LogThrottle,
}

impl MarkerFeed {
    /// Erstellt einen Feed über dem gemeinsamen Puffer.
    pub fn new(
        buffer: Arc<IngestionBuffer>,
        projector: GeodeticProjector,
        options: &OverlayOptions,
    ) -> Self {
        let window = |secs: f32| Duration::from_secs_f32(secs.max(0.0));
        Self {
            buffer,
            projector,
            transform_warn: LogThrottle::new(window(options.transform_warn_secs)),
            stale_debug: LogThrottle::new(window(options.stale_debug_secs)),
            malformed_debug: LogThrottle::new(window(options.stale_debug_secs)),
            unknown_warn: LogThrottle::new(window(options.unknown_warn_secs)),
        }
    }

    /// Nimmt ein Update entgegen (Wandzeit-Jetzt).
    pub fn ingest(&self, update: MarkerUpdate) {
        self.ingest_at(update, SystemTime::now());
    }

    /// Nimmt einen ganzen Update-Batch entgegen.
    pub fn ingest_batch(&self, updates: Vec<MarkerUpdate>) {
        let now = SystemTime::now();
        for update in updates {
            self.ingest_at(update, now);
        }
    }

    /// Wie `ingest`, mit explizitem Zeitpunkt (testbar).
    pub fn ingest_at(&self, update: MarkerUpdate, now: SystemTime) {
        match update.action {
            ACTION_ADD => self.ingest_add(update, now),
            ACTION_DELETE => self.buffer.push(MarkerEvent::Delete(update.key())),
            ACTION_DELETE_ALL => self
                .buffer
                .push(MarkerEvent::DeleteAll(update.namespace)),
            unknown => {
                if self.unknown_warn.allow(&unknown.to_string()) {
                    log::warn!("Unbekannte Marker-Action: {}", unknown);
                }
            }
        }
    }

    fn ingest_add(&self, update: MarkerUpdate, now: SystemTime) {
        if update.reference_frame.is_empty() {
            if self
                .malformed_debug
                .allow(&format!("{}:{}", update.namespace, update.id))
            {
                log::debug!(
                    "Referenz-Frame fehlt in Marker {}:{}",
                    update.namespace,
                    update.id
                );
            }
            return;
        }

        // Deckt die Latenz zwischen Publish und Ingestion ab; der Store
        // prüft beim Apply erneut.
        if !update.lifetime.is_zero() && update.timestamp + update.lifetime < now {
            if self
                .stale_debug
                .allow(&format!("{}:{}", update.namespace, update.id))
            {
                log::debug!(
                    "Abgelaufener Marker: {} id: {}",
                    update.namespace,
                    update.id
                );
            }
            return;
        }

        let geo = match self.projector.to_geographic(
            &update.pose,
            &update.reference_frame,
            update.timestamp,
        ) {
            Ok(geo) => geo,
            Err(e) => {
                // Ein fehlender Transform darf nie eine veraltete oder
                // Default-Position auf dem Schirm hinterlassen.
                if self.transform_warn.allow(&update.reference_frame) {
                    log::warn!(
                        "Kein Transform für Marker {} id: {}: {}",
                        update.namespace,
                        update.id,
                        e
                    );
                }
                return;
            }
        };

        let record = MarkerRecord {
            key: update.key(),
            shape: MarkerShape::from_code(update.shape_type),
            color: update.color,
            scale: update.scale,
            points: update.points,
            text: update.text,
            publish_time: update.timestamp,
            lifetime: update.lifetime,
            geo_position: geo,
            yaw: yaw_from_quat(update.pose.orientation),
            local_position: Vec2::ZERO,
        };
        self.buffer.push(MarkerEvent::Upsert(Box::new(record)));
    }
}
