//! Render-Seite der Pipeline: Drain, Apply, Sweep und Weck-Planung.
//!
//! Die Engine gehört exklusiv dem Render-Kontext (`&mut self`-API, kein
//! internes Locking). Kartenwechsel und Marker-Updates laufen damit im
//! selben Kontext und können sich nicht teilweise überlappen.

use std::sync::Arc;
use std::time::SystemTime;

use glam::Vec2;

use crate::core::ingest::{IngestionBuffer, WakeNotifier};
use crate::core::map_reference::MapReference;
use crate::core::marker::MarkerKey;
use crate::core::projector::{GeodeticProjector, TransformLookup};
use crate::core::store::{ApplyOutcome, MarkerStore};
use crate::core::expiry::ExpiryScheduler;
use crate::engine::feed::MarkerFeed;
use crate::render::geometry::PixelBounds;
use crate::render::overlay_view::OverlayView;
use crate::render::surface::PaintSurface;
use crate::shared::options::OverlayOptions;

/// Zentrale Fassade des Live-Marker-Overlays.
pub struct MarkerOverlayEngine {
    buffer: Arc<IngestionBuffer>,
    store: MarkerStore,
    scheduler: ExpiryScheduler,
    view: OverlayView,
    map_reference: Option<MapReference>,
    options: OverlayOptions,
}

impl MarkerOverlayEngine {
    /// Erstellt eine Engine ohne geladene Karte.
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            buffer: Arc::new(IngestionBuffer::new()),
            store: MarkerStore::new(),
            scheduler: ExpiryScheduler::new(),
            view: OverlayView::new(&options),
            map_reference: None,
            options,
        }
    }

    /// Erstellt den Einspeise-Handle für die Bus-Callbacks.
    ///
    /// Der Handle ist `Send + Sync` und darf von beliebig vielen
    /// Producer-Threads gleichzeitig benutzt werden.
    pub fn feed(&self, lookup: Arc<dyn TransformLookup>) -> MarkerFeed {
        let projector = GeodeticProjector::new(lookup, self.options.transform_timeout());
        MarkerFeed::new(self.buffer.clone(), projector, &self.options)
    }

    /// Hinterlegt den Weck-Callback des Hosts (z.B. `request_repaint`).
    pub fn set_notifier(&self, notifier: WakeNotifier) {
        self.buffer.set_notifier(notifier);
    }

    /// Ein Render-Tick: Batch abholen, anwenden, fällige Termine feuern,
    /// sweepen.
    ///
    /// Gibt zurück ob sich der sichtbare Zustand geändert hat (Repaint
    /// nötig). Der Sweep läuft nach jedem nicht-leeren Batch und nach
    /// jedem gefeuerten Weck-Termin, auch ohne neue Updates.
    pub fn process_pending(&mut self, now: SystemTime) -> bool {
        let batch = self.buffer.drain_all();
        let had_updates = !batch.is_empty();
        let mut changed = false;

        for event in batch {
            let outcome = self.store.apply(event, now, self.map_reference.as_ref());
            if let ApplyOutcome::Stored { rearm: Some(lifetime) } = outcome {
                // Schutzmarge gegen Uhren-Drift zwischen Publisher und Host
                self.scheduler.arm(now + lifetime + self.options.expiry_guard());
            }
            changed |= outcome.changed();
        }

        let fired = self.scheduler.take_due(now);
        if had_updates || fired > 0 {
            changed |= self.store.sweep(now) > 0;
        }
        changed
    }

    /// Frühester ausstehender Weck-Termin (für `request_repaint_after`).
    pub fn next_wake(&self) -> Option<SystemTime> {
        self.scheduler.next_deadline()
    }

    /// Setzt die Kartenreferenz und projiziert alle Live-Marker um.
    pub fn set_map_reference(&mut self, map_reference: MapReference) {
        self.store.reproject_all(&map_reference);
        self.map_reference = Some(map_reference);
    }

    /// Aktuelle Kartenreferenz.
    pub fn map_reference(&self) -> Option<&MapReference> {
        self.map_reference.as_ref()
    }

    /// Schaltet die Sichtbarkeit des Overlays um.
    pub fn set_visible(&mut self, visible: bool) {
        self.view.set_visible(visible);
    }

    /// Aktuelle Sichtbarkeit.
    pub fn is_visible(&self) -> bool {
        self.view.is_visible()
    }

    /// Vereinigung der Begrenzungsrechtecke aller sichtbaren Marker.
    pub fn bounding_rect(&self) -> Option<PixelBounds> {
        self.view
            .bounding_rect(&self.store, self.map_reference.as_ref(), &self.options)
    }

    /// Zeichnet alle sichtbaren Marker auf die Zeichenfläche.
    pub fn paint(&self, surface: &mut dyn PaintSurface) {
        self.view
            .paint(surface, &self.store, self.map_reference.as_ref(), &self.options);
    }

    /// Marker-Schlüssel unter einer Pixel-Position.
    pub fn hit_test(&self, pos: Vec2) -> Vec<MarkerKey> {
        self.view
            .hit_test(pos, &self.store, self.map_reference.as_ref(), &self.options)
    }

    /// Lesezugriff auf den Live-Store.
    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    /// Aktuelle Laufzeit-Optionen.
    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }
}
