//! Der Live-Store: Namespace→Id-indizierte Marker mit Action-Semantik
//! und zeitbasiertem Ablauf.
//!
//! Der Store gehört exklusiv dem Render-Kontext; alle Mutationen laufen
//! single-threaded über `apply` und `sweep`. Records werden nur für die
//! Dauer eines einzelnen Paint-/Bounds-Aufrufs ausgeliehen.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use indexmap::IndexMap;

use super::map_reference::MapReference;
use super::marker::{MarkerEvent, MarkerKey, MarkerRecord};

/// Ergebnis eines einzelnen `apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Record übernommen; bei befristeter Lebensdauer ist ein
    /// Weck-Termin zu planen.
    Stored { rearm: Option<Duration> },
    /// Record(s) entfernt.
    Removed(usize),
    /// Update verworfen (ungültige Position oder bereits abgelaufen).
    Discarded,
}

impl ApplyOutcome {
    /// Prüft ob das Event den sichtbaren Zustand verändert hat.
    pub fn changed(&self) -> bool {
        match self {
            Self::Stored { .. } => true,
            Self::Removed(n) => *n > 0,
            Self::Discarded => false,
        }
    }
}

/// Namespace→Id-indizierter Live-Store.
///
/// Namespaces entstehen lazy beim ersten Insert; geleerte Namespaces
/// werden am Ende eines Sweeps opportunistisch entfernt. Innerhalb eines
/// Namespace sind Ids eindeutig: ein Record existiert genau dann, wenn
/// der Marker live ist.
#[derive(Default)]
pub struct MarkerStore {
    namespaces: IndexMap<String, HashMap<i32, MarkerRecord>>,
}

impl MarkerStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wendet ein Event an; Events eines Batches sind in Drain-Reihenfolge
    /// anzuwenden.
    ///
    /// Upserts validieren die geografische Position erneut und verwerfen
    /// Updates, die beim Anwenden bereits abgelaufen sind (deckt die
    /// Latenz zwischen Publish und Verarbeitung ab). `last-write-wins`:
    /// ein vorhandener Record unter demselben Schlüssel wird ersetzt.
    pub fn apply(
        &mut self,
        event: MarkerEvent,
        now: SystemTime,
        map_reference: Option<&MapReference>,
    ) -> ApplyOutcome {
        match event {
            MarkerEvent::Upsert(mut record) => {
                if !record.geo_position.is_valid() {
                    log::debug!(
                        "Marker {}:{} ohne gültige Position verworfen",
                        record.key.namespace,
                        record.key.id
                    );
                    return ApplyOutcome::Discarded;
                }
                if record.is_expired(now) {
                    log::debug!(
                        "Bereits abgelaufener Marker verworfen: {}:{}",
                        record.key.namespace,
                        record.key.id
                    );
                    return ApplyOutcome::Discarded;
                }

                if let Some(map) = map_reference {
                    record.local_position = map.geo_to_local(&record.geo_position);
                }

                let rearm = (!record.is_immortal()).then_some(record.lifetime);
                let namespace = self
                    .namespaces
                    .entry(record.key.namespace.clone())
                    .or_default();
                namespace.insert(record.key.id, *record);
                ApplyOutcome::Stored { rearm }
            }
            MarkerEvent::Delete(key) => {
                let removed = self
                    .namespaces
                    .get_mut(&key.namespace)
                    .and_then(|ns| ns.remove(&key.id))
                    .is_some();
                ApplyOutcome::Removed(usize::from(removed))
            }
            MarkerEvent::DeleteAll(namespace) => {
                let removed = self
                    .namespaces
                    .get_mut(&namespace)
                    .map(|ns| {
                        let count = ns.len();
                        ns.clear();
                        count
                    })
                    .unwrap_or(0);
                ApplyOutcome::Removed(removed)
            }
        }
    }

    /// Entfernt alle abgelaufenen Records und leere Namespaces.
    ///
    /// Läuft nach jedem Apply-Batch und nach jedem gefeuerten Weck-Termin,
    /// auch ohne neue Updates; so verschwinden Marker sichtbar, ohne dass
    /// eine frische Nachricht eintreffen muss. Records ohne Lebensdauer
    /// bleiben unangetastet.
    pub fn sweep(&mut self, now: SystemTime) -> usize {
        let mut removed = 0;
        for (name, namespace) in self.namespaces.iter_mut() {
            let before = namespace.len();
            namespace.retain(|id, record| {
                let keep = !record.is_expired(now);
                if !keep {
                    log::debug!("Entferne abgelaufenen Marker {}:{}", name, id);
                }
                keep
            });
            removed += before - namespace.len();
        }
        self.namespaces.retain(|_, ns| !ns.is_empty());
        removed
    }

    /// Projiziert alle Records auf eine neue Kartenreferenz um.
    ///
    /// Der einzige Pfad, der alle Records ohne externes Update anfasst;
    /// die geografische Position bleibt dabei unverändert.
    pub fn reproject_all(&mut self, map_reference: &MapReference) {
        for namespace in self.namespaces.values_mut() {
            for record in namespace.values_mut() {
                record.local_position = map_reference.geo_to_local(&record.geo_position);
            }
        }
    }

    /// Liefert den Record unter `key`, falls live.
    pub fn get(&self, key: &MarkerKey) -> Option<&MarkerRecord> {
        self.namespaces.get(&key.namespace)?.get(&key.id)
    }

    /// Iterator über alle Live-Records (Namespace-Reihenfolge stabil,
    /// Id-Reihenfolge unspezifiziert).
    pub fn records(&self) -> impl Iterator<Item = &MarkerRecord> {
        self.namespaces.values().flat_map(|ns| ns.values())
    }

    /// Anzahl aller Live-Records.
    pub fn marker_count(&self) -> usize {
        self.namespaces.values().map(|ns| ns.len()).sum()
    }

    /// Anzahl der (nicht leeren oder noch nicht geprunten) Namespaces.
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// Prüft ob der Store leer ist.
    pub fn is_empty(&self) -> bool {
        self.marker_count() == 0
    }
}
