//! Thread-sichere Übergabe-Queue zwischen Ingestion- und Render-Kontext.
//!
//! Der Producer (Bus-Callback, beliebiger Thread) hängt Events an; der
//! Render-Kontext holt den gesamten Batch mit einem O(1)-Swap ab. Das ist
//! der einzige Querschnitts-Lock des Overlays; unter ihm passiert weder
//! Transform- noch Store-Arbeit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::marker::MarkerEvent;

/// Weck-Callback des Render-Kontexts (z.B. `egui::Context::request_repaint`).
pub type WakeNotifier = Box<dyn Fn() + Send + Sync>;

/// Übergabe-Puffer mit koaleszierter Weck-Benachrichtigung.
///
/// Mehrere Pushes zwischen zwei Drains lösen genau eine Benachrichtigung
/// aus; so wird ein Update-Burst zu einem einzigen Geometrie-Rebuild pro
/// Render-Tick gebündelt.
#[derive(Default)]
pub struct IngestionBuffer {
    queue: Mutex<Vec<MarkerEvent>>,
    dirty: AtomicBool,
    notifier: Mutex<Option<WakeNotifier>>,
}

impl IngestionBuffer {
    /// Erstellt einen leeren Puffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hinterlegt den Weck-Callback des Render-Kontexts.
    pub fn set_notifier(&self, notifier: WakeNotifier) {
        *self.notifier.lock().expect("Notifier-Lock vergiftet") = Some(notifier);
    }

    /// Hängt ein Event an; aufrufbar aus beliebigen Threads.
    ///
    /// Blockiert höchstens für die Dauer eines Appends unter dem Mutex.
    pub fn push(&self, event: MarkerEvent) {
        {
            let mut queue = self.queue.lock().expect("Queue-Lock vergiftet");
            queue.push(event);
        }

        // Nur der erste Push nach einem Drain weckt den Render-Kontext
        if !self.dirty.swap(true, Ordering::AcqRel) {
            if let Some(notify) = self.notifier.lock().expect("Notifier-Lock vergiftet").as_ref() {
                notify();
            }
        }
    }

    /// Holt den gesamten Batch in Ankunftsreihenfolge ab (O(1)-Swap).
    ///
    /// Nur vom Render-Kontext aufzurufen. Kein Event wird je an zwei
    /// Drains geliefert.
    pub fn drain_all(&self) -> Vec<MarkerEvent> {
        // Flag vor dem Swap zurücksetzen: ein Push in der Lücke weckt dann
        // höchstens einmal zu viel, nie zu wenig.
        self.dirty.store(false, Ordering::Release);
        let mut queue = self.queue.lock().expect("Queue-Lock vergiftet");
        std::mem::take(&mut *queue)
    }

    /// Anzahl aktuell gepufferter Events.
    pub fn len(&self) -> usize {
        self.queue.lock().expect("Queue-Lock vergiftet").len()
    }

    /// Prüft ob der Puffer leer ist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
