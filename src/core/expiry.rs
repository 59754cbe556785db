//! Ablauf-Planung: ein einmaliger Weck-Termin pro befristetem Marker.
//!
//! Termine werden unabhängig voneinander gehalten und nicht koalesziert;
//! das ist unkritisch, weil der Sweep idempotent und billig ist.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::SystemTime;

/// Min-Heap über ausstehende Weck-Termine.
///
/// Der Render-Kontext pollt fällige Termine mit `take_due` und plant seinen
/// nächsten Tick über `next_deadline` (z.B. `request_repaint_after`).
#[derive(Default)]
pub struct ExpiryScheduler {
    deadlines: BinaryHeap<Reverse<SystemTime>>,
}

impl ExpiryScheduler {
    /// Erstellt einen leeren Scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plant einen einmaligen Weck-Termin.
    pub fn arm(&mut self, deadline: SystemTime) {
        self.deadlines.push(Reverse(deadline));
    }

    /// Frühester ausstehender Termin, falls vorhanden.
    pub fn next_deadline(&self) -> Option<SystemTime> {
        self.deadlines.peek().map(|Reverse(t)| *t)
    }

    /// Entnimmt alle zum Zeitpunkt `now` fälligen Termine.
    ///
    /// Gibt die Anzahl der gefeuerten Termine zurück; jeder gefeuerte
    /// Termin verlangt einen Sweep des Stores.
    pub fn take_due(&mut self, now: SystemTime) -> usize {
        let mut fired = 0;
        while let Some(Reverse(deadline)) = self.deadlines.peek() {
            if *deadline > now {
                break;
            }
            self.deadlines.pop();
            fired += 1;
        }
        fired
    }

    /// Anzahl ausstehender Termine.
    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }
}
