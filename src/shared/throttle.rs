//! Gedrosselte Log-Ausgaben für wiederkehrende Warnungen.
//!
//! Telemetrie-Fehler kommen in Serien (jedes Update desselben Markers
//! schlägt gleich fehl); pro Schlüssel wird deshalb höchstens einmal pro
//! Fenster geloggt. Die Fenster sind kosmetisch, kein Korrektheitsvertrag.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Pro-Schlüssel-Drossel über ein Wandzeit-Fenster.
///
/// Thread-sicher über internes Locking, damit sie aus dem
/// Ingestion-Kontext heraus nutzbar ist.
pub struct LogThrottle {
    window: Duration,
    last: Mutex<HashMap<String, Instant>>,
}

impl LogThrottle {
    /// Erstellt eine Drossel mit dem angegebenen Fenster.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: Mutex::new(HashMap::new()),
        }
    }

    /// Prüft ob für `key` jetzt geloggt werden darf.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// Wie `allow`, mit explizitem Zeitpunkt (testbar).
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut last = self.last.lock().expect("Throttle-Lock vergiftet");
        match last.get(key) {
            Some(&previous) if now.duration_since(previous) < self.window => false,
            _ => {
                last.insert(key.to_string(), now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erster_treffer_erlaubt() {
        let throttle = LogThrottle::new(Duration::from_secs(1));
        assert!(throttle.allow("a"));
    }

    #[test]
    fn test_innerhalb_des_fensters_gedrosselt() {
        let throttle = LogThrottle::new(Duration::from_secs(5));
        let start = Instant::now();
        assert!(throttle.allow_at("a", start));
        assert!(!throttle.allow_at("a", start + Duration::from_secs(2)));
        assert!(throttle.allow_at("a", start + Duration::from_secs(6)));
    }

    #[test]
    fn test_schluessel_sind_unabhaengig() {
        let throttle = LogThrottle::new(Duration::from_secs(5));
        let start = Instant::now();
        assert!(throttle.allow_at("a", start));
        assert!(throttle.allow_at("b", start));
    }
}
