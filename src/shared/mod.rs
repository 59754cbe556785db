//! Geteilte Typen für layer-übergreifende Verträge.

pub mod options;
pub mod throttle;

pub use options::OverlayOptions;
pub use throttle::LogThrottle;
