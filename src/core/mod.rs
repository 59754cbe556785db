//! Core-Domänentypen: Marker, Store, Puffer, Ablauf-Planung, Geodäsie.

pub mod expiry;
pub mod geodesy;
pub mod ingest;
pub mod map_reference;
pub mod marker;
pub mod projector;
pub mod store;

pub use expiry::ExpiryScheduler;
pub use geodesy::{ecef_to_geodetic, geo_to_mercator, yaw_from_quat, FramePose, GeoPoint};
pub use ingest::{IngestionBuffer, WakeNotifier};
pub use map_reference::MapReference;
pub use marker::{MarkerEvent, MarkerKey, MarkerRecord, MarkerShape, MarkerUpdate};
pub use projector::{FixedFrameTransform, GeodeticProjector, TransformError, TransformLookup};
pub use store::{ApplyOutcome, MarkerStore};
