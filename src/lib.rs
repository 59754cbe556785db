//! Live-Marker-Overlay-Engine.
//!
//! Blendet extern publizierte geometrische Annotationen (Punkte,
//! Linienzüge, Labels) live über eine georeferenzierte Kartenansicht.
//! Kern-Funktionalität als Library exportiert für Tests und Host-UIs.

pub mod core;
pub mod engine;
pub mod render;
pub mod shared;

pub use core::{
    ExpiryScheduler, FixedFrameTransform, FramePose, GeoPoint, GeodeticProjector, IngestionBuffer,
    MapReference, MarkerEvent, MarkerKey, MarkerRecord, MarkerShape, MarkerStore, MarkerUpdate,
    TransformError, TransformLookup, WakeNotifier,
};
pub use engine::{MarkerFeed, MarkerOverlayEngine};
pub use render::{EguiSurface, MarkerGeometry, OverlayView, PaintSurface, PixelBounds};
pub use shared::{LogThrottle, OverlayOptions};
