//! Render-Layer: Geometrie-Konstruktion, Overlay-View und Zeichenfläche.

pub mod geometry;
pub mod overlay_view;
pub mod surface;

pub use geometry::{build_geometry, geometry_bounds, MarkerGeometry, PixelBounds};
pub use overlay_view::OverlayView;
pub use surface::{EguiSurface, PaintSurface};
