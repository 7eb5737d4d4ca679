//! Geometry of the embedded window: coordinate types and the [`GeometryTracker`] that
//! keeps the content and browser rectangles in sync with the host container.

mod rect;
mod tracker;

pub use rect::{DeviceRect, LogicalPoint, LogicalRect};
pub use tracker::{GeometryPair, GeometryTracker, SharedGeometry};
