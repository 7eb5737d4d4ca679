use crate::geometry::rect::{scale_coord, scale_len};
use crate::geometry::{DeviceRect, LogicalPoint};
use crate::platform::OriginModel;
use crate::scale::ScaleFactor;
use crate::toolkit::VisualContainer;
use std::sync::{Arc, Mutex, PoisonError};

/// The two rectangles the engine needs, always read and written together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryPair {
    /// Visible region of the container that should receive rendered output.
    pub content: DeviceRect,
    /// Offset and size of the native child window relative to its parent window.
    pub browser: DeviceRect,
}

/// Lock owning both rectangles as one unit.
///
/// Separate from the UI queue: the engine asks for geometry from its own thread and must
/// not wait for the UI thread to become free.
#[derive(Debug, Default)]
pub struct SharedGeometry {
    pair: Mutex<GeometryPair>,
}

impl SharedGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> GeometryPair {
        *self.pair.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn content_rect(&self) -> DeviceRect {
        self.snapshot().content
    }

    /// Replace both rectangles at once and return the old pair.
    pub fn replace_pair(&self, pair: GeometryPair) -> GeometryPair {
        let mut guard = self.pair.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, pair)
    }
}

/// Computes the content and browser rectangles of a container with the platform's formula.
#[derive(Debug, Clone)]
pub struct GeometryTracker {
    origin: OriginModel,
    shared: Arc<SharedGeometry>,
}

impl GeometryTracker {
    pub fn new(origin: OriginModel) -> Self {
        Self {
            origin,
            shared: Arc::new(SharedGeometry::new()),
        }
    }

    pub fn shared(&self) -> Arc<SharedGeometry> {
        self.shared.clone()
    }

    /// Recompute both rectangles and publish them as one pair.
    pub fn recompute(&self, container: &dyn VisualContainer, scale: ScaleFactor) -> GeometryPair {
        let pair = self.compute(container, scale);
        self.shared.replace_pair(pair);
        pair
    }

    fn compute(&self, container: &dyn VisualContainer, scale: ScaleFactor) -> GeometryPair {
        let s = scale.get();
        let bounds = container.bounds();
        let visible = container.visible_rect();
        let clip = visible.to_device(s);

        match self.origin {
            OriginModel::NonRelocatable => GeometryPair {
                content: clip,
                browser: DeviceRect::new(
                    -clip.x,
                    -clip.y,
                    scale_len(bounds.width, s),
                    scale_len(bounds.height, s),
                ),
            },
            OriginModel::NonRelocatableAxisScaled { divisor } => {
                let axis = s / divisor;
                GeometryPair {
                    content: clip,
                    browser: DeviceRect::new(
                        -clip.x,
                        -scale_coord(visible.y, axis),
                        scale_len(bounds.width, axis),
                        scale_len(bounds.height, axis),
                    ),
                }
            }
            OriginModel::Relocatable => {
                let pos = offset_in_top_level(container);
                let content = DeviceRect::new(
                    scale_coord(pos.x, s) + clip.x,
                    scale_coord(pos.y, s) + clip.y,
                    clip.width,
                    clip.height,
                );
                GeometryPair {
                    content,
                    browser: content,
                }
            }
        }
    }
}

/// Container location accumulated up the parent chain, stopping below the top-level
/// window's content root.
fn offset_in_top_level(container: &dyn VisualContainer) -> LogicalPoint {
    let mut pos = container.bounds().origin();
    let chain = container.ancestors();
    for (i, ancestor) in chain.iter().enumerate() {
        let next_is_window = chain.get(i + 1).is_some_and(|n| n.is_top_level);
        if ancestor.is_top_level || next_is_window {
            break;
        }
        pos.translate(ancestor.location.x, ancestor.location.y);
    }
    pos
}
