//! Rectangle and point types in the two coordinate spaces the embedding deals with.
//!
//! Host toolkits lay out in *logical* pixels, the engine renders in *device* pixels. Keeping
//! them as separate types means a logical rectangle can only reach the engine through
//! [`LogicalRect::to_device`].
//!
//! ```
//! use gosub_embed::geometry::{DeviceRect, LogicalRect};
//!
//! let r = LogicalRect::new(10, 20, 400, 300);
//! assert_eq!(r.to_device(2.0), DeviceRect::new(20, 40, 800, 600));
//! ```

/// A point in host-toolkit logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicalPoint {
    pub x: i32,
    pub y: i32,
}

impl LogicalPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}

/// A rectangle in host-toolkit logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicalRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl LogicalRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> LogicalPoint {
        LogicalPoint::new(self.x, self.y)
    }

    /// Scale into device pixels. Coordinates truncate toward zero like the native
    /// integer conversion the engine expects.
    pub fn to_device(&self, scale: f64) -> DeviceRect {
        DeviceRect {
            x: scale_coord(self.x, scale),
            y: scale_coord(self.y, scale),
            width: scale_len(self.width, scale),
            height: scale_len(self.height, scale),
        }
    }
}

/// A rectangle in engine device pixels. Width and height are never negative.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceRect {
    /// Horizontal offset in pixels from the origin.
    pub x: i32,
    /// Vertical offset in pixels from the origin.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Debug for DeviceRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DeviceRect {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

impl DeviceRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

pub(crate) fn scale_coord(v: i32, scale: f64) -> i32 {
    (v as f64 * scale) as i32
}

pub(crate) fn scale_len(v: u32, scale: f64) -> u32 {
    // `as` saturates, so negative or NaN products land on 0
    (v as f64 * scale) as u32
}
