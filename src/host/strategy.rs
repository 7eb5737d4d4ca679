use crate::errors::EmbedError;
use crate::geometry::DeviceRect;
use crate::handle::BrowserId;
use crate::toolkit::HostEvent;
use std::fmt::Display;

/// How the browser's output ends up inside the host's visual tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMode {
    /// The engine paints into a shared bitmap that the host draws.
    Offscreen,
    /// The engine renders into its own native child window.
    Windowed,
    /// Windowed, with the native window managed by an external handler.
    WindowedExternalHandler,
}

impl Display for EmbeddingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingMode::Offscreen => write!(f, "offscreen"),
            EmbeddingMode::Windowed => write!(f, "windowed"),
            EmbeddingMode::WindowedExternalHandler => write!(f, "windowed (external handler)"),
        }
    }
}

/// Small RGBA8 capture of a browser.
#[derive(Clone)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// What every embedding mode offers the host application. Calls occur on the UI thread.
pub trait EmbeddingStrategy {
    fn mode(&self) -> EmbeddingMode;

    fn browser_id(&self) -> BrowserId;

    /// Schedule creation of the native browser without blocking.
    fn create_immediately(&self);

    /// Region of the container the engine should render into, in device pixels.
    fn current_rect(&self) -> DeviceRect;

    fn handle_host_event(&self, event: HostEvent);

    /// Capture the browser's output, at most `max_dim` pixels on the long side.
    fn create_screenshot(&self, max_dim: u32) -> Result<RgbaImage, EmbedError>;

    fn close(&self);
}
