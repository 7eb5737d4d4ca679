//! Platform families and the per-family strategy table.
//!
//! The three windowing models differ in how a native child window can be positioned,
//! whether a heavyweight child surface is needed as parent, where the scale factor comes
//! from, and whether bounds must be re-asserted after the window is realized. Those
//! differences live here, selected once when a host is built, instead of being spread
//! over the geometry and lifecycle code.

use crate::config::EmbedConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    Windows,
    MacOs,
    Linux,
}

impl PlatformFamily {
    /// Family of the build target. Anything that is not Windows or macOS is treated as Linux.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            PlatformFamily::Windows
        } else if cfg!(target_os = "macos") {
            PlatformFamily::MacOs
        } else {
            PlatformFamily::Linux
        }
    }
}

/// How the native child window relates to its parent's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OriginModel {
    /// The child window always starts at the parent's visible origin; the engine is told
    /// to shift its content by the negated clipping offset instead.
    NonRelocatable,
    /// The child window is moved to the visible area itself.
    Relocatable,
    /// Like [`OriginModel::NonRelocatable`], with the vertical offset and the size of the
    /// browser rectangle additionally divided by `divisor`. The horizontal offset keeps the
    /// measured scale.
    NonRelocatableAxisScaled { divisor: f64 },
}

/// How engine-reported device coordinates are mapped back to logical screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTransform {
    /// Divide by the scale, then make relative to the root window.
    ScaleFirst,
    /// Translate by the display's device origin before dividing, so coordinates near a
    /// display edge do not drift.
    PreserveDeviceOrigin,
}

/// Where the scale factor comes from on a family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleSource {
    /// The platform composes scaling natively; the embedding always works at 1.0.
    Native,
    /// Per-display DPI when added to a display, refined from the paint transform.
    Measured,
    /// A global value that overrides all measurements.
    Forced(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformStrategy {
    pub family: PlatformFamily,
    pub origin: OriginModel,
    pub input: InputTransform,
    pub scale: ScaleSource,
    /// A heavyweight child surface is created to act as the native parent.
    pub heavyweight_child: bool,
    /// The native parent handle of the container is looked up from the toolkit and cached.
    pub lookup_container_handle: bool,
    /// After the container is realized, bounds have to be pushed once more by the timer.
    pub reassert_after_realize: bool,
}

impl PlatformStrategy {
    pub fn for_family(family: PlatformFamily, config: &EmbedConfig) -> Self {
        let forced = config.forced_scale;
        match family {
            PlatformFamily::Windows => Self {
                family,
                origin: OriginModel::NonRelocatable,
                input: InputTransform::PreserveDeviceOrigin,
                scale: forced.map_or(ScaleSource::Measured, ScaleSource::Forced),
                heavyweight_child: true,
                lookup_container_handle: false,
                reassert_after_realize: false,
            },
            PlatformFamily::MacOs => Self {
                family,
                origin: OriginModel::Relocatable,
                input: InputTransform::ScaleFirst,
                scale: forced.map_or(ScaleSource::Native, ScaleSource::Forced),
                heavyweight_child: false,
                lookup_container_handle: true,
                reassert_after_realize: true,
            },
            PlatformFamily::Linux => Self {
                family,
                origin: OriginModel::NonRelocatableAxisScaled {
                    divisor: config.axis_scale_divisor,
                },
                input: InputTransform::ScaleFirst,
                scale: forced.map_or(ScaleSource::Measured, ScaleSource::Forced),
                heavyweight_child: true,
                lookup_container_handle: false,
                reassert_after_realize: true,
            },
        }
    }

    pub fn from_config(config: &EmbedConfig) -> Self {
        Self::for_family(config.platform_family(), config)
    }
}
