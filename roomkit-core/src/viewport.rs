//! Video fitting geometry
//!
//! Maps a decoded frame size onto a viewport:
//! - `Fit`: the draw rectangle is the viewport itself, aspect handling is left
//!   to the renderer
//! - `Fill`: the source is scaled to cover the viewport and centered, so the
//!   overflowing axis gets a negative origin and is cropped

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Reports at or below this size on either axis are discarded
pub const MIN_VALID_DIMENSION: i32 = 1;

/// Size of the decoded source frame in pixels; both axes are non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl Dimensions {
    /// `None` when either axis is zero
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => Some(Self { width, height }),
            _ => None,
        }
    }

    /// Validate a raw frame-size report from the media engine.
    ///
    /// Some engines occasionally report degenerate 1x1 frames; anything with
    /// an axis `<= 1` is rejected.
    #[must_use]
    pub fn from_report(width: i32, height: i32) -> Option<Self> {
        if width <= MIN_VALID_DIMENSION || height <= MIN_VALID_DIMENSION {
            return None;
        }
        Self::new(width.unsigned_abs(), height.unsigned_abs())
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width.get()
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height.get()
    }
}

/// Viewport size in layout units; both axes are finite and positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSize")]
pub struct Size {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawSize {
    width: f64,
    height: f64,
}

impl TryFrom<RawSize> for Size {
    type Error = String;

    fn try_from(raw: RawSize) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
            .ok_or_else(|| format!("viewport must be positive, got {}x{}", raw.width, raw.height))
    }
}

impl Size {
    /// `None` unless both axes are finite and greater than zero
    #[must_use]
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    Fit,
    #[default]
    Fill,
}

/// Rectangle at which the source is drawn, relative to the viewport origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering `size` at the origin
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }
}

/// Scale transform applied to the rendered surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
    };

    /// Horizontal flip
    pub const MIRRORED: Self = Self {
        scale_x: -1.0,
        scale_y: 1.0,
    };

    #[must_use]
    pub const fn for_mirror(mirror: bool) -> Self {
        if mirror {
            Self::MIRRORED
        } else {
            Self::IDENTITY
        }
    }

    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.scale_x < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compute where the source frame is drawn inside the viewport
#[must_use]
pub fn compute_draw_rect(source: Dimensions, viewport: Size, mode: FitMode) -> Rect {
    match mode {
        FitMode::Fit => Rect::from_size(viewport),
        FitMode::Fill => fill_rect(source, viewport),
    }
}

fn fill_rect(source: Dimensions, viewport: Size) -> Rect {
    let source_width = f64::from(source.width());
    let source_height = f64::from(source.height());

    let width_ratio = viewport.width / source_width;
    let height_ratio = viewport.height / source_height;

    let (draw_width, draw_height) = if height_ratio > width_ratio {
        (viewport.height / source_height * source_width, viewport.height)
    } else if width_ratio > height_ratio {
        (viewport.width, viewport.width / source_width * source_height)
    } else {
        (viewport.width, viewport.height)
    };

    Rect {
        x: -(draw_width - viewport.width) / 2.0,
        y: -(draw_height - viewport.height) / 2.0,
        width: draw_width,
        height: draw_height,
    }
}
