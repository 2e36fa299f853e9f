use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{ExportError, ExportResult};

/// Bytes per pixel of a [`PixelBuffer`] (straight-alpha RGBA8).
pub const RGBA_CHANNELS: usize = 4;

/// Disambiguates concurrent exports that share an engine-level cache.
///
/// Every worker of one export loads its context with the same key, so engines may share parsed
/// state between them. Two exports never share a key unless the caller supplies one explicitly.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ExportKey(pub u64);

static NEXT_EXPORT_KEY: AtomicU64 = AtomicU64::new(1);

impl ExportKey {
    /// Issue a fresh, process-unique key.
    pub fn issue() -> Self {
        Self(NEXT_EXPORT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ExportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output raster dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> ExportResult<Self> {
        if width == 0 || height == 0 {
            return Err(ExportError::validation("width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Row-major straight-alpha RGBA8 pixels, tightly packed.
///
/// One buffer is owned by each worker and reused across all of its frames: the engine renders
/// into it, then the compositor flattens it in place.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.pixel_count() * RGBA_CHANNELS],
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * RGBA_CHANNELS
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
