use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use image::{
    ExtendedColorType, ImageEncoder as _, ImageError,
    codecs::png::{CompressionType, FilterType, PngEncoder},
    error::{ParameterError, ParameterErrorKind},
};

use crate::foundation::{core::RGBA_CHANNELS, error::FrameError};

/// PNG compression effort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Compression {
    Fast,
    #[default]
    Default,
    Best,
}

impl Compression {
    fn codec_setting(self) -> CompressionType {
        match self {
            Self::Fast => CompressionType::Fast,
            Self::Default => CompressionType::Default,
            Self::Best => CompressionType::Best,
        }
    }
}

/// Channel layout of a flattened raster handed to [`PngWriter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb8,
    /// Flattened RGBA8; the alpha byte is dropped on write.
    Rgba8,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => RGBA_CHANNELS,
        }
    }
}

/// Borrowed, row-major, tightly packed raster.
#[derive(Clone, Copy, Debug)]
pub struct RasterView<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub layout: ChannelLayout,
}

impl RasterView<'_> {
    fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.layout.channels()
    }
}

/// Writes flattened frames as 8-bit RGB, non-interlaced PNG files.
///
/// Each worker owns one writer so the RGB scratch buffer is reused across frames. A file that
/// fails partway through encoding is removed; no handle outlives [`PngWriter::write`].
#[derive(Debug, Default)]
pub struct PngWriter {
    compression: Compression,
    scratch: Vec<u8>,
}

impl PngWriter {
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            scratch: Vec::new(),
        }
    }

    pub fn write(&mut self, raster: RasterView<'_>, path: &Path) -> Result<(), FrameError> {
        if raster.width == 0 || raster.height == 0 || raster.data.len() != raster.expected_len()
        {
            return Err(FrameError::Encode {
                path: path.to_path_buf(),
                source: ImageError::Parameter(ParameterError::from_kind(
                    ParameterErrorKind::DimensionMismatch,
                )),
            });
        }

        if raster.layout == ChannelLayout::Rgba8 {
            self.scratch.clear();
            self.scratch.reserve(raster.width as usize * raster.height as usize * 3);
            for px in raster.data.chunks_exact(RGBA_CHANNELS) {
                self.scratch.extend_from_slice(&px[..3]);
            }
        }
        let rgb: &[u8] = match raster.layout {
            ChannelLayout::Rgb8 => raster.data,
            ChannelLayout::Rgba8 => &self.scratch,
        };

        let file = File::create(path).map_err(|source| FrameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut partial = PartialFileGuard(Some(path.to_path_buf()));
        let mut out = BufWriter::new(file);

        PngEncoder::new_with_quality(
            &mut out,
            self.compression.codec_setting(),
            FilterType::Adaptive,
        )
        .write_image(rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| classify_image_error(e, path))?;

        out.flush().map_err(|source| FrameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        drop(out);

        partial.commit();
        Ok(())
    }
}

fn classify_image_error(err: ImageError, path: &Path) -> FrameError {
    match err {
        ImageError::IoError(source) => FrameError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => FrameError::Encode {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Removes a partially written file unless committed.
struct PartialFileGuard(Option<PathBuf>);

impl PartialFileGuard {
    fn commit(&mut self) {
        self.0 = None;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
