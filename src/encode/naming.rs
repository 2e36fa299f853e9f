use std::path::{Path, PathBuf};

/// Minimum zero-padded width of frame file names.
pub const MIN_INDEX_DIGITS: usize = 3;

/// File extension of written frames.
pub const FRAME_EXTENSION: &str = "png";

/// Digits needed so every index in `[0, output_frames)` has the same width.
pub fn index_digits(output_frames: u64) -> usize {
    let last = output_frames.saturating_sub(1);
    let digits = last.checked_ilog10().map_or(1, |d| d as usize + 1);
    digits.max(MIN_INDEX_DIGITS)
}

/// `000.png`, `001.png`, ... zero-padded to `digits`.
pub fn frame_file_name(index: u64, digits: usize) -> String {
    format!("{index:0digits$}.{FRAME_EXTENSION}")
}

pub fn frame_path(dir: &Path, index: u64, digits: usize) -> PathBuf {
    dir.join(frame_file_name(index, digits))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/naming.rs"]
mod tests;
