//! Export vector animations to numbered PNG image sequences.
//!
//! An export resamples the animation's native timeline onto a target frame rate, splits the
//! output frames across a fixed pool of worker threads, and has each worker render, flatten and
//! write its frames independently.
//!
//! # Pipeline overview
//!
//! 1. **Probe**: load the animation once and read its native frame count and frame rate
//! 2. **Resample**: [`FrameTiming`] maps output frame `j` to native frame `round(j * step)`
//! 3. **Render**: worker `i` of `n` owns output frames `i, i + n, ...`, each with its own
//!    [`AnimationContext`] and [`PixelBuffer`]
//! 4. **Flatten**: transparent pixels are blended onto an opaque background
//! 5. **Write**: one RGB PNG per output frame, named `000.png`, `001.png`, ...
//!
//! Rendering is pluggable through [`AnimationEngine`]; [`LottieEngine`] is the built-in engine
//! for Lottie JSON.
//!
//! ```no_run
//! use lottie_frames::{AnimationSource, ExportRequest, export_lottie};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = AnimationSource::from_path("anim.json".as_ref())?;
//! let request = ExportRequest::new(source, 512, 512, "frames").with_target_fps(30.0);
//! let summary = export_lottie(&request)?;
//! println!("wrote {} frames", summary.frames_written);
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod composite;
mod encode;
mod engine;
mod export;
mod foundation;
mod timing;

pub use composite::flatten::{WHITE, blend_pixel, flatten_rgba8_in_place, flatten_rgba8_to_rgb8};
pub use encode::naming::{
    FRAME_EXTENSION, MIN_INDEX_DIGITS, frame_file_name, frame_path, index_digits,
};
pub use encode::png::{ChannelLayout, Compression, PngWriter, RasterView};
pub use engine::lottie::{LottieContext, LottieEngine};
pub use engine::{AnimationContext, AnimationEngine, AnimationInfo, AnimationSource, probe};
pub use export::pipeline::{ExportSummary, export, export_lottie};
pub use export::request::{CancelToken, ExportRequest, FailurePolicy};
pub use export::schedule::{
    clamp_worker_count, resolve_worker_count, worker_indices, worker_share,
};
pub use foundation::core::{Canvas, ExportKey, PixelBuffer, RGBA_CHANNELS};
pub use foundation::error::{
    ExportError, ExportResult, FailureReport, FrameError, FrameFailure,
};
pub use timing::resample::FrameTiming;
