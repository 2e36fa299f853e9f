use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    composite::flatten::WHITE,
    encode::png::Compression,
    engine::AnimationSource,
    foundation::{
        core::{Canvas, ExportKey},
        error::{ExportError, ExportResult},
    },
};

/// What workers do after a frame fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep rendering every remaining frame; report all failures at the end.
    #[default]
    Continue,
    /// Stop picking up new frames after the first failure. Unattempted frames count as skipped.
    FailFast,
}

/// Cooperative cancellation flag, checked by workers before each frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything one export needs. Immutable for the duration of the call.
#[derive(Clone, Debug)]
pub struct ExportRequest {
    /// Animation payload, shared read-only by all workers.
    pub source: AnimationSource,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Existing directory receiving `NNN.png` files.
    pub output_dir: PathBuf,
    /// Output frame rate; `0.0` keeps the animation's native rate.
    pub target_fps: f64,
    /// Worker thread count; `0` uses the available hardware parallelism.
    pub workers: usize,
    /// Engine cache key; issued fresh when `None`.
    ///
    /// A supplied key must not be shared by concurrent exports on one engine: the first export
    /// to finish releases the engine's state for it.
    pub key: Option<ExportKey>,
    pub policy: FailurePolicy,
    pub compression: Compression,
    /// Opaque color that transparent pixels are flattened against.
    pub background: [u8; 3],
    pub cancel: Option<CancelToken>,
}

impl ExportRequest {
    /// Request with native frame rate, automatic worker count and default options.
    pub fn new(
        source: AnimationSource,
        width: u32,
        height: u32,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            width,
            height,
            output_dir: output_dir.into(),
            target_fps: 0.0,
            workers: 0,
            key: None,
            policy: FailurePolicy::default(),
            compression: Compression::default(),
            background: WHITE,
            cancel: None,
        }
    }

    pub fn with_target_fps(mut self, fps: f64) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Check caller-provided parameters and return the output canvas.
    pub fn validate(&self) -> ExportResult<Canvas> {
        let canvas = Canvas::new(self.width, self.height)?;
        if !self.target_fps.is_finite() || self.target_fps < 0.0 {
            return Err(ExportError::validation(format!(
                "target fps must be finite and >= 0 (got {})",
                self.target_fps
            )));
        }
        if !self.output_dir.is_dir() {
            return Err(ExportError::validation(format!(
                "output directory '{}' does not exist or is not a directory",
                self.output_dir.display()
            )));
        }
        Ok(canvas)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/request.rs"]
mod tests;
