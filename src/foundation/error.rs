use std::{fmt, path::PathBuf};

/// Convenience result type used across the crate.
pub type ExportResult<T> = Result<T, ExportError>;

/// Top-level error taxonomy returned by [`crate::export`].
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// The animation source could not be loaded, or it reports zero frames or a zero frame rate.
    #[error("invalid animation: {0}")]
    InvalidAnimation(String),

    /// Invalid caller-provided export parameters.
    #[error("invalid export request: {0}")]
    Validation(String),

    /// The worker pool could not be started.
    #[error("worker pool error: {0}")]
    Pool(String),

    /// One or more output frames failed. Files written by other frames are kept.
    #[error("{0}")]
    Frames(FailureReport),

    /// The export was cancelled before every frame was written.
    #[error("export cancelled: {written} frames written, {skipped} skipped")]
    Cancelled {
        /// Frames written before cancellation was observed.
        written: u64,
        /// Frames never attempted.
        skipped: u64,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Build an [`ExportError::InvalidAnimation`] value.
    pub fn invalid_animation(msg: impl Into<String>) -> Self {
        Self::InvalidAnimation(msg.into())
    }

    /// Build an [`ExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Return the aggregate frame report, if this error carries one.
    pub fn failure_report(&self) -> Option<&FailureReport> {
        match self {
            Self::Frames(report) => Some(report),
            _ => None,
        }
    }
}

/// Why a single output frame did not produce a file.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// The worker owning this frame could not construct its rendering context.
    #[error("worker {worker} could not create a rendering context: {message}")]
    ContextCreation {
        /// Worker index in `[0, workers)`.
        worker: usize,
        /// Rendered cause, shared by every frame of the worker.
        message: String,
    },

    /// The rendering capability failed on a native frame.
    #[error("failed to render native frame {native}: {source:#}")]
    Render {
        /// Native frame index handed to the engine.
        native: u64,
        /// Engine-reported cause.
        #[source]
        source: anyhow::Error,
    },

    /// The image codec rejected the frame.
    #[error("failed to encode '{}': {source}", path.display())]
    Encode {
        /// Destination file.
        path: PathBuf,
        /// Codec error.
        #[source]
        source: image::ImageError,
    },

    /// The destination file could not be created or written.
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        /// Destination file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The worker panicked before finishing this frame.
    #[error("worker {worker} panicked: {message}")]
    WorkerPanic {
        /// Worker index in `[0, workers)`.
        worker: usize,
        /// Panic payload, when it was a string.
        message: String,
    },
}

/// A failed output frame and its cause.
#[derive(Debug)]
pub struct FrameFailure {
    /// Output frame index.
    pub index: u64,
    /// What went wrong.
    pub error: FrameError,
}

/// Aggregate of every per-frame failure collected at the join barrier.
#[derive(Debug, Default)]
pub struct FailureReport {
    /// Failures, sorted by output index.
    pub failures: Vec<FrameFailure>,
    /// Output frame count of the export.
    pub total: u64,
    /// Frames never attempted because the export stopped early.
    pub skipped: u64,
}

impl FailureReport {
    /// Output indices that failed, in ascending order.
    pub fn failed_indices(&self) -> Vec<u64> {
        self.failures.iter().map(|f| f.index).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} frames failed",
            self.failures.len(),
            self.total
        )?;
        if self.skipped > 0 {
            write!(f, " ({} skipped)", self.skipped)?;
        }
        for failure in &self.failures {
            write!(f, "\n  frame {}: {}", failure.index, failure.error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
