use crate::foundation::error::{ExportError, ExportResult};

/// Maps an output frame timeline onto an animation's native timeline.
///
/// The mapping is nearest-frame: `native(j) = round(j * native_fps / effective_fps)`.
/// Down-sampling skips native frames, up-sampling repeats them. There is no interpolation
/// between native frames, so an up-sampled sequence contains runs of identical images.
///
/// When up-sampling, the last output frames may round to `native_frames` itself (one past the
/// last native frame). Engines clamp such indices to their final frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTiming {
    native_frames: u64,
    native_fps: f64,
    effective_fps: f64,
    step: f64,
    output_frames: u64,
}

impl FrameTiming {
    /// Build the timing for an animation of `native_frames` at `native_fps`, exported at
    /// `target_fps` (`0.0` keeps the native rate).
    pub fn new(native_frames: u64, native_fps: f64, target_fps: f64) -> ExportResult<Self> {
        if native_frames == 0 {
            return Err(ExportError::invalid_animation(
                "animation reports zero frames",
            ));
        }
        if !native_fps.is_finite() || native_fps <= 0.0 {
            return Err(ExportError::invalid_animation(format!(
                "animation reports a non-positive frame rate ({native_fps})"
            )));
        }
        if !target_fps.is_finite() || target_fps < 0.0 {
            return Err(ExportError::validation(format!(
                "target fps must be finite and >= 0 (got {target_fps})"
            )));
        }

        let effective_fps = if target_fps == 0.0 {
            native_fps
        } else {
            target_fps
        };
        let duration_secs = native_frames as f64 / native_fps;
        let step = native_fps / effective_fps;
        let output_frames = (effective_fps * duration_secs).round() as u64;
        if output_frames == 0 {
            return Err(ExportError::validation(format!(
                "target fps {effective_fps} yields no output frames for a {duration_secs:.3}s animation"
            )));
        }

        Ok(Self {
            native_frames,
            native_fps,
            effective_fps,
            step,
            output_frames,
        })
    }

    pub fn native_frames(&self) -> u64 {
        self.native_frames
    }

    pub fn native_fps(&self) -> f64 {
        self.native_fps
    }

    /// Frame rate of the produced sequence.
    pub fn effective_fps(&self) -> f64 {
        self.effective_fps
    }

    /// Native frames advanced per output frame.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of output frames, `round(effective_fps * duration)`.
    pub fn output_frames(&self) -> u64 {
        self.output_frames
    }

    /// Native frame index for output frame `output`.
    pub fn native_index(&self, output: u64) -> u64 {
        (output as f64 * self.step).round() as u64
    }

    pub fn duration_secs(&self) -> f64 {
        self.native_frames as f64 / self.native_fps
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/resample.rs"]
mod tests;
