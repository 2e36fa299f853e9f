use std::{
    any::Any,
    iter::StepBy,
    ops::Range,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    composite::flatten::flatten_pixels,
    encode::{
        naming::{frame_path, index_digits},
        png::{ChannelLayout, PngWriter, RasterView},
    },
    engine::{AnimationContext, AnimationEngine, lottie::LottieEngine, probe},
    export::{
        request::{ExportRequest, FailurePolicy},
        schedule::{clamp_worker_count, resolve_worker_count, worker_indices, worker_share},
    },
    foundation::{
        core::{Canvas, ExportKey, PixelBuffer, RGBA_CHANNELS},
        error::{ExportError, ExportResult, FailureReport, FrameError, FrameFailure},
    },
    timing::resample::FrameTiming,
};

/// Outcome of a fully successful export.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExportSummary {
    /// Engine cache key used by every worker.
    pub key: ExportKey,
    pub native_frames: u64,
    pub native_fps: f64,
    pub effective_fps: f64,
    pub output_frames: u64,
    pub frames_written: u64,
    /// Worker threads actually started, capped at the output frame count.
    pub workers: usize,
    /// Zero-padded width of the written file names.
    pub digits: usize,
}

/// Export `request` with the built-in Lottie engine.
pub fn export_lottie(request: &ExportRequest) -> ExportResult<ExportSummary> {
    export(&LottieEngine::new(), request)
}

/// Render every output frame of `request` to `NNN.png` files using a fixed pool of workers.
///
/// Steps:
/// 1. Validate the request and load the animation metadata once
///    (failures here are [`ExportError::InvalidAnimation`] and no worker is started).
/// 2. Resample the native timeline onto the target frame rate ([`FrameTiming`]).
/// 3. Start `workers` threads, at most one per output frame. Worker `i` loads its own context and renders output indices
///    `i, i + workers, ...`: render, flatten against the background, write the PNG.
/// 4. Block until every worker has finished, then aggregate per-frame failures.
///
/// Files written before a failure are kept. The call succeeds only if every output frame was
/// written; otherwise [`ExportError::Frames`] lists each failed index and its cause.
#[tracing::instrument(
    skip(engine, request),
    fields(dir = %request.output_dir.display(), width = request.width, height = request.height)
)]
pub fn export<E: AnimationEngine>(
    engine: &E,
    request: &ExportRequest,
) -> ExportResult<ExportSummary> {
    let canvas = request.validate()?;
    let key = request.key.unwrap_or_else(ExportKey::issue);
    let _release = ReleaseGuard { engine, key };

    let info = catch_unwind(AssertUnwindSafe(|| probe(engine, &request.source, key)))
        .map_err(|payload| {
            ExportError::invalid_animation(format!(
                "engine panicked while loading: {}",
                panic_message(payload.as_ref())
            ))
        })?
        .map_err(|e| ExportError::invalid_animation(format!("{e:#}")))?;
    let timing = FrameTiming::new(info.total_frames, info.frame_rate, request.target_fps)?;
    let digits = index_digits(timing.output_frames());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(clamp_worker_count(
            resolve_worker_count(request.workers),
            timing.output_frames(),
        ))
        .thread_name(|i| format!("lottie-frames-worker-{i}"))
        .build()
        .map_err(|e| ExportError::Pool(format!("failed to build worker pool: {e}")))?;
    // The partition must match the threads `broadcast` actually runs on.
    let workers = pool.current_num_threads();

    tracing::info!(
        native_frames = timing.native_frames(),
        native_fps = timing.native_fps(),
        effective_fps = timing.effective_fps(),
        output_frames = timing.output_frames(),
        workers,
        %key,
        "export started"
    );
    if timing.step() < 1.0 {
        tracing::debug!(
            step = timing.step(),
            "target fps exceeds native fps; native frames are repeated"
        );
    }

    let shared = Shared {
        engine,
        request,
        key,
        canvas,
        timing,
        workers,
        digits,
        stop: AtomicBool::new(false),
    };
    let outcomes = pool.broadcast(|ctx| run_worker_guarded(ctx.index(), &shared));
    let (written, report) = aggregate(outcomes, timing.output_frames())?;

    if !report.is_empty() {
        tracing::warn!(
            failed = report.failures.len(),
            written,
            skipped = report.skipped,
            "export finished with failures"
        );
        return Err(ExportError::Frames(report));
    }
    if report.skipped > 0 {
        tracing::warn!(written, skipped = report.skipped, "export cancelled");
        return Err(ExportError::Cancelled {
            written,
            skipped: report.skipped,
        });
    }

    tracing::info!(written, "export finished");
    Ok(ExportSummary {
        key,
        native_frames: timing.native_frames(),
        native_fps: timing.native_fps(),
        effective_fps: timing.effective_fps(),
        output_frames: timing.output_frames(),
        frames_written: written,
        workers,
        digits,
    })
}

/// Merge per-worker outcomes. Every output index must be accounted for exactly once.
fn aggregate(outcomes: Vec<WorkerOutcome>, total: u64) -> ExportResult<(u64, FailureReport)> {
    let mut report = FailureReport {
        total,
        ..FailureReport::default()
    };
    let mut written = 0u64;
    for outcome in outcomes {
        written += outcome.written;
        report.skipped += outcome.skipped;
        report.failures.extend(outcome.failures);
    }
    report.failures.sort_by_key(|f| f.index);

    let accounted = written + report.skipped + report.failures.len() as u64;
    if accounted != total {
        return Err(ExportError::Pool(format!(
            "workers accounted for {accounted} of {total} output frames"
        )));
    }
    Ok((written, report))
}

/// Read-only state shared by all workers of one export.
struct Shared<'a, E> {
    engine: &'a E,
    request: &'a ExportRequest,
    key: ExportKey,
    canvas: Canvas,
    timing: FrameTiming,
    workers: usize,
    digits: usize,
    /// Set on the first failure under [`FailurePolicy::FailFast`].
    stop: AtomicBool,
}

impl<E> Shared<'_, E> {
    fn should_stop(&self) -> bool {
        self.request.is_cancelled() || self.stop.load(Ordering::Relaxed)
    }

    fn note_failure(&self) {
        if self.request.policy == FailurePolicy::FailFast {
            self.stop.store(true, Ordering::Relaxed);
        }
    }

    fn indices(&self, worker: usize) -> StepBy<Range<u64>> {
        worker_indices(worker, self.workers, self.timing.output_frames())
    }
}

#[derive(Debug, Default)]
struct WorkerOutcome {
    written: u64,
    skipped: u64,
    failures: Vec<FrameFailure>,
    /// Assigned indices already accounted for (written, failed or skipped).
    done: usize,
}

impl WorkerOutcome {
    fn fail(&mut self, index: u64, error: FrameError) {
        self.failures.push(FrameFailure { index, error });
        self.done += 1;
    }
}

fn run_worker_guarded<E: AnimationEngine>(worker: usize, shared: &Shared<'_, E>) -> WorkerOutcome {
    let mut outcome = WorkerOutcome::default();
    let result = catch_unwind(AssertUnwindSafe(|| run_worker(worker, shared, &mut outcome)));

    if let Err(payload) = result {
        let message = panic_message(payload.as_ref());
        tracing::error!(worker, %message, "worker panicked");
        shared.note_failure();
        let done = outcome.done;
        for index in shared.indices(worker).skip(done) {
            outcome.fail(
                index,
                FrameError::WorkerPanic {
                    worker,
                    message: message.clone(),
                },
            );
        }
    }
    outcome
}

fn run_worker<E: AnimationEngine>(
    worker: usize,
    shared: &Shared<'_, E>,
    outcome: &mut WorkerOutcome,
) {
    let share = worker_share(worker, shared.workers, shared.timing.output_frames());
    if share == 0 {
        return;
    }
    let _span = tracing::debug_span!("worker", worker, frames = share).entered();

    let mut ctx = match shared.engine.load(&shared.request.source, shared.key) {
        Ok(ctx) => ctx,
        Err(e) => {
            let message = format!("{e:#}");
            tracing::warn!(worker, error = %message, "rendering context creation failed");
            shared.note_failure();
            for index in shared.indices(worker) {
                outcome.fail(
                    index,
                    FrameError::ContextCreation {
                        worker,
                        message: message.clone(),
                    },
                );
            }
            return;
        }
    };

    let mut buffer = PixelBuffer::new(shared.canvas);
    let mut writer = PngWriter::new(shared.request.compression);

    for index in shared.indices(worker) {
        if shared.should_stop() {
            outcome.skipped += 1;
            outcome.done += 1;
            continue;
        }
        match render_frame(&mut ctx, &mut buffer, &mut writer, shared, index) {
            Ok(()) => {
                outcome.written += 1;
                outcome.done += 1;
            }
            Err(error) => {
                tracing::warn!(worker, index, %error, "frame failed");
                shared.note_failure();
                outcome.fail(index, error);
            }
        }
    }
}

fn render_frame<E: AnimationEngine>(
    ctx: &mut E::Context,
    buffer: &mut PixelBuffer,
    writer: &mut PngWriter,
    shared: &Shared<'_, E>,
    index: u64,
) -> Result<(), FrameError> {
    let native = shared.timing.native_index(index);
    ctx.render(native, buffer)
        .map_err(|source| FrameError::Render { native, source })?;
    if buffer.canvas() != shared.canvas
        || buffer.data.len() != shared.canvas.pixel_count() * RGBA_CHANNELS
    {
        let len = buffer.data.len();
        *buffer = PixelBuffer::new(shared.canvas);
        return Err(FrameError::Render {
            native,
            source: anyhow::anyhow!(
                "engine reshaped the pixel buffer ({len} bytes, expected {})",
                buffer.data.len()
            ),
        });
    }
    flatten_pixels(&mut buffer.data, shared.request.background);

    let path = frame_path(&shared.request.output_dir, index, shared.digits);
    writer.write(
        RasterView {
            data: &buffer.data,
            width: buffer.width,
            height: buffer.height,
            layout: ChannelLayout::Rgba8,
        },
        &path,
    )?;
    tracing::debug!(index, native, "frame written");
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Lets the engine drop per-key state however the export ends.
struct ReleaseGuard<'a, E: AnimationEngine> {
    engine: &'a E,
    key: ExportKey,
}

impl<E: AnimationEngine> Drop for ReleaseGuard<'_, E> {
    fn drop(&mut self) {
        self.engine.release(self.key);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
