//! Rendering capability consumed by the exporter.
//!
//! An [`AnimationEngine`] turns an [`AnimationSource`] into per-worker [`AnimationContext`]s.
//! Contexts are never shared between threads: each worker loads its own and drops it when the
//! worker ends. The engine itself is shared by reference, so any cache it keeps must be `Sync`.

pub(crate) mod lottie;

use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::core::{ExportKey, PixelBuffer};

/// Immutable animation payload shared read-only by all workers of an export.
#[derive(Clone, Debug)]
pub struct AnimationSource(Arc<[u8]>);

impl AnimationSource {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read animation '{}'", path.display()))?;
        Ok(Self(bytes.into()))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether both sources hold the same bytes.
    pub fn same_payload(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl From<&str> for AnimationSource {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<String> for AnimationSource {
    fn from(s: String) -> Self {
        Self::from_bytes(s.into_bytes())
    }
}

/// Native timeline and authored size of a loaded animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct AnimationInfo {
    /// Native frame count.
    pub total_frames: u64,
    /// Native frames per second.
    pub frame_rate: f64,
    /// Authored width in animation units.
    pub width: u32,
    /// Authored height in animation units.
    pub height: u32,
}

/// Factory for rendering contexts.
pub trait AnimationEngine: Sync {
    /// Per-worker rendering context.
    type Context: AnimationContext;

    /// Load `source` into a fresh context.
    ///
    /// Contexts loaded with the same `key` address the same logical animation, so the engine may
    /// share parsed state between them.
    fn load(&self, source: &AnimationSource, key: ExportKey) -> anyhow::Result<Self::Context>;

    /// Called once after every context loaded with `key` has been dropped.
    fn release(&self, _key: ExportKey) {}
}

/// A stateful handle that rasterizes native frames.
pub trait AnimationContext {
    fn info(&self) -> AnimationInfo;

    /// Render native frame `frame` into `target`, scaled to the buffer's dimensions.
    ///
    /// Output is straight-alpha RGBA8. Every pixel of `target` is overwritten.
    fn render(&mut self, frame: u64, target: &mut PixelBuffer) -> anyhow::Result<()>;
}

/// Load a throwaway context and read the animation's metadata.
pub fn probe<E: AnimationEngine>(
    engine: &E,
    source: &AnimationSource,
    key: ExportKey,
) -> anyhow::Result<AnimationInfo> {
    let ctx = engine.load(source, key)?;
    Ok(ctx.info())
}
