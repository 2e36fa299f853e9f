//! Built-in rendering engine for Lottie JSON animations.
//!
//! Covers flat vector content: solid and shape layers, null-layer parenting, rectangles,
//! ellipses, fills and strokes with static or linearly keyframed properties. Unsupported layer
//! and shape types are skipped.

pub(crate) mod model;
pub(crate) mod property;
pub(crate) mod raster;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, bail};
use resvg::tiny_skia;

use crate::{
    engine::{AnimationContext, AnimationEngine, AnimationInfo, AnimationSource},
    foundation::core::{ExportKey, PixelBuffer, RGBA_CHANNELS},
};

use self::model::Composition;

/// Lottie engine with a parse cache keyed by [`ExportKey`].
///
/// All workers of an export load the same key, so the document is parsed once per export.
/// A key stays bound to the source it was first loaded with until it is released; loading a
/// different source under a bound key fails.
#[derive(Debug, Default)]
pub struct LottieEngine {
    cache: Mutex<HashMap<ExportKey, CacheEntry>>,
}

#[derive(Debug)]
struct CacheEntry {
    source: AnimationSource,
    comp: Arc<Composition>,
}

impl LottieEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parsed documents currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl AnimationEngine for LottieEngine {
    type Context = LottieContext;

    fn load(&self, source: &AnimationSource, key: ExportKey) -> anyhow::Result<LottieContext> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow!("lottie parse cache lock poisoned"))?;
        let comp = match cache.get(&key) {
            Some(entry) if entry.source.same_payload(source) => Arc::clone(&entry.comp),
            Some(_) => bail!("export key {key} is already bound to a different animation"),
            None => {
                let comp = Arc::new(Composition::parse(source.bytes())?);
                cache.insert(
                    key,
                    CacheEntry {
                        source: source.clone(),
                        comp: Arc::clone(&comp),
                    },
                );
                comp
            }
        };
        Ok(LottieContext { comp, pixmap: None })
    }

    fn release(&self, key: ExportKey) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(&key);
        }
    }
}

/// Per-worker Lottie renderer. Owns a scratch pixmap reused across frames.
pub struct LottieContext {
    comp: Arc<Composition>,
    pixmap: Option<tiny_skia::Pixmap>,
}

impl AnimationContext for LottieContext {
    fn info(&self) -> AnimationInfo {
        self.comp.info()
    }

    fn render(&mut self, frame: u64, target: &mut PixelBuffer) -> anyhow::Result<()> {
        let expected = target.width as usize * target.height as usize * RGBA_CHANNELS;
        if target.data.len() != expected {
            return Err(anyhow!(
                "pixel buffer holds {} bytes, expected {expected} for {}x{}",
                target.data.len(),
                target.width,
                target.height
            ));
        }

        let reuse = self
            .pixmap
            .as_ref()
            .is_some_and(|p| p.width() == target.width && p.height() == target.height);
        if !reuse {
            self.pixmap = Some(
                tiny_skia::Pixmap::new(target.width, target.height).ok_or_else(|| {
                    anyhow!(
                        "failed to allocate {}x{} pixmap",
                        target.width,
                        target.height
                    )
                })?,
            );
        }
        let pixmap = self
            .pixmap
            .as_mut()
            .ok_or_else(|| anyhow!("pixmap missing after allocation"))?;
        pixmap.fill(tiny_skia::Color::TRANSPARENT);

        // Past-the-end indices (from up-sampling) show the last frame.
        let last = self.comp.total_frames().saturating_sub(1);
        let t = self.comp.ip + frame.min(last) as f64;
        raster::draw_composition(&self.comp, t, pixmap);

        for (dst, px) in target
            .data
            .chunks_exact_mut(RGBA_CHANNELS)
            .zip(pixmap.pixels())
        {
            let c = px.demultiply();
            dst.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/engine/lottie.rs"]
mod tests;
