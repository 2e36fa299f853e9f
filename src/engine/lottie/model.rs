use anyhow::{Context as _, bail};
use kurbo::{Affine, Vec2};

use crate::engine::{AnimationInfo, lottie::property::Property};

pub const LAYER_SOLID: i64 = 1;
pub const LAYER_NULL: i64 = 3;
pub const LAYER_SHAPE: i64 = 4;

/// Root of a Lottie document.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Composition {
    /// Frame rate.
    pub fr: f64,
    /// In point (first frame).
    pub ip: f64,
    /// Out point (exclusive).
    pub op: f64,
    pub w: u32,
    pub h: u32,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Layer {
    pub ty: i64,
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub ind: Option<i64>,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default)]
    pub ip: f64,
    #[serde(default = "unbounded")]
    pub op: f64,
    #[serde(default)]
    pub st: f64,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub ks: Transform,
    /// Solid color (`#rrggbb`), solid layers only.
    #[serde(default)]
    pub sc: Option<String>,
    #[serde(default)]
    pub sw: Option<f64>,
    #[serde(default)]
    pub sh: Option<f64>,
    #[serde(default)]
    pub shapes: Vec<ShapeItem>,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

/// Layer or group transform. Missing properties take Lottie defaults.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub a: Option<Property>,
    #[serde(default)]
    pub p: Option<Property>,
    #[serde(default)]
    pub s: Option<Property>,
    #[serde(default)]
    pub r: Option<Property>,
    #[serde(default)]
    pub o: Option<Property>,
}

impl Transform {
    /// `translate(p) * rotate(r) * scale(s / 100) * translate(-a)`
    pub fn affine(&self, t: f64) -> Affine {
        let anchor = self.a.as_ref().map_or(Vec2::ZERO, |p| p.vec2(t));
        let position = self.p.as_ref().map_or(Vec2::ZERO, |p| p.vec2(t));
        let scale = self
            .s
            .as_ref()
            .map_or(Vec2::new(100.0, 100.0), |p| p.vec2(t))
            / 100.0;
        let rotation = self.r.as_ref().map_or(0.0, |p| p.scalar(t));

        Affine::translate(position)
            * Affine::rotate(rotation.to_radians())
            * Affine::scale_non_uniform(scale.x, scale.y)
            * Affine::translate(-anchor)
    }

    /// Opacity in `[0, 1]`.
    pub fn opacity(&self, t: f64) -> f64 {
        self.o
            .as_ref()
            .map_or(1.0, |p| (p.scalar(t) / 100.0).clamp(0.0, 1.0))
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(tag = "ty")]
pub enum ShapeItem {
    #[serde(rename = "gr")]
    Group {
        #[serde(default)]
        it: Vec<ShapeItem>,
        #[serde(default)]
        hd: bool,
    },
    #[serde(rename = "rc")]
    Rect {
        p: Property,
        s: Property,
        #[serde(default)]
        r: Option<Property>,
    },
    #[serde(rename = "el")]
    Ellipse { p: Property, s: Property },
    #[serde(rename = "fl")]
    Fill {
        c: Property,
        #[serde(default)]
        o: Option<Property>,
    },
    #[serde(rename = "st")]
    Stroke {
        c: Property,
        #[serde(default)]
        o: Option<Property>,
        w: Property,
    },
    #[serde(rename = "tr")]
    Transform(Transform),
    #[serde(other)]
    Unsupported,
}

impl Composition {
    pub fn parse(bytes: &[u8]) -> anyhow::Result<Self> {
        let comp: Self = serde_json::from_slice(bytes).context("parse lottie json")?;
        comp.validate()?;
        comp.log_unsupported();
        Ok(comp)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.fr.is_finite() || self.fr <= 0.0 {
            bail!("lottie frame rate must be > 0 (got {})", self.fr);
        }
        if self.ip.is_nan() || self.op.is_nan() || self.op <= self.ip {
            bail!(
                "lottie out point must be after in point (ip={}, op={})",
                self.ip,
                self.op
            );
        }
        if self.w == 0 || self.h == 0 {
            bail!("lottie width/height must be non-zero");
        }
        Ok(())
    }

    fn log_unsupported(&self) {
        fn walk(items: &[ShapeItem], layer: &str) {
            for item in items {
                match item {
                    ShapeItem::Group { it, .. } => walk(it, layer),
                    ShapeItem::Unsupported => {
                        tracing::debug!(layer, "unsupported lottie shape item skipped");
                    }
                    _ => {}
                }
            }
        }

        for layer in &self.layers {
            let name = layer.nm.as_deref().unwrap_or("unnamed");
            match layer.ty {
                LAYER_SOLID | LAYER_NULL => {}
                LAYER_SHAPE => walk(&layer.shapes, name),
                ty => tracing::debug!(layer = name, ty, "unsupported lottie layer type skipped"),
            }
        }
    }

    pub fn total_frames(&self) -> u64 {
        (self.op - self.ip).round().max(0.0) as u64
    }

    pub fn info(&self) -> AnimationInfo {
        AnimationInfo {
            total_frames: self.total_frames(),
            frame_rate: self.fr,
            width: self.w,
            height: self.h,
        }
    }

    pub fn layer_by_ind(&self, ind: i64) -> Option<&Layer> {
        self.layers.iter().find(|l| l.ind == Some(ind))
    }
}

impl Layer {
    pub fn is_visible_at(&self, t: f64) -> bool {
        !self.hd && self.ip <= t && t < self.op
    }
}

/// Parse `#rrggbb` (or `#rgb`) into RGB bytes.
pub fn parse_hex_color(s: &str) -> anyhow::Result<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    let expand = |c: u8| -> anyhow::Result<u8> {
        let v = (c as char)
            .to_digit(16)
            .with_context(|| format!("invalid hex color '{s}'"))? as u8;
        Ok(v * 17)
    };
    match hex.len() {
        6 => {
            let v = u32::from_str_radix(hex, 16)
                .with_context(|| format!("invalid hex color '{s}'"))?;
            Ok([(v >> 16) as u8, (v >> 8) as u8, v as u8])
        }
        3 => {
            let b = hex.as_bytes();
            Ok([expand(b[0])?, expand(b[1])?, expand(b[2])?])
        }
        _ => bail!("invalid hex color '{s}'"),
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/engine/model.rs"]
mod tests;
