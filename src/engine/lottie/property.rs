use kurbo::Vec2;

/// A Lottie property value: either static or keyframed.
///
/// Values are stored as flat `f64` component lists (`[x, y]`, `[r, g, b, a]`, `[v]`).
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(try_from = "RawProperty")]
pub enum Property {
    Static(Vec<f64>),
    Animated(Vec<Keyframe>),
}

/// A normalized keyframe. `start` is always resolved, even for trailing keys that only carry `t`.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub start: Vec<f64>,
    pub end: Option<Vec<f64>>,
    pub hold: bool,
}

#[derive(serde::Deserialize)]
struct RawProperty {
    #[serde(default)]
    k: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct RawKeyframe {
    t: f64,
    #[serde(default)]
    s: Option<serde_json::Value>,
    #[serde(default)]
    e: Option<serde_json::Value>,
    #[serde(default)]
    h: Option<u8>,
}

fn components(v: &serde_json::Value) -> Result<Vec<f64>, String> {
    match v {
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(|x| vec![x])
            .ok_or_else(|| format!("non-finite number {n}")),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| format!("expected number, found {item}"))
            })
            .collect(),
        other => Err(format!("expected number or number array, found {other}")),
    }
}

impl TryFrom<RawProperty> for Property {
    type Error = String;

    fn try_from(raw: RawProperty) -> Result<Self, Self::Error> {
        let keyed = matches!(&raw.k, serde_json::Value::Array(items) if items.first().is_some_and(|v| v.is_object()));
        if !keyed {
            return components(&raw.k).map(Self::Static);
        }

        let raw_keys: Vec<RawKeyframe> =
            serde_json::from_value(raw.k).map_err(|e| format!("invalid keyframes: {e}"))?;

        let mut keys = Vec::<Keyframe>::with_capacity(raw_keys.len());
        for rk in raw_keys {
            let start = match rk.s.as_ref() {
                Some(v) => components(v)?,
                None => keys
                    .last()
                    .map(|prev| prev.end.clone().unwrap_or_else(|| prev.start.clone()))
                    .ok_or_else(|| "first keyframe has no value".to_string())?,
            };
            let end = rk.e.as_ref().map(components).transpose()?;
            keys.push(Keyframe {
                time: rk.t,
                start,
                end,
                hold: rk.h == Some(1),
            });
        }

        if keys.is_empty() {
            return Err("animated property has no keyframes".to_string());
        }
        if !keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err("keyframes must be sorted by time".to_string());
        }
        Ok(Self::Animated(keys))
    }
}

impl Property {
    pub fn constant(values: impl Into<Vec<f64>>) -> Self {
        Self::Static(values.into())
    }

    /// Sample at layer-local time `t` (in frames).
    ///
    /// Keyframes interpolate linearly; bezier easing handles are not applied.
    pub fn sample(&self, t: f64) -> Vec<f64> {
        let keys = match self {
            Self::Static(v) => return v.clone(),
            Self::Animated(keys) => keys,
        };

        let idx = keys.partition_point(|k| k.time <= t);
        if idx == 0 {
            return keys[0].start.clone();
        }
        if idx >= keys.len() {
            let last = &keys[keys.len() - 1];
            return last.start.clone();
        }

        let a = &keys[idx - 1];
        let b = &keys[idx];
        if a.hold {
            return a.start.clone();
        }
        let to = a.end.as_ref().unwrap_or(&b.start);
        let span = b.time - a.time;
        if span <= 0.0 {
            return a.start.clone();
        }

        let u = ((t - a.time) / span).clamp(0.0, 1.0);
        a.start
            .iter()
            .zip(to.iter())
            .map(|(x, y)| x + (y - x) * u)
            .collect()
    }

    pub fn scalar(&self, t: f64) -> f64 {
        self.sample(t).first().copied().unwrap_or(0.0)
    }

    pub fn vec2(&self, t: f64) -> Vec2 {
        let v = self.sample(t);
        match v.as_slice() {
            [] => Vec2::ZERO,
            [x] => Vec2::new(*x, *x),
            [x, y, ..] => Vec2::new(*x, *y),
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/engine/property.rs"]
mod tests;
