use kurbo::{Affine, BezPath, Ellipse, PathEl, Rect, Shape as _};
use resvg::tiny_skia;

use crate::engine::lottie::model::{
    Composition, LAYER_SHAPE, LAYER_SOLID, Layer, ShapeItem, parse_hex_color,
};
use crate::engine::lottie::property::Property;

const PATH_TOLERANCE: f64 = 0.1;

/// Parent chains longer than this are treated as cycles and cut.
const MAX_PARENT_DEPTH: usize = 64;

/// Draw every visible layer of `comp` at composition time `t` into `pixmap`, scaled from the
/// composition size to the pixmap size.
pub fn draw_composition(comp: &Composition, t: f64, pixmap: &mut tiny_skia::Pixmap) {
    let fit = Affine::scale_non_uniform(
        f64::from(pixmap.width()) / f64::from(comp.w),
        f64::from(pixmap.height()) / f64::from(comp.h),
    );

    // Layers are listed top-most first.
    for layer in comp.layers.iter().rev() {
        if !layer.is_visible_at(t) {
            continue;
        }
        let local_t = t - layer.st;
        let xf = fit * layer_matrix(comp, layer, t);
        let opacity = layer.ks.opacity(local_t);
        if opacity <= 0.0 {
            continue;
        }

        match layer.ty {
            LAYER_SOLID => draw_solid(layer, xf, opacity, pixmap),
            LAYER_SHAPE => draw_items(&layer.shapes, xf, opacity, local_t, pixmap),
            // Null layers only contribute their transform to children.
            _ => {}
        }
    }
}

fn layer_matrix(comp: &Composition, layer: &Layer, t: f64) -> Affine {
    let mut m = layer.ks.affine(t - layer.st);
    let mut parent = layer.parent;
    let mut depth = 0;
    while let Some(ind) = parent
        && depth < MAX_PARENT_DEPTH
    {
        let Some(p) = comp.layer_by_ind(ind) else {
            break;
        };
        m = p.ks.affine(t - p.st) * m;
        parent = p.parent;
        depth += 1;
    }
    m
}

fn draw_solid(layer: &Layer, xf: Affine, opacity: f64, pixmap: &mut tiny_skia::Pixmap) {
    let (Some(w), Some(h)) = (layer.sw, layer.sh) else {
        return;
    };
    let rgb = match layer.sc.as_deref().map(parse_hex_color) {
        Some(Ok(rgb)) => rgb,
        Some(Err(e)) => {
            tracing::debug!(error = %e, "solid layer color ignored");
            return;
        }
        None => [0, 0, 0],
    };

    let path = Rect::new(0.0, 0.0, w, h).to_path(PATH_TOLERANCE);
    if let Some(path) = to_skia_path(&path) {
        let paint = solid_paint(
            [
                f64::from(rgb[0]) / 255.0,
                f64::from(rgb[1]) / 255.0,
                f64::from(rgb[2]) / 255.0,
            ],
            opacity,
        );
        pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            to_skia_transform(xf),
            None,
        );
    }
}

fn draw_items(
    items: &[ShapeItem],
    parent: Affine,
    parent_opacity: f64,
    t: f64,
    pixmap: &mut tiny_skia::Pixmap,
) {
    let (local, local_opacity) = items
        .iter()
        .find_map(|item| match item {
            ShapeItem::Transform(tr) => Some((tr.affine(t), tr.opacity(t))),
            _ => None,
        })
        .unwrap_or((Affine::IDENTITY, 1.0));
    let xf = parent * local;
    let opacity = parent_opacity * local_opacity;
    if opacity <= 0.0 {
        return;
    }

    let mut geometry = BezPath::new();
    for item in items {
        match item {
            ShapeItem::Rect { p, s, r } => {
                let rect = Rect::from_center_size(p.vec2(t).to_point(), s.vec2(t).to_size());
                let radius = r.as_ref().map_or(0.0, |r| r.scalar(t)).max(0.0);
                if radius > 0.0 {
                    geometry.extend(rect.to_rounded_rect(radius).path_elements(PATH_TOLERANCE));
                } else {
                    geometry.extend(rect.path_elements(PATH_TOLERANCE));
                }
            }
            ShapeItem::Ellipse { p, s } => {
                let bounds = Rect::from_center_size(p.vec2(t).to_point(), s.vec2(t).to_size());
                geometry.extend(Ellipse::from_rect(bounds).path_elements(PATH_TOLERANCE));
            }
            _ => {}
        }
    }
    let path = to_skia_path(&geometry);
    let transform = to_skia_transform(xf);

    for item in items.iter().rev() {
        match item {
            ShapeItem::Group { it, hd: false } => draw_items(it, xf, opacity, t, pixmap),
            ShapeItem::Fill { c, o } => {
                let Some(path) = path.as_ref() else { continue };
                let paint = solid_paint(color(c, t), opacity * paint_opacity(o.as_ref(), t));
                pixmap.fill_path(path, &paint, tiny_skia::FillRule::Winding, transform, None);
            }
            ShapeItem::Stroke { c, o, w } => {
                let Some(path) = path.as_ref() else { continue };
                let width = w.scalar(t);
                if width <= 0.0 {
                    continue;
                }
                let paint = solid_paint(color(c, t), opacity * paint_opacity(o.as_ref(), t));
                let stroke = tiny_skia::Stroke {
                    width: width as f32,
                    ..tiny_skia::Stroke::default()
                };
                pixmap.stroke_path(path, &paint, &stroke, transform, None);
            }
            _ => {}
        }
    }
}

fn color(c: &Property, t: f64) -> [f64; 3] {
    let v = c.sample(t);
    let get = |i: usize| v.get(i).copied().unwrap_or(0.0);
    [get(0), get(1), get(2)]
}

fn paint_opacity(o: Option<&Property>, t: f64) -> f64 {
    o.map_or(1.0, |p| (p.scalar(t) / 100.0).clamp(0.0, 1.0))
}

fn unit_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn solid_paint(rgb: [f64; 3], opacity: f64) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(
        unit_to_u8(rgb[0]),
        unit_to_u8(rgb[1]),
        unit_to_u8(rgb[2]),
        unit_to_u8(opacity),
    );
    paint.anti_alias = true;
    paint
}

fn to_skia_transform(xf: Affine) -> tiny_skia::Transform {
    let [a, b, c, d, e, f] = xf.as_coeffs();
    tiny_skia::Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

#[cfg(test)]
#[path = "../../../tests/unit/engine/raster.rs"]
mod tests;
