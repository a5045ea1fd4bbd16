//! Raster preview of a cut path.
//!
//! Draws the cut line over a copy of the source image at reduced opacity,
//! the way the design surface previews it, via tiny-skia.

use image::{Rgba, RgbaImage};
use kurbo::{BezPath, PathEl};

use crate::error::TraceError;
use crate::path::CutPath;

/// How a cut line is drawn in previews and exports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutLineStyle {
    /// Stroke color (RGB).
    pub color: [u8; 3],
    /// Stroke opacity, 0.0–1.0.
    pub opacity: f32,
    /// Stroke width in output pixels.
    pub width: f32,
}

impl Default for CutLineStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 170],
            opacity: 0.6,
            width: 2.0,
        }
    }
}

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`.
fn kurbo_to_tinyskia(bezpath: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in bezpath.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Render `cut` over `image`. Path coordinates are image pixels.
///
/// An empty cut path returns an unchanged copy of the image.
pub fn preview(
    image: &RgbaImage,
    cut: &CutPath,
    style: &CutLineStyle,
) -> Result<RgbaImage, TraceError> {
    let (w, h) = image.dimensions();
    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| TraceError::Render(format!("cannot allocate {w}x{h} canvas")))?;

    // tiny-skia works on premultiplied pixels.
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    if let Some(sk_path) = kurbo_to_tinyskia(cut.as_bezpath()) {
        let mut paint = tiny_skia::Paint::default();
        let [r, g, b] = style.color;
        let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        paint.set_color_rgba8(r, g, b, alpha);
        paint.anti_alias = true;
        let stroke = tiny_skia::Stroke {
            width: style.width,
            line_join: tiny_skia::LineJoin::Round,
            ..tiny_skia::Stroke::default()
        };
        pixmap.stroke_path(&sk_path, &paint, &stroke, tiny_skia::Transform::identity(), None);
    }

    let mut out = RgbaImage::new(w, h);
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::emit;
    use kurbo::{Affine, Point};

    fn square_cut() -> CutPath {
        let pts = [
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 30.0),
            Point::new(10.0, 30.0),
        ];
        emit(pts.as_slice(), Affine::IDENTITY)
    }

    #[test]
    fn stroke_is_translucent_over_transparent_pixels() {
        let img = RgbaImage::new(40, 40);
        let style = CutLineStyle {
            color: [255, 0, 0],
            opacity: 0.5,
            width: 2.0,
        };
        let out = preview(&img, &square_cut(), &style).unwrap();

        let on_line = out.get_pixel(20, 10).0;
        assert!((100..=160).contains(&on_line[3]), "alpha {:?}", on_line);
        assert!(on_line[0] > 200, "{:?}", on_line);

        // Inside and outside the cut line stay untouched.
        assert_eq!(out.get_pixel(20, 20).0, [0, 0, 0, 0]);
        assert_eq!(out.get_pixel(2, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn stroke_blends_with_artwork() {
        let img = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
        let style = CutLineStyle {
            color: [255, 0, 0],
            opacity: 0.5,
            width: 2.0,
        };
        let out = preview(&img, &square_cut(), &style).unwrap();

        let on_line = out.get_pixel(30, 20).0;
        assert_eq!(on_line[3], 255);
        assert!((60..=200).contains(&on_line[1]), "{:?}", on_line);
        assert_eq!(out.get_pixel(20, 20).0, [255, 255, 255, 255]);
    }

    #[test]
    fn empty_cut_leaves_image_unchanged() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let out = preview(&img, &CutPath::default(), &CutLineStyle::default()).unwrap();
        assert_eq!(out, img);
    }
}
