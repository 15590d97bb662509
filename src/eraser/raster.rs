use egui::{Pos2, Vec2};
use image::RgbaImage;
use log::debug;
use tiny_skia::{ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::path::{PathCommand, StrokePath};
use crate::error::{EditorError, EditorResult};
use crate::geometry::Matrix;

/// Erase `strokes` out of `source` at its natural resolution.
///
/// `object_matrix` maps centre-relative local pixels to scene space (the
/// image object's full transform). Every stroke point is taken back through
/// its inverse and shifted to top-left pixel origin; stroke widths are divided
/// by `scale` so the erased band matches what the user saw on screen.
pub fn erase_strokes(
    source: &RgbaImage,
    object_matrix: &Matrix,
    scale: f32,
    strokes: &[StrokePath],
) -> EditorResult<RgbaImage> {
    let (width, height) = source.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(EditorError::RasterAllocation { width, height })?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(source.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    let Some(inverse) = object_matrix.inverse() else {
        debug!("Image transform is not invertible, nothing erased");
        return Ok(source.clone());
    };
    let half = Vec2::new(width as f32, height as f32) / 2.0;
    let to_pixels = |p: Pos2| inverse.transform_point(p) + half;
    let scale = if scale.abs() > f32::EPSILON { scale.abs() } else { 1.0 };

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;
    paint.blend_mode = tiny_skia::BlendMode::DestinationOut;

    for stroke in strokes {
        let local = stroke.map(&to_pixels, stroke.width() / scale);
        erase_one(&mut pixmap, &local, &paint);
    }

    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect::<Vec<u8>>();
    RgbaImage::from_raw(width, height, pixels).ok_or(EditorError::RasterAllocation { width, height })
}

fn erase_one(pixmap: &mut Pixmap, path: &StrokePath, paint: &Paint<'_>) {
    let radius = path.width() / 2.0;

    if path.is_dot() {
        let Some(center) = path.points().next() else {
            return;
        };
        if let Some(circle) = PathBuilder::from_circle(center.x, center.y, radius) {
            pixmap.fill_path(&circle, paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(p) => pb.move_to(p.x, p.y),
            PathCommand::LineTo(p) => pb.line_to(p.x, p.y),
            PathCommand::QuadTo { ctrl, to } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
        }
    }
    let Some(skia_path) = pb.finish() else {
        return;
    };
    let stroke = Stroke {
        width: path.width(),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&skia_path, paint, &stroke, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_dot_erases_a_disc() {
        let source = RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 255]));
        let matrix = Matrix::translation(Vec2::new(100.0, 100.0));
        let dot = StrokePath::from_points(&[Pos2::new(100.0, 100.0)], 10.0).unwrap();
        let erased = erase_strokes(&source, &matrix, 1.0, &[dot]).unwrap();

        assert_eq!(erased.get_pixel(20, 20).0[3], 0);
        assert_eq!(erased.get_pixel(2, 2).0[3], 255);
        assert_eq!(erased.get_pixel(2, 2).0[0], 255);
    }

    #[test]
    fn test_no_strokes_keep_pixels() {
        let source = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]));
        let erased = erase_strokes(&source, &Matrix::IDENTITY, 1.0, &[]).unwrap();
        assert_eq!(erased, source);
    }
}
