//! Raster erasing on image objects.
//!
//! Strokes collected during a session are previews only; the image's pixels
//! change once, when the session is applied.

mod path;
mod raster;

use egui::Pos2;
use image::RgbaImage;

pub use path::{PathCommand, StrokePath};
pub use raster::erase_strokes;

use crate::element::{DesignObject, ImageElement, LockFlags};
use crate::error::EditorResult;
use crate::id_generator::ObjectId;

/// State of one erase session on a single image object
#[derive(Debug, Clone)]
pub struct EraseSession {
    target: ObjectId,
    /// Source restored on cancel
    original: ImageElement,
    /// Lock flags to put back when the session ends
    previous_locks: LockFlags,
    brush_size: f32,
    strokes: Vec<StrokePath>,
    current: Vec<Pos2>,
}

impl EraseSession {
    pub fn new(target: ObjectId, original: ImageElement, previous_locks: LockFlags, brush_size: f32) -> Self {
        Self {
            target,
            original,
            previous_locks,
            brush_size,
            strokes: Vec::new(),
            current: Vec::new(),
        }
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn original(&self) -> &ImageElement {
        &self.original
    }

    pub fn previous_locks(&self) -> LockFlags {
        self.previous_locks
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush_size = size;
    }

    pub fn strokes(&self) -> &[StrokePath] {
        &self.strokes
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Points of the stroke being drawn, in scene space
    pub fn current_points(&self) -> &[Pos2] {
        &self.current
    }

    pub fn is_drawing(&self) -> bool {
        !self.current.is_empty()
    }

    pub fn begin_stroke(&mut self, pos: Pos2) {
        self.current.clear();
        self.current.push(pos);
    }

    pub fn extend_stroke(&mut self, pos: Pos2) {
        if self.current.last() != Some(&pos) && self.is_drawing() {
            self.current.push(pos);
        }
    }

    /// Finish the stroke in progress; returns whether one was captured
    pub fn end_stroke(&mut self) -> bool {
        let points = std::mem::take(&mut self.current);
        match StrokePath::from_points(&points, self.brush_size) {
            Some(path) => {
                self.strokes.push(path);
                true
            }
            None => false,
        }
    }

    /// Compute the erased pixels for `object` (the locked target).
    ///
    /// `Ok(None)` when no strokes were captured.
    pub fn render(&self, object: &DesignObject) -> EditorResult<Option<RgbaImage>> {
        let Some(image) = object.as_image() else {
            return Ok(None);
        };
        if self.strokes.is_empty() {
            return Ok(None);
        }
        let source = image.raster()?;
        let erased = erase_strokes(&source, &object.matrix(), object.transform.scale_x, &self.strokes)?;
        Ok(Some(erased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use image::Rgba;

    fn image_object() -> DesignObject {
        let raster = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let element = ImageElement::from_raster(raster).unwrap();
        factory::create_image(element, Pos2::new(50.0, 50.0), 1.0)
    }

    #[test]
    fn test_strokes_accumulate() {
        let object = image_object();
        let image = object.as_image().unwrap().clone();
        let mut session = EraseSession::new(object.id, image, LockFlags::default(), 4.0);
        session.begin_stroke(Pos2::new(45.0, 50.0));
        session.extend_stroke(Pos2::new(55.0, 50.0));
        assert!(session.end_stroke());
        assert!(!session.end_stroke());
        assert_eq!(session.stroke_count(), 1);
    }

    #[test]
    fn test_render_without_strokes_is_none() {
        let object = image_object();
        let image = object.as_image().unwrap().clone();
        let session = EraseSession::new(object.id, image, LockFlags::default(), 4.0);
        assert!(session.render(&object).unwrap().is_none());
    }
}
