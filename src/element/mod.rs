use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

mod common;
pub(crate) mod image;
pub(crate) mod shape;
pub(crate) mod text;

pub use common::{
    BlendMode, LockFlags, MIN_SCALE, ObjectFlags, ObjectTransform, OriginX, OriginY,
};
pub use self::image::{ImageElement, decode_data_uri, encode_png_data_uri};
pub use self::shape::{ShapeElement, ShapeKind};
pub use self::text::{FontStyle, FontWeight, TextAlign, TextElement};

use crate::geometry::transform::Matrix;
use crate::id_generator::ObjectId;
use crate::util::Color;

/// Common trait implemented by every element variant
pub trait Element {
    /// Get the element type as a string
    fn element_type(&self) -> &'static str;

    /// Unscaled, unrotated size of the element's content box
    fn local_size(&self) -> Vec2;
}

/// Enumeration of all element variants a design object can carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
}

impl Element for ObjectKind {
    fn element_type(&self) -> &'static str {
        match self {
            ObjectKind::Text(t) => t.element_type(),
            ObjectKind::Image(i) => i.element_type(),
            ObjectKind::Shape(s) => s.element_type(),
        }
    }

    fn local_size(&self) -> Vec2 {
        match self {
            ObjectKind::Text(t) => t.local_size(),
            ObjectKind::Image(i) => i.local_size(),
            ObjectKind::Shape(s) => s.local_size(),
        }
    }
}

/// A placeable, stylable object on the artboard.
///
/// The artboard is deliberately not a `DesignObject`; it lives on the scene
/// so it can never be removed, reordered or exported as content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignObject {
    pub id: ObjectId,
    #[serde(flatten)]
    pub transform: ObjectTransform,
    pub opacity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(flatten)]
    pub flags: ObjectFlags,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl DesignObject {
    /// Create an object with an unassigned id; the scene assigns one on insert
    pub fn new(kind: ObjectKind, transform: ObjectTransform) -> Self {
        Self {
            id: ObjectId::UNASSIGNED,
            transform,
            opacity: 1.0,
            blend_mode: None,
            flags: ObjectFlags::default(),
            kind,
        }
    }

    pub fn element_type(&self) -> &'static str {
        self.kind.element_type()
    }

    pub fn local_size(&self) -> Vec2 {
        self.kind.local_size()
    }

    /// Axis-aligned bounding rect in scene units
    pub fn bounding_rect(&self) -> Rect {
        self.transform.bounding_rect(self.local_size())
    }

    pub fn center(&self) -> Pos2 {
        self.transform.center(self.local_size())
    }

    pub fn set_center(&mut self, center: Pos2) {
        let size = self.local_size();
        self.transform.set_center(center, size);
    }

    /// Full transform from centre-relative local units to scene space
    pub fn matrix(&self) -> Matrix {
        self.transform.matrix(self.local_size())
    }

    pub fn corners(&self) -> [Pos2; 4] {
        self.transform.corners(self.local_size())
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        self.flags.visible && self.transform.contains(self.local_size(), pos)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.transform.translate(delta);
    }

    /// Flat fill colour, for variants that have one
    pub fn fill(&self) -> Option<Color> {
        match &self.kind {
            ObjectKind::Text(t) => Some(t.fill),
            ObjectKind::Shape(s) => Some(s.fill),
            ObjectKind::Image(_) => None,
        }
    }

    pub fn set_fill(&mut self, fill: Color) -> bool {
        match &mut self.kind {
            ObjectKind::Text(t) => t.fill = fill,
            ObjectKind::Shape(s) => s.fill = fill,
            ObjectKind::Image(_) => return false,
        }
        true
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.kind {
            ObjectKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match &mut self.kind {
            ObjectKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match &self.kind {
            ObjectKind::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageElement> {
        match &mut self.kind {
            ObjectKind::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ObjectKind::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image(_))
    }
}

/// Factory functions for creating design objects
pub mod factory {
    use super::*;

    /// Create a text object centred on `center`
    pub fn create_text(
        text: impl Into<String>,
        font_family: impl Into<String>,
        font_size: f32,
        center: Pos2,
    ) -> DesignObject {
        DesignObject::new(
            ObjectKind::Text(TextElement::new(text, font_family, font_size)),
            ObjectTransform::centered_at(center),
        )
    }

    /// Create an image object centred on `center`, drawn at `scale`
    pub fn create_image(image: ImageElement, center: Pos2, scale: f32) -> DesignObject {
        let mut transform = ObjectTransform::centered_at(center);
        transform.scale_x = scale;
        transform.scale_y = scale;
        DesignObject::new(ObjectKind::Image(image), transform)
    }

    /// Create a shape object centred on `center`
    pub fn create_shape(shape: ShapeKind, size: Vec2, fill: Color, center: Pos2) -> DesignObject {
        DesignObject::new(
            ObjectKind::Shape(ShapeElement::new(shape, size.x, size.y, fill)),
            ObjectTransform::centered_at(center),
        )
    }
}
