use egui::Vec2;
use serde::{Deserialize, Serialize};

use super::Element;
use crate::util::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rect,
    Ellipse,
}

/// Vector primitive filled with a flat colour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub shape: ShapeKind,
    pub width: f32,
    pub height: f32,
    pub fill: Color,
}

impl ShapeElement {
    pub fn new(shape: ShapeKind, width: f32, height: f32, fill: Color) -> Self {
        Self {
            shape,
            width,
            height,
            fill,
        }
    }
}

impl Element for ShapeElement {
    fn element_type(&self) -> &'static str {
        "shape"
    }

    fn local_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}
