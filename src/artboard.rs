use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::util::Color;

/// The fixed-size printable region.
///
/// Its size in design units never changes during a session; only its
/// position moves when the viewport is resized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artboard {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// `None` renders as a dashed outline placeholder instead of a fill
    pub fill: Option<Color>,
}

impl Artboard {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
            fill: Some(Color::WHITE),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.top_left(), self.size())
    }

    pub fn top_left(&self) -> Pos2 {
        Pos2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn is_transparent(&self) -> bool {
        self.fill.is_none()
    }

    /// Top-left position that centres the artboard in a visible area of
    /// `visible` scene units starting at `visible_min`
    pub fn centered_top_left(&self, visible_min: Pos2, visible: Vec2) -> Pos2 {
        visible_min + (visible - self.size()) / 2.0
    }
}

/// View-time clip region; objects are clipped to it when drawn but their
/// data is never truncated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipBoundary {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ClipBoundary {
    pub fn from_artboard(artboard: &Artboard) -> Self {
        Self {
            left: artboard.left,
            top: artboard.top,
            width: artboard.width,
            height: artboard.height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.left, self.top), Vec2::new(self.width, self.height))
    }
}
