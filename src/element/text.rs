use egui::Vec2;
use serde::{Deserialize, Serialize};

use super::Element;
use crate::util::Color;

/// Glyph advance as a fraction of the font size
const ADVANCE_EM: f32 = 0.6;
const ADVANCE_EM_BOLD: f32 = 0.65;
/// Line box height as a fraction of the font size, before line height
const LINE_BOX_EM: f32 = 1.13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Text element content and styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub text: String,
    pub fill: Color,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub line_height: f32,
    /// Extra spacing between characters, in 1/1000 em
    pub char_spacing: f32,
    pub text_background_color: Option<Color>,
}

impl TextElement {
    pub fn new(text: impl Into<String>, font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            fill: Color::BLACK,
            font_family: font_family.into(),
            font_size,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Center,
            line_height: 1.16,
            char_spacing: 0.0,
            text_background_color: None,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    fn advance(&self) -> f32 {
        let em = match self.font_weight {
            FontWeight::Normal => ADVANCE_EM,
            FontWeight::Bold => ADVANCE_EM_BOLD,
        };
        self.font_size * (em + self.char_spacing / 1000.0)
    }

    /// Width of a single line in unscaled units
    pub fn line_width(&self, line: &str) -> f32 {
        line.chars().count() as f32 * self.advance()
    }

    /// Height of one line box
    pub fn line_box(&self) -> f32 {
        self.font_size * LINE_BOX_EM
    }

    /// Approximate text block size.
    ///
    /// Every line but the last is spaced by the line height; an empty text
    /// still occupies one line so the object stays hit-testable.
    pub fn measure(&self) -> Vec2 {
        let width = self
            .lines()
            .map(|line| self.line_width(line))
            .fold(0.0_f32, f32::max)
            .max(self.font_size * 0.25);
        let line_count = self.lines().count().max(1) as f32;
        let height = self.line_box() * self.line_height * (line_count - 1.0) + self.line_box();
        Vec2::new(width, height)
    }
}

impl Element for TextElement {
    fn element_type(&self) -> &'static str {
        "text"
    }

    fn local_size(&self) -> Vec2 {
        self.measure()
    }
}
