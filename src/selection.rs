use serde::{Deserialize, Serialize};

use crate::element::{BlendMode, DesignObject, FontStyle, FontWeight, TextAlign};
use crate::id_generator::ObjectId;
use crate::scene::Scene;
use crate::util::Color;

/// The ordered set of selected objects; the first one is the active object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ObjectId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn active(&self) -> Option<ObjectId> {
        self.ids.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn select_only(&mut self, id: ObjectId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add `id` if absent, remove it if present
    pub fn toggle(&mut self, id: ObjectId) {
        if let Some(index) = self.ids.iter().position(|i| *i == id) {
            self.ids.remove(index);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Re-acquire the selection against a scene, dropping ids that no longer
    /// exist. Returns whether anything was dropped.
    pub fn retain_existing(&mut self, scene: &Scene) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| scene.contains(*id));
        self.ids.len() != before
    }
}

/// Style attributes of the active object, mirrored for property panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStyle {
    pub fill: Option<Color>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f32>,
    pub char_spacing: Option<f32>,
    pub text_background_color: Option<Color>,
    pub opacity: f32,
    pub blend_mode: BlendMode,
}

impl Default for CurrentStyle {
    fn default() -> Self {
        Self {
            fill: None,
            font_family: None,
            font_size: None,
            font_weight: None,
            font_style: None,
            text_align: None,
            line_height: None,
            char_spacing: None,
            text_background_color: None,
            opacity: 1.0,
            blend_mode: BlendMode::SourceOver,
        }
    }
}

impl CurrentStyle {
    pub fn from_object(object: &DesignObject) -> Self {
        let text = object.as_text();
        Self {
            fill: object.fill(),
            font_family: text.map(|t| t.font_family.clone()),
            font_size: text.map(|t| t.font_size),
            font_weight: text.map(|t| t.font_weight),
            font_style: text.map(|t| t.font_style),
            text_align: text.map(|t| t.text_align),
            line_height: text.map(|t| t.line_height),
            char_spacing: text.map(|t| t.char_spacing),
            text_background_color: text.and_then(|t| t.text_background_color),
            opacity: object.opacity,
            blend_mode: object.blend_mode.unwrap_or_default(),
        }
    }

    /// Style of the active object in `selection`, or the default when nothing
    /// is selected
    pub fn mirror(scene: &Scene, selection: &Selection) -> Self {
        selection
            .active()
            .and_then(|id| scene.get(id))
            .map(Self::from_object)
            .unwrap_or_default()
    }
}
