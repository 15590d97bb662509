use log::debug;

use super::Editor;
use crate::element::{BlendMode, DesignObject, FontStyle, FontWeight, LockFlags, TextAlign, TextElement};
use crate::event::{EditorEvent, SceneEvent};
use crate::geometry;
use crate::id_generator::ObjectId;
use crate::selection::CurrentStyle;
use crate::util::Color;

impl Editor {
    /// Mirror the active object's style; emits only when it changed
    pub(crate) fn sync_style(&mut self) {
        let style = CurrentStyle::mirror(&self.scene, &self.selection);
        if style != self.style {
            self.style = style.clone();
            self.events.emit(EditorEvent::StyleChanged(style));
        }
    }

    /// Apply `f` to every selected object; commits once if anything changed
    fn update_selected(&mut self, reason: &str, f: impl FnMut(&mut DesignObject) -> bool) -> bool {
        let ids = self.selection.ids().to_vec();
        self.update_objects(&ids, reason, f)
    }

    fn update_objects(
        &mut self,
        ids: &[ObjectId],
        reason: &str,
        mut f: impl FnMut(&mut DesignObject) -> bool,
    ) -> bool {
        let mut changed = Vec::new();
        for id in ids {
            if let Some(object) = self.scene.get_mut(*id) {
                if f(object) {
                    changed.push(*id);
                }
            }
        }
        if changed.is_empty() {
            debug!("{}: nothing to change", reason);
            return false;
        }
        for id in &changed {
            geometry::clamp_to_artboard(&mut self.scene, *id);
            self.events.emit(EditorEvent::SceneChanged(SceneEvent::Modified(*id)));
        }
        self.commit(reason);
        self.sync_style();
        true
    }

    fn update_selected_text(&mut self, reason: &str, mut f: impl FnMut(&mut TextElement) -> bool) -> bool {
        self.update_selected(reason, |object| object.as_text_mut().is_some_and(&mut f))
    }

    pub fn set_fill(&mut self, fill: Color) -> bool {
        self.update_selected("fill", |o| o.fill() != Some(fill) && o.set_fill(fill))
    }

    pub fn set_font_size(&mut self, size: f32) -> bool {
        if size <= 0.0 {
            return false;
        }
        self.update_selected_text("font size", |t| replace(&mut t.font_size, size))
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) -> bool {
        self.update_selected_text("font weight", |t| replace(&mut t.font_weight, weight))
    }

    pub fn set_font_style(&mut self, style: FontStyle) -> bool {
        self.update_selected_text("font style", |t| replace(&mut t.font_style, style))
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> bool {
        self.update_selected_text("text align", |t| replace(&mut t.text_align, align))
    }

    pub fn set_line_height(&mut self, line_height: f32) -> bool {
        self.update_selected_text("line height", |t| replace(&mut t.line_height, line_height))
    }

    pub fn set_char_spacing(&mut self, spacing: f32) -> bool {
        self.update_selected_text("char spacing", |t| replace(&mut t.char_spacing, spacing))
    }

    pub fn set_text_background(&mut self, color: Option<Color>) -> bool {
        self.update_selected_text("text background", |t| replace(&mut t.text_background_color, color))
    }

    /// Replace the content of a text object
    pub fn set_text(&mut self, id: ObjectId, text: &str) -> bool {
        let Some(element) = self.scene.get_mut(id).and_then(|o| o.as_text_mut()) else {
            return false;
        };
        if element.text == text {
            return false;
        }
        element.text = text.to_owned();
        geometry::clamp_to_artboard(&mut self.scene, id);
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Modified(id)));
        self.commit("text");
        true
    }

    pub fn set_opacity(&mut self, opacity: f32) -> bool {
        let opacity = opacity.clamp(0.0, 1.0);
        self.update_selected("opacity", |o| replace(&mut o.opacity, opacity))
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) -> bool {
        self.update_selected("blend mode", |o| replace(&mut o.blend_mode, Some(mode)))
    }

    pub fn toggle_flip_x(&mut self) -> bool {
        self.update_selected("flip x", |o| {
            o.transform.flip_x = !o.transform.flip_x;
            true
        })
    }

    pub fn toggle_flip_y(&mut self) -> bool {
        self.update_selected("flip y", |o| {
            o.transform.flip_y = !o.transform.flip_y;
            true
        })
    }

    /// Rotate the selection to `angle` degrees about each object's centre
    pub fn set_angle(&mut self, angle: f32) -> bool {
        let angle = angle.rem_euclid(360.0);
        self.update_selected("angle", |o| {
            if o.flags.locked.rotation || o.transform.angle == angle {
                return false;
            }
            let center = o.center();
            o.transform.angle = angle;
            o.set_center(center);
            true
        })
    }

    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> bool {
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        if !replace(&mut object.flags.visible, visible) {
            return false;
        }
        if !visible && self.selection.contains(id) {
            self.selection.toggle(id);
            self.after_selection_change();
        }
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Modified(id)));
        self.commit("visibility");
        true
    }

    pub fn set_locked(&mut self, id: ObjectId, locks: LockFlags) -> bool {
        if self.erase.as_ref().is_some_and(|s| s.target() == id) {
            return false;
        }
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        if !replace(&mut object.flags.locked, locks) {
            return false;
        }
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Modified(id)));
        self.commit("lock");
        true
    }

    pub fn set_excluded_from_export(&mut self, id: ObjectId, excluded: bool) -> bool {
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        if !replace(&mut object.flags.excluded_from_export, excluded) {
            return false;
        }
        self.commit("export flag");
        true
    }

    /// Artboard colour control; `None` makes it transparent
    pub fn set_artboard_fill(&mut self, fill: Option<Color>) -> bool {
        if self.scene.artboard().fill == fill {
            return false;
        }
        self.scene.set_artboard_fill(fill);
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::ArtboardChanged));
        self.commit("artboard fill");
        true
    }

    /// Set the font family of selected text once the font is available.
    ///
    /// A font that fails to load is applied anyway; the renderer falls back.
    pub async fn set_font_family(&mut self, family: &str) -> bool {
        let loaded = self.fonts.load(family).await;
        if !loaded {
            debug!("Applying '{}' without a confirmed font", family);
        }
        self.apply_font_family(family)
    }

    pub fn apply_font_family(&mut self, family: &str) -> bool {
        let ids = self.selection.ids().to_vec();
        self.apply_font_family_to(&ids, family)
    }

    /// Set the font family of the text objects among `ids`, whatever is
    /// selected now. Missing ids are skipped.
    pub fn apply_font_family_to(&mut self, ids: &[ObjectId], family: &str) -> bool {
        self.update_objects(ids, "font family", |object| {
            object
                .as_text_mut()
                .is_some_and(|t| replace(&mut t.font_family, family.to_owned()))
        })
    }
}

/// Store `value` in `slot`, reporting whether it differed
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
