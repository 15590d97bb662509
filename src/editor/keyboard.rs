use egui::{Key, Modifiers, Vec2};
use log::debug;

use super::{Editor, TextEditing};
use crate::event::{EditorEvent, SceneEvent, TextEditingEvent};
use crate::geometry;
use crate::id_generator::ObjectId;

impl Editor {
    pub(super) fn key_down(&mut self, key: Key, modifiers: Modifiers) {
        let command = modifiers.command || modifiers.ctrl;

        if self.interaction.text_editing.is_some() {
            self.edit_text_key(key);
            return;
        }

        match key {
            Key::Space => self.interaction.space_held = true,
            Key::Z if command && modifiers.shift => {
                self.redo();
            }
            Key::Z if command => {
                self.undo();
            }
            Key::Delete | Key::Backspace => {
                if self.erase.is_none() {
                    self.remove_selected();
                }
            }
            Key::Escape => {
                if self.erase.is_some() {
                    self.cancel_erase();
                } else {
                    self.clear_selection();
                }
            }
            Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown => {
                let step = if modifiers.shift {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                let direction = match key {
                    Key::ArrowLeft => Vec2::new(-1.0, 0.0),
                    Key::ArrowRight => Vec2::new(1.0, 0.0),
                    Key::ArrowUp => Vec2::new(0.0, -1.0),
                    _ => Vec2::new(0.0, 1.0),
                };
                self.nudge(direction * step);
            }
            _ => {}
        }
    }

    pub(super) fn key_up(&mut self, key: Key) {
        if key == Key::Space {
            self.interaction.space_held = false;
        }
    }

    pub(super) fn text_input(&mut self, text: &str) {
        let Some(id) = self.interaction.editing_text() else {
            return;
        };
        let typed: String = text.chars().filter(|c| !c.is_control()).collect();
        if typed.is_empty() {
            return;
        }
        if let Some(element) = self.scene.get_mut(id).and_then(|o| o.as_text_mut()) {
            element.text.push_str(&typed);
        }
    }

    fn edit_text_key(&mut self, key: Key) {
        let Some(id) = self.interaction.editing_text() else {
            return;
        };
        match key {
            Key::Escape => {
                self.end_text_editing();
            }
            Key::Backspace => {
                if let Some(element) = self.scene.get_mut(id).and_then(|o| o.as_text_mut()) {
                    element.text.pop();
                }
            }
            Key::Enter => {
                if let Some(element) = self.scene.get_mut(id).and_then(|o| o.as_text_mut()) {
                    element.text.push('\n');
                }
            }
            _ => {}
        }
    }

    /// Move the active object by `delta`, clamp it and commit. No-op when
    /// nothing is selected or movement is locked on both axes.
    pub fn nudge(&mut self, delta: Vec2) -> bool {
        let Some(id) = self.selection.active() else {
            return false;
        };
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        let locks = object.flags.locked;
        let step = Vec2::new(
            if locks.movement_x { 0.0 } else { delta.x },
            if locks.movement_y { 0.0 } else { delta.y },
        );
        if step == Vec2::ZERO {
            return false;
        }
        object.translate(step);
        geometry::clamp_to_artboard(&mut self.scene, id);
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Modified(id)));
        self.commit("nudge");
        true
    }

    /// Enter live editing on a text object
    pub fn start_text_editing(&mut self, id: ObjectId) -> bool {
        let Some(text) = self.scene.get(id).and_then(|o| o.as_text()) else {
            return false;
        };
        if self.interaction.editing_text() == Some(id) {
            return true;
        }
        let original = text.text.clone();
        self.end_text_editing();
        self.interaction.text_editing = Some(TextEditing { id, original });
        self.interaction.drag = super::DragState::Idle;
        debug!("Editing text {}", id);
        self.events.emit(EditorEvent::TextEditing(TextEditingEvent::Started(id)));
        true
    }

    /// Leave live editing, committing once if the content changed
    pub fn end_text_editing(&mut self) -> bool {
        let Some(editing) = self.interaction.text_editing.take() else {
            return false;
        };
        let changed = self
            .scene
            .get(editing.id)
            .and_then(|o| o.as_text())
            .is_some_and(|t| t.text != editing.original);
        if changed {
            geometry::clamp_to_artboard(&mut self.scene, editing.id);
            self.commit("edit text");
        }
        self.events.emit(EditorEvent::TextEditing(TextEditingEvent::Ended {
            id: editing.id,
            changed,
        }));
        changed
    }

    pub fn is_text_editing(&self) -> bool {
        self.interaction.text_editing.is_some()
    }
}
