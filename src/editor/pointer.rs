use egui::{Modifiers, PointerButton, Pos2, Vec2};
use log::debug;

use super::{DragState, Editor};
use crate::element::MIN_SCALE;
use crate::event::{EditorEvent, EraseEvent, SceneEvent};
use crate::geometry::{self, transform::rotate_vec};
use crate::id_generator::ObjectId;
use crate::tools::ToolMode;
use crate::widgets::Corner;
use crate::widgets::resize_handle::{self, TransformHandle};

/// Marquee drags shorter than this (screen pixels) count as a click
const MARQUEE_MIN_DRAG: f32 = 3.0;

impl Editor {
    pub(super) fn pointer_down(&mut self, pos: Pos2, button: PointerButton, modifiers: Modifiers, time: f64) {
        self.interaction.pointer = Some(pos);

        if button == PointerButton::Middle
            || (button == PointerButton::Primary && self.interaction.pans(&modifiers))
        {
            self.interaction.drag = DragState::Pan { last: pos };
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        let scene_pos = self.scene.viewport().screen_to_scene(pos);
        match self.tool {
            ToolMode::Erase => {
                if let Some(session) = self.erase.as_mut() {
                    session.begin_stroke(scene_pos);
                    self.interaction.drag = DragState::Erase;
                }
            }
            ToolMode::Text => {
                self.place_text(scene_pos);
            }
            ToolMode::Select | ToolMode::Uploads | ToolMode::Layers => {
                self.select_down(pos, scene_pos, modifiers, time);
            }
        }
    }

    /// Click-to-place: a default text object centred on the click, then back
    /// to the select tool
    fn place_text(&mut self, scene_pos: Pos2) -> ObjectId {
        let id = self.add_text(scene_pos);
        self.switch_tool(ToolMode::Select);
        id
    }

    fn select_down(&mut self, screen: Pos2, scene_pos: Pos2, modifiers: Modifiers, time: f64) {
        if let Some(handle) = self.handle_under(screen) {
            self.begin_handle_drag(handle, modifiers);
            return;
        }

        let hit = self.scene.object_at(scene_pos);
        if let Some(editing) = self.interaction.editing_text() {
            if hit != Some(editing) {
                self.end_text_editing();
            }
        }

        let Some(id) = hit else {
            self.interaction.last_tap = None;
            if !modifiers.shift {
                self.clear_selection();
            }
            self.interaction.drag = DragState::Marquee {
                start: scene_pos,
                current: scene_pos,
                additive: modifiers.shift,
            };
            return;
        };

        if modifiers.shift {
            self.selection.toggle(id);
            self.after_selection_change();
            return;
        }

        if !self.selection.contains(id) {
            self.selection.select_only(id);
            self.after_selection_change();
        }

        let is_text = self.scene.get(id).is_some_and(|o| o.is_text());
        if self.interaction.register_tap(id, time, self.config.double_tap_secs) && is_text {
            self.start_text_editing(id);
            return;
        }
        if self.interaction.editing_text() == Some(id) {
            return;
        }

        let ids = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| {
                self.scene
                    .get(*id)
                    .is_some_and(|o| !(o.flags.locked.movement_x && o.flags.locked.movement_y))
            })
            .collect();
        self.interaction.drag = DragState::Move {
            ids,
            last: scene_pos,
            moved: false,
        };
    }

    /// Transform handle of the single selected object under a screen point
    fn handle_under(&self, screen: Pos2) -> Option<TransformHandle> {
        if self.selection.len() != 1 {
            return None;
        }
        let object = self.scene.get(self.selection.active()?)?;
        resize_handle::handle_at(object, self.scene.viewport(), screen, self.config.handle_radius)
    }

    fn begin_handle_drag(&mut self, handle: TransformHandle, modifiers: Modifiers) {
        let Some(id) = self.selection.active() else {
            return;
        };
        let Some(object) = self.scene.get(id) else {
            return;
        };
        self.interaction.drag = match handle {
            TransformHandle::Scale(corner) => DragState::Scale {
                id,
                corner,
                anchor: object.corners()[corner.opposite().index()],
                uniform: !modifiers.shift,
                moved: false,
            },
            TransformHandle::Rotate => {
                let center = object.center();
                let pointer = self
                    .interaction
                    .pointer
                    .map(|p| self.scene.viewport().screen_to_scene(p))
                    .unwrap_or(center);
                DragState::Rotate {
                    id,
                    center,
                    pointer_start: angle_of(pointer - center),
                    angle_start: object.transform.angle,
                    moved: false,
                }
            }
        };
    }

    pub(super) fn pointer_move(&mut self, pos: Pos2, _modifiers: Modifiers) {
        self.interaction.pointer = Some(pos);
        let scene_pos = self.scene.viewport().screen_to_scene(pos);

        match &mut self.interaction.drag {
            DragState::Idle => {}
            DragState::Pan { last } => {
                let delta = pos - *last;
                *last = pos;
                self.scene.viewport_mut().pan_by(delta);
                self.emit_view_changed();
            }
            DragState::Move { ids, last, moved } => {
                let delta = scene_pos - *last;
                *last = scene_pos;
                if delta == Vec2::ZERO {
                    return;
                }
                *moved = true;
                let ids = ids.clone();
                self.move_objects(&ids, delta);
            }
            DragState::Scale {
                id,
                corner,
                anchor,
                uniform,
                moved,
            } => {
                *moved = true;
                let (id, corner, anchor, uniform) = (*id, *corner, *anchor, *uniform);
                self.scale_to(id, corner, anchor, scene_pos, uniform);
            }
            DragState::Rotate {
                id,
                center,
                pointer_start,
                angle_start,
                moved,
            } => {
                *moved = true;
                let angle = *angle_start + angle_of(scene_pos - *center) - *pointer_start;
                let (id, center) = (*id, *center);
                self.rotate_to(id, center, angle);
            }
            DragState::Marquee { current, .. } => {
                *current = scene_pos;
            }
            DragState::Erase => {
                if let Some(session) = self.erase.as_mut() {
                    session.extend_stroke(scene_pos);
                }
            }
        }
    }

    pub(super) fn pointer_up(&mut self, pos: Pos2, button: PointerButton) {
        self.interaction.pointer = Some(pos);
        if button != PointerButton::Primary && button != PointerButton::Middle {
            return;
        }

        match std::mem::take(&mut self.interaction.drag) {
            DragState::Idle | DragState::Pan { .. } => {}
            DragState::Move { ids, moved, .. } => {
                if moved {
                    for id in &ids {
                        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Modified(*id)));
                    }
                    self.commit("move");
                }
            }
            DragState::Scale { id, moved, .. } => {
                if moved {
                    self.events.emit(EditorEvent::SceneChanged(SceneEvent::Modified(id)));
                    self.commit("scale");
                }
            }
            DragState::Rotate { id, moved, .. } => {
                if moved {
                    self.events.emit(EditorEvent::SceneChanged(SceneEvent::Modified(id)));
                    self.commit("rotate");
                }
            }
            DragState::Marquee {
                start,
                current,
                additive,
            } => self.finish_marquee(start, current, additive),
            DragState::Erase => {
                if let Some(session) = self.erase.as_mut() {
                    if session.end_stroke() {
                        let event = EraseEvent::StrokeCaptured {
                            id: session.target(),
                            strokes: session.stroke_count(),
                        };
                        self.events.emit(EditorEvent::Erase(event));
                    }
                }
            }
        }
    }

    /// Scroll-wheel zoom around the pointer
    pub(super) fn scroll(&mut self, pos: Pos2, delta: f32) {
        let current = self.scene.viewport().zoom;
        let zoom = self.config.clamp_zoom(current * self.config.scroll_zoom_base.powf(delta));
        if zoom == current {
            return;
        }
        self.scene.viewport_mut().zoom_at(pos, zoom);
        self.emit_view_changed();
    }

    /// Translate `ids` honouring per-axis movement locks, then clamp them to
    /// the artboard as one group
    pub(crate) fn move_objects(&mut self, ids: &[ObjectId], delta: Vec2) {
        for id in ids {
            if let Some(object) = self.scene.get_mut(*id) {
                let locks = object.flags.locked;
                let step = Vec2::new(
                    if locks.movement_x { 0.0 } else { delta.x },
                    if locks.movement_y { 0.0 } else { delta.y },
                );
                object.translate(step);
            }
        }
        geometry::clamp_group_to_artboard(&mut self.scene, ids);
    }

    /// Scale so the dragged corner follows `pointer` while `anchor` stays put
    fn scale_to(&mut self, id: ObjectId, corner: Corner, anchor: Pos2, pointer: Pos2, uniform: bool) {
        let Some(object) = self.scene.get_mut(id) else {
            return;
        };
        let size = object.local_size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let t = &mut object.transform;
        let sign = corner.sign();
        let local = rotate_vec(pointer - anchor, -t.angle);
        let mut sx = (local.x * sign.x / size.x).max(MIN_SCALE);
        let mut sy = (local.y * sign.y / size.y).max(MIN_SCALE);
        if uniform {
            let k = (sx / t.scale_x).max(sy / t.scale_y);
            sx = (t.scale_x * k).max(MIN_SCALE);
            sy = (t.scale_y * k).max(MIN_SCALE);
        }
        t.scale_x = sx;
        t.scale_y = sy;
        let half = Vec2::new(size.x * sx * sign.x, size.y * sy * sign.y) / 2.0;
        let center = anchor + rotate_vec(half, t.angle);
        object.set_center(center);
        geometry::clamp_to_artboard(&mut self.scene, id);
    }

    pub(crate) fn rotate_to(&mut self, id: ObjectId, center: Pos2, angle: f32) {
        let Some(object) = self.scene.get_mut(id) else {
            return;
        };
        object.transform.angle = angle.rem_euclid(360.0);
        object.set_center(center);
        geometry::clamp_to_artboard(&mut self.scene, id);
    }

    fn finish_marquee(&mut self, start: Pos2, current: Pos2, additive: bool) {
        let drag = (current - start).length() * self.scene.viewport().zoom;
        if drag < MARQUEE_MIN_DRAG {
            return;
        }
        let rect = egui::Rect::from_two_pos(start, current);
        let hits = self.scene.objects_in_rect(rect);
        debug!("Marquee selected {} objects", hits.len());
        if additive {
            let mut ids = self.selection.ids().to_vec();
            ids.extend(hits);
            self.selection.set(ids);
        } else {
            self.selection.set(hits);
        }
        self.after_selection_change();
    }
}

/// Clockwise angle of a screen-space vector, in degrees
fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}
