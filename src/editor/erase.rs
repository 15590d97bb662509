use log::{debug, warn};

use super::{DragState, Editor};
use crate::element::LockFlags;
use crate::eraser::EraseSession;
use crate::error::EditorResult;
use crate::event::{EditorEvent, EraseEvent};
use crate::tools::ToolMode;

impl Editor {
    /// Start erasing on the selected image.
    ///
    /// Requires exactly one selected image object; otherwise nothing happens
    /// and the current tool is kept.
    pub fn begin_erase(&mut self) -> bool {
        if self.erase.is_some() {
            return true;
        }
        let target = match self.selection.ids() {
            [only] => *only,
            _ => {
                debug!("Erase needs exactly one selected object");
                return false;
            }
        };
        let brush = self.eraser_size;
        let Some(object) = self.scene.get_mut(target) else {
            return false;
        };
        let Some(image) = object.as_image() else {
            debug!("Erase needs an image, {} is {}", target, object.element_type());
            return false;
        };

        let session = EraseSession::new(target, image.clone(), object.flags.locked, brush);
        object.flags.locked = LockFlags::ALL;
        self.erase = Some(session);
        self.interaction.drag = DragState::Idle;
        self.switch_tool(ToolMode::Erase);
        self.events.emit(EditorEvent::Erase(EraseEvent::Started(target)));
        true
    }

    /// Brush diameter in scene units, clamped to the configured range. Drawn
    /// scaled by the current zoom.
    pub fn set_eraser_size(&mut self, size: f32) {
        self.eraser_size = self.config.clamp_eraser_size(size);
        if let Some(session) = self.erase.as_mut() {
            session.set_brush_size(self.eraser_size);
        }
    }

    /// Burn the captured strokes into the image, commit one snapshot and
    /// return to the select tool.
    ///
    /// With no strokes this only ends the session. On a decode or encode
    /// failure the image is left untouched and the session still ends.
    pub fn apply_erase(&mut self) -> EditorResult<bool> {
        let Some(mut session) = self.erase.take() else {
            return Ok(false);
        };
        if session.is_drawing() {
            session.end_stroke();
        }
        let target = session.target();

        let rendered = match self.scene.get(target) {
            Some(object) => session.render(object),
            None => Ok(None),
        };
        let applied = match rendered {
            Ok(Some(pixels)) => match self.scene.get_mut(target).and_then(|o| o.as_image_mut()) {
                Some(image) => image.replace_raster(pixels).map(|_| true),
                None => Ok(false),
            },
            Ok(None) => Ok(false),
            Err(e) => Err(e),
        };

        self.finish_erase(&session);
        match applied {
            Ok(true) => {
                self.commit("erase");
                self.events.emit(EditorEvent::Erase(EraseEvent::Applied(target)));
                Ok(true)
            }
            Ok(false) => {
                debug!("Erase applied with no strokes");
                self.events.emit(EditorEvent::Erase(EraseEvent::Cancelled(target)));
                Ok(false)
            }
            Err(e) => {
                warn!("Erase on {} failed, image unchanged: {}", target, e);
                self.events.emit(EditorEvent::Erase(EraseEvent::Cancelled(target)));
                Err(e)
            }
        }
    }

    /// Abandon the session, restoring the image's original source. No
    /// snapshot is created.
    pub fn cancel_erase(&mut self) -> bool {
        let Some(session) = self.erase.take() else {
            return false;
        };
        let target = session.target();
        if let Some(image) = self.scene.get_mut(target).and_then(|o| o.as_image_mut()) {
            *image = session.original().clone();
        }
        self.finish_erase(&session);
        self.events.emit(EditorEvent::Erase(EraseEvent::Cancelled(target)));
        true
    }

    /// Unlock the target, reselect it and go back to the select tool
    fn finish_erase(&mut self, session: &EraseSession) {
        let target = session.target();
        if let Some(object) = self.scene.get_mut(target) {
            object.flags.locked = session.previous_locks();
            self.selection.select_only(target);
        }
        self.interaction.drag = DragState::Idle;
        self.switch_tool(ToolMode::Select);
        self.after_selection_change();
    }
}
