use egui::{Modifiers, Pos2, Rect};

use crate::id_generator::ObjectId;
use crate::widgets::Corner;

/// What the primary pointer is currently doing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Dragging the view; `last` is in screen space
    Pan { last: Pos2 },
    /// Moving the selection; `last` is in scene space
    Move {
        ids: Vec<ObjectId>,
        last: Pos2,
        moved: bool,
    },
    /// Corner scaling; `anchor` is the fixed opposite corner in scene space
    Scale {
        id: ObjectId,
        corner: Corner,
        anchor: Pos2,
        uniform: bool,
        moved: bool,
    },
    Rotate {
        id: ObjectId,
        center: Pos2,
        pointer_start: f32,
        angle_start: f32,
        moved: bool,
    },
    /// Rubber-band selection, both points in scene space
    Marquee {
        start: Pos2,
        current: Pos2,
        additive: bool,
    },
    /// Drawing an eraser stroke
    Erase,
}

/// Live text editing of one text object
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditing {
    pub id: ObjectId,
    /// Content when editing started, to decide whether to commit
    pub original: String,
}

/// Transient pointer and keyboard state of the controller
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    pub drag: DragState,
    /// Space bar is held down
    pub space_held: bool,
    /// Explicit pan toggle from the toolbar
    pub pan_mode: bool,
    /// Last pointer position in screen space
    pub pointer: Option<Pos2>,
    /// Last primary tap on an object, for double-tap detection
    pub last_tap: Option<(ObjectId, f64)>,
    pub text_editing: Option<TextEditing>,
}

impl InteractionState {
    /// Whether a press with `modifiers` should pan instead of select
    pub fn pans(&self, modifiers: &Modifiers) -> bool {
        self.space_held || self.pan_mode || modifiers.alt || modifiers.mac_cmd
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// The marquee rectangle in scene space, while one is being dragged
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.drag {
            DragState::Marquee { start, current, .. } => Some(Rect::from_two_pos(start, current)),
            _ => None,
        }
    }

    pub fn editing_text(&self) -> Option<ObjectId> {
        self.text_editing.as_ref().map(|e| e.id)
    }

    /// A tap on `id` at `time` completes a double tap within `window` seconds
    pub fn register_tap(&mut self, id: ObjectId, time: f64, window: f64) -> bool {
        match self.last_tap {
            Some((last, at)) if last == id && time - at <= window && time >= at => {
                self.last_tap = None;
                true
            }
            _ => {
                self.last_tap = Some((id, time));
                false
            }
        }
    }
}
