use egui::Vec2;

use crate::id_generator::ObjectId;
use crate::selection::CurrentStyle;
use crate::tools::ToolMode;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolChanged {
        old: ToolMode,
        new: ToolMode,
    },
    SelectionChanged {
        ids: Vec<ObjectId>,
    },
    /// The mirrored style of the active object changed
    StyleChanged(CurrentStyle),
    SceneChanged(SceneEvent),
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
    ViewChanged {
        zoom: f32,
        pan: Vec2,
    },
    TextEditing(TextEditingEvent),
    Erase(EraseEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Added(ObjectId),
    Removed(ObjectId),
    Reordered(ObjectId),
    Modified(ObjectId),
    ArtboardChanged,
    /// The scene was rebuilt from a snapshot; object references must be
    /// re-acquired by id
    Replayed,
    Loaded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextEditingEvent {
    Started(ObjectId),
    Ended { id: ObjectId, changed: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EraseEvent {
    Started(ObjectId),
    StrokeCaptured { id: ObjectId, strokes: usize },
    Applied(ObjectId),
    Cancelled(ObjectId),
}
