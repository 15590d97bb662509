//! The interaction controller.
//!
//! `Editor` owns the scene and is the only thing that mutates it outside of
//! history replay. Every committed mutation goes through `commit`, which
//! records one snapshot.

mod assets;
mod erase;
mod interaction;
mod keyboard;
mod pointer;
mod style;

use std::sync::Arc;

use egui::{Pos2, Vec2};
use log::{debug, error, info, warn};

pub use assets::{ImageDecodeService, RasterDecoder};
pub use interaction::{DragState, InteractionState, TextEditing};

use crate::artboard::Artboard;
use crate::config::EditorConfig;
use crate::element::DesignObject;
use crate::eraser::EraseSession;
use crate::error::EditorResult;
use crate::event::{EditorEvent, EventBus, SceneEvent};
use crate::export::{DesignIntent, export_design};
use crate::fonts::{BuiltinFontService, FontLoader, FontService};
use crate::geometry;
use crate::history::{HistoryManager, SceneSnapshot, SnapshotCodec};
use crate::id_generator::ObjectId;
use crate::input::InputEvent;
use crate::scene::Scene;
use crate::selection::{CurrentStyle, Selection};
use crate::tools::ToolMode;
use crate::viewport::Viewport;

pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    history: HistoryManager,
    selection: Selection,
    style: CurrentStyle,
    tool: ToolMode,
    interaction: InteractionState,
    erase: Option<EraseSession>,
    eraser_size: f32,
    events: EventBus,
    fonts: FontLoader,
    decoder: Arc<dyn ImageDecodeService>,
    /// Size of the visible canvas in screen pixels; zero until the host reports it
    visible_size: Vec2,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("tool", &self.tool)
            .field("objects", &self.scene.len())
            .field("selection", &self.selection)
            .field("can_undo", &self.history.can_undo())
            .field("can_redo", &self.history.can_redo())
            .finish()
    }
}

impl Editor {
    /// Editor with the built-in font service and the `image` crate decoder
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        Self::with_services(config, Arc::new(BuiltinFontService), Arc::new(RasterDecoder))
    }

    pub fn with_services(
        config: EditorConfig,
        fonts: Arc<dyn FontService>,
        decoder: Arc<dyn ImageDecodeService>,
    ) -> EditorResult<Self> {
        let scene = Scene::new(Artboard::new(config.artboard_width, config.artboard_height));
        let baseline = SnapshotCodec::encode_scene(&scene)?;
        info!(
            "Editor ready: {}x{} artboard, history cap {}",
            config.artboard_width, config.artboard_height, config.history_cap
        );
        Ok(Self {
            history: HistoryManager::new(config.history_cap, baseline),
            eraser_size: config.eraser_default_size,
            scene,
            selection: Selection::new(),
            style: CurrentStyle::default(),
            tool: ToolMode::Select,
            interaction: InteractionState::default(),
            erase: None,
            events: EventBus::new(),
            fonts: FontLoader::new(fonts),
            decoder,
            visible_size: Vec2::ZERO,
            config,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn fonts(&self) -> &FontLoader {
        &self.fonts
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<ObjectId> {
        self.selection.ids().to_vec()
    }

    pub fn current_style(&self) -> &CurrentStyle {
        &self.style
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn erase_session(&self) -> Option<&EraseSession> {
        self.erase.as_ref()
    }

    pub fn eraser_size(&self) -> f32 {
        self.eraser_size
    }

    pub fn viewport(&self) -> &Viewport {
        self.scene.viewport()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        let zoom = self.config.clamp_zoom(viewport.zoom);
        self.scene.set_viewport(Viewport::new(zoom, viewport.pan));
        self.emit_view_changed();
    }

    pub fn set_pan_mode(&mut self, enabled: bool) {
        self.interaction.pan_mode = enabled;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Route one input event to the pointer or keyboard handlers
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown {
                pos,
                button,
                modifiers,
                time,
            } => self.pointer_down(pos, button, modifiers, time),
            InputEvent::PointerMove { pos, modifiers } => self.pointer_move(pos, modifiers),
            InputEvent::PointerUp { pos, button, .. } => self.pointer_up(pos, button),
            InputEvent::Scroll { pos, delta } => self.scroll(pos, delta),
            InputEvent::KeyDown { key, modifiers } => self.key_down(key, modifiers),
            InputEvent::KeyUp { key, .. } => self.key_up(key),
            InputEvent::Text(text) => self.text_input(&text),
        }
    }

    /// Record the current scene as one history entry.
    ///
    /// Ignored while a snapshot is being replayed.
    pub fn commit(&mut self, reason: &str) -> bool {
        if self.history.is_replaying() {
            return false;
        }
        let snapshot = match SnapshotCodec::encode_scene(&self.scene) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Could not snapshot scene after {}: {}", reason, e);
                return false;
            }
        };
        let recorded = self.history.record(snapshot);
        if recorded {
            debug!("Committed '{}' ({} undo entries)", reason, self.history.undo_len());
            self.emit_history_changed();
        }
        recorded
    }

    pub fn undo(&mut self) -> bool {
        self.end_transient_state();
        let fallback = self.centered_artboard();
        let scene = &mut self.scene;
        let result = self.history.undo(|json| restore_snapshot(scene, json, fallback));
        self.after_replay(result, "undo")
    }

    pub fn redo(&mut self) -> bool {
        self.end_transient_state();
        let fallback = self.centered_artboard();
        let scene = &mut self.scene;
        let result = self.history.redo(|json| restore_snapshot(scene, json, fallback));
        self.after_replay(result, "redo")
    }

    fn after_replay(&mut self, result: EditorResult<bool>, action: &str) -> bool {
        match result {
            Ok(true) => {
                self.recenter_artboard();
                self.resync_after_reload();
                self.events.emit(EditorEvent::SceneChanged(SceneEvent::Replayed));
                self.emit_history_changed();
                debug!("{} applied, {} objects", action, self.scene.len());
                true
            }
            Ok(false) => false,
            Err(e) => {
                error!("{} failed, scene left unchanged: {}", action, e);
                false
            }
        }
    }

    /// Drop in-progress gestures and sessions that refer to the old scene
    fn end_transient_state(&mut self) {
        if self.erase.is_some() {
            self.cancel_erase();
        }
        if self.interaction.text_editing.is_some() {
            self.end_text_editing();
        }
        self.interaction.drag = DragState::Idle;
        self.interaction.last_tap = None;
    }

    /// Object references must be re-acquired by id after the scene is rebuilt
    fn resync_after_reload(&mut self) {
        self.selection.retain_existing(&self.scene);
        self.events.emit(EditorEvent::SelectionChanged {
            ids: self.selection.ids().to_vec(),
        });
        self.sync_style();
    }

    pub fn add_object(&mut self, object: DesignObject) -> ObjectId {
        let id = self.scene.add_object(object);
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Added(id)));
        self.commit("add object");
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        if self.removal_blocked(id) {
            return false;
        }
        if self.scene.remove_object(id).is_none() {
            return false;
        }
        self.forget_object(id);
        self.commit("remove object");
        self.after_selection_change();
        true
    }

    /// Remove every selected object as one history entry
    pub fn remove_selected(&mut self) -> usize {
        let ids: Vec<_> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| !self.removal_blocked(*id))
            .collect();
        let removed = self.scene.remove_objects(&ids);
        if removed.is_empty() {
            return 0;
        }
        for object in &removed {
            self.forget_object(object.id);
        }
        self.commit("remove selection");
        self.after_selection_change();
        removed.len()
    }

    fn removal_blocked(&self, id: ObjectId) -> bool {
        self.erase.as_ref().is_some_and(|s| s.target() == id)
    }

    fn forget_object(&mut self, id: ObjectId) {
        if self.selection.contains(id) {
            self.selection.toggle(id);
        }
        if self.interaction.editing_text() == Some(id) {
            self.interaction.text_editing = None;
        }
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Removed(id)));
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        self.reorder(id, Scene::bring_to_front, "bring to front")
    }

    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        self.reorder(id, Scene::send_to_back, "send to back")
    }

    pub fn reorder_forward(&mut self, id: ObjectId) -> bool {
        self.reorder(id, Scene::reorder_forward, "bring forward")
    }

    pub fn reorder_backward(&mut self, id: ObjectId) -> bool {
        self.reorder(id, Scene::reorder_backward, "send backward")
    }

    fn reorder(&mut self, id: ObjectId, op: fn(&mut Scene, ObjectId) -> bool, reason: &str) -> bool {
        if !op(&mut self.scene, id) {
            return false;
        }
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Reordered(id)));
        self.commit(reason);
        true
    }

    pub fn set_tool(&mut self, tool: ToolMode) {
        if tool == self.tool {
            return;
        }
        if self.tool == ToolMode::Erase && self.erase.is_some() {
            self.cancel_erase();
        }
        if tool == ToolMode::Erase {
            self.begin_erase();
            return;
        }
        self.switch_tool(tool);
    }

    /// Change the tool without session side effects
    fn switch_tool(&mut self, tool: ToolMode) {
        if tool == self.tool {
            return;
        }
        let old = std::mem::replace(&mut self.tool, tool);
        self.interaction.drag = DragState::Idle;
        debug!("Tool {} -> {}", old.name(), tool.name());
        self.events.emit(EditorEvent::ToolChanged { old, new: tool });
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        let ids: Vec<_> = ids.into_iter().filter(|id| self.scene.contains(*id)).collect();
        self.selection.set(ids);
        self.after_selection_change();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.after_selection_change();
    }

    fn after_selection_change(&mut self) {
        self.events.emit(EditorEvent::SelectionChanged {
            ids: self.selection.ids().to_vec(),
        });
        self.sync_style();
    }

    /// Build the design-intent document
    pub fn export(&mut self) -> DesignIntent {
        export_design(&mut self.scene)
    }

    pub fn export_json(&mut self) -> EditorResult<String> {
        self.export().to_json()
    }

    /// Replace the scene with a saved design and start a fresh history from it
    pub fn load_design(&mut self, snapshot: SceneSnapshot) -> EditorResult<()> {
        self.end_transient_state();
        let fallback = self.centered_artboard();
        if SnapshotCodec::restore(&mut self.scene, snapshot, fallback) {
            debug!("Loaded design has no artboard, using a centred default");
        }
        self.recenter_artboard();
        for id in self.scene.ids() {
            geometry::clamp_to_artboard(&mut self.scene, id);
        }
        self.selection.clear();
        self.history.reset(SnapshotCodec::encode_scene(&self.scene)?);
        self.resync_after_reload();
        self.events.emit(EditorEvent::SceneChanged(SceneEvent::Loaded));
        self.emit_history_changed();
        info!("Loaded design with {} objects", self.scene.len());
        Ok(())
    }

    pub fn load_design_json(&mut self, json: &str) -> EditorResult<()> {
        let snapshot = SnapshotCodec::decode(json)?;
        self.load_design(snapshot)
    }

    /// The host reports the canvas size; the artboard is re-centred in it
    pub fn resize_viewport(&mut self, size: Vec2) {
        if size == self.visible_size {
            return;
        }
        self.visible_size = size;
        self.recenter_artboard();
    }

    pub fn visible_size(&self) -> Vec2 {
        self.visible_size
    }

    /// Scene-space rect currently visible on the canvas
    fn visible_scene_area(&self) -> Option<(Pos2, Vec2)> {
        if self.visible_size.x <= 0.0 || self.visible_size.y <= 0.0 {
            return None;
        }
        let viewport = self.scene.viewport();
        Some((
            viewport.screen_to_scene(Pos2::ZERO),
            self.visible_size / viewport.zoom,
        ))
    }

    fn recenter_artboard(&mut self) {
        let Some((min, size)) = self.visible_scene_area() else {
            return;
        };
        let top_left = self.scene.artboard().centered_top_left(min, size);
        self.scene.move_artboard(top_left);
    }

    /// A default artboard placed where `recenter_artboard` would put it
    fn centered_artboard(&self) -> Artboard {
        let mut artboard = Artboard::new(self.config.artboard_width, self.config.artboard_height);
        if let Some((min, size)) = self.visible_scene_area() {
            let top_left = artboard.centered_top_left(min, size);
            artboard.left = top_left.x;
            artboard.top = top_left.y;
        }
        artboard
    }

    fn emit_history_changed(&self) {
        self.events.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn emit_view_changed(&self) {
        let viewport = self.scene.viewport();
        self.events.emit(EditorEvent::ViewChanged {
            zoom: viewport.zoom,
            pan: viewport.pan,
        });
    }
}

fn restore_snapshot(scene: &mut Scene, json: &str, fallback: Artboard) -> EditorResult<()> {
    let snapshot = SnapshotCodec::decode(json)?;
    if SnapshotCodec::restore(scene, snapshot, fallback) {
        warn!("Snapshot had no artboard; rebuilt and re-centred it");
    }
    Ok(())
}
