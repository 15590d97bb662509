use crate::CottonBroApp;
use crate::element::{DesignObject, LockFlags, ObjectKind};
use crate::id_generator::ObjectId;
use crate::scene::StackEntry;
use crate::tools::ToolMode;

/// Row actions are collected first and applied once the list is drawn
enum LayerAction {
    Select(ObjectId),
    SetVisible(ObjectId, bool),
    SetLocked(ObjectId, LockFlags),
    Forward(ObjectId),
    Backward(ObjectId),
    ToFront(ObjectId),
    ToBack(ObjectId),
    Remove(ObjectId),
}

pub fn layers_panel(app: &mut CottonBroApp, ctx: &egui::Context) {
    if app.editor().tool() != ToolMode::Layers {
        return;
    }

    egui::SidePanel::right("layers_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Layers");
            ui.separator();

            let mut actions = Vec::new();
            let editor = app.editor();
            let scene = editor.scene();

            egui::ScrollArea::vertical().show(ui, |ui| {
                // Topmost first
                for entry in scene.stacking_order().into_iter().rev() {
                    match entry {
                        StackEntry::Artboard => {
                            ui.weak("Artboard");
                        }
                        StackEntry::Object(id) => {
                            if let Some(object) = scene.get(id) {
                                let selected = editor.selection().contains(id);
                                layer_row(ui, object, selected, &mut actions);
                            }
                        }
                    }
                }
            });

            for action in actions {
                let editor = app.editor_mut();
                match action {
                    LayerAction::Select(id) => editor.select([id]),
                    LayerAction::SetVisible(id, visible) => {
                        editor.set_visible(id, visible);
                    }
                    LayerAction::SetLocked(id, locks) => {
                        editor.set_locked(id, locks);
                    }
                    LayerAction::Forward(id) => {
                        editor.reorder_forward(id);
                    }
                    LayerAction::Backward(id) => {
                        editor.reorder_backward(id);
                    }
                    LayerAction::ToFront(id) => {
                        editor.bring_to_front(id);
                    }
                    LayerAction::ToBack(id) => {
                        editor.send_to_back(id);
                    }
                    LayerAction::Remove(id) => {
                        editor.remove_object(id);
                    }
                }
            }
        });
}

fn layer_row(ui: &mut egui::Ui, object: &DesignObject, selected: bool, actions: &mut Vec<LayerAction>) {
    let id = object.id;
    ui.horizontal(|ui| {
        let mut visible = object.flags.visible;
        if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
            actions.push(LayerAction::SetVisible(id, visible));
        }

        let locked = object.flags.locked.is_fully_locked();
        let lock_label = if locked { "🔒" } else { "🔓" };
        if ui.small_button(lock_label).on_hover_text("Lock").clicked() {
            let locks = if locked { LockFlags::default() } else { LockFlags::ALL };
            actions.push(LayerAction::SetLocked(id, locks));
        }

        if ui.selectable_label(selected, layer_name(object)).clicked() {
            actions.push(LayerAction::Select(id));
        }
    });
    ui.horizontal(|ui| {
        if ui.small_button("⏶").on_hover_text("Bring forward").clicked() {
            actions.push(LayerAction::Forward(id));
        }
        if ui.small_button("⏷").on_hover_text("Send backward").clicked() {
            actions.push(LayerAction::Backward(id));
        }
        if ui.small_button("⏫").on_hover_text("Bring to front").clicked() {
            actions.push(LayerAction::ToFront(id));
        }
        if ui.small_button("⏬").on_hover_text("Send to back").clicked() {
            actions.push(LayerAction::ToBack(id));
        }
        if ui.small_button("🗑").on_hover_text("Delete").clicked() {
            actions.push(LayerAction::Remove(id));
        }
    });
    ui.separator();
}

fn layer_name(object: &DesignObject) -> String {
    match &object.kind {
        ObjectKind::Text(text) => {
            let first_line = text.lines().next().unwrap_or_default();
            let mut name: String = first_line.chars().take(24).collect();
            if first_line.chars().count() > 24 {
                name.push('…');
            }
            format!("Text: {name}")
        }
        ObjectKind::Image(image) => {
            format!("Image {}×{}", image.natural_width(), image.natural_height())
        }
        ObjectKind::Shape(shape) => format!("Shape ({:?})", shape.shape),
    }
}
