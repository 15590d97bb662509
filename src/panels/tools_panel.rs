use crate::CottonBroApp;
use crate::components::ToolButton;
use crate::tools::ToolMode;
use crate::viewport::Viewport;

pub fn tools_panel(app: &mut CottonBroApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.editor().tool();
            ui.horizontal_wrapped(|ui| {
                for tool in ToolMode::ALL {
                    if ToolButton::new(tool, tool == active).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.editor_mut().set_tool(tool);
                    }
                }
            });
            ui.separator();

            match app.editor().tool() {
                ToolMode::Erase => eraser_options(app, ui),
                ToolMode::Uploads => {
                    ui.label("Drop image files onto the window to add them to the design.");
                }
                ToolMode::Text => {
                    ui.label("Click on the canvas to place a text box.");
                }
                ToolMode::Select | ToolMode::Layers => {}
            }
            if app.editor().tool() == ToolMode::Select
                && ui
                    .add_enabled(selected_image(app), egui::Button::new("Erase image…"))
                    .clicked()
            {
                app.editor_mut().set_tool(ToolMode::Erase);
            }
            ui.separator();

            ui.horizontal(|ui| {
                let can_undo = app.editor().can_undo();
                let can_redo = app.editor().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.editor_mut().undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.editor_mut().redo();
                }
            });

            let history = app.editor().history();
            ui.label(format!(
                "History: {} undo / {} redo",
                history.undo_len(),
                history.redo_len()
            ));
            ui.separator();

            let mut pan_mode = app.editor().interaction().pan_mode;
            if ui.checkbox(&mut pan_mode, "Pan mode").changed() {
                app.editor_mut().set_pan_mode(pan_mode);
            }
            let zoom = app.editor().viewport().zoom;
            ui.horizontal(|ui| {
                ui.label(format!("Zoom {:.0}%", zoom * 100.0));
                if ui.button("Reset view").clicked() {
                    app.editor_mut().set_viewport(Viewport::IDENTITY);
                }
            });
            ui.separator();

            if ui.button("Export design").clicked() {
                app.export_design();
            }
            if let Some(status) = app.status() {
                ui.colored_label(egui::Color32::from_rgb(200, 80, 60), status);
            }
        });
}

fn eraser_options(app: &mut CottonBroApp, ui: &mut egui::Ui) {
    let config = app.editor().config();
    let range = config.eraser_min_size..=config.eraser_max_size;
    let mut size = app.editor().eraser_size();
    if ui.add(egui::Slider::new(&mut size, range).text("Brush")).changed() {
        app.editor_mut().set_eraser_size(size);
    }

    let strokes = app.editor().erase_session().map_or(0, |s| s.stroke_count());
    ui.label(format!("{} strokes", strokes));
    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            if let Err(e) = app.editor_mut().apply_erase() {
                app.set_status(format!("Erase failed: {e}"));
            }
        }
        if ui.button("Cancel").clicked() {
            app.editor_mut().cancel_erase();
        }
    });
}

fn selected_image(app: &CottonBroApp) -> bool {
    let editor = app.editor();
    match editor.selection().ids() {
        [only] => editor.scene().get(*only).is_some_and(|o| o.is_image()),
        _ => false,
    }
}
