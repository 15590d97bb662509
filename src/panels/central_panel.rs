use crate::CottonBroApp;
use crate::editor::DragState;

pub fn central_panel(app: &mut CottonBroApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            let (editor, renderer, input) = app.parts_mut();
            editor.resize_viewport(canvas_rect.size());

            // Text fields in the side panels keep their keystrokes
            let keyboard_focus = !ctx.wants_keyboard_input();
            for event in input.process_input(ctx, canvas_rect, keyboard_focus) {
                editor.handle_input(event);
            }

            renderer.render(ctx, &painter, canvas_rect, editor);

            let interaction = editor.interaction();
            if matches!(interaction.drag, DragState::Pan { .. }) {
                ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
            } else if interaction.space_held || interaction.pan_mode {
                ctx.set_cursor_icon(egui::CursorIcon::Grab);
            }
        });
}
