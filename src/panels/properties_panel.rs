use egui::Color32;

use crate::CottonBroApp;
use crate::element::{BlendMode, FontStyle, FontWeight, TextAlign};
use crate::util::Color;

/// Families offered in the font picker
const FONT_FAMILIES: [&str; 6] = ["Ubuntu", "Roboto", "Lato", "Montserrat", "Playfair Display", "Lobster"];

pub fn properties_panel(app: &mut CottonBroApp, ctx: &egui::Context) {
    egui::SidePanel::right("properties_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Properties");
            ui.separator();

            artboard_section(app, ui);
            ui.separator();

            if app.editor().selection().is_empty() {
                ui.weak("Nothing selected");
                return;
            }
            object_section(app, ui);
            if app.editor().current_style().font_family.is_some() {
                ui.separator();
                text_section(app, ui);
            }
        });
}

fn artboard_section(app: &mut CottonBroApp, ui: &mut egui::Ui) {
    ui.label("Artboard");
    let fill = app.editor().scene().artboard().fill;
    ui.horizontal(|ui| {
        let mut transparent = fill.is_none();
        if ui.checkbox(&mut transparent, "Transparent").changed() {
            let new_fill = if transparent { None } else { Some(Color::WHITE) };
            app.editor_mut().set_artboard_fill(new_fill);
        }
        if let Some(fill) = fill {
            if let Some(color) = color_button(ui, fill) {
                app.editor_mut().set_artboard_fill(Some(color));
            }
        }
    });
}

fn object_section(app: &mut CottonBroApp, ui: &mut egui::Ui) {
    let style = app.editor().current_style().clone();

    if let Some(fill) = style.fill {
        ui.horizontal(|ui| {
            ui.label("Fill");
            if let Some(color) = color_button(ui, fill) {
                app.editor_mut().set_fill(color);
            }
        });
    }

    let mut opacity = style.opacity;
    let response = ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"));
    if response.changed() {
        app.editor_mut().set_opacity(opacity);
    }

    let mut blend = style.blend_mode;
    egui::ComboBox::from_label("Blend")
        .selected_text(blend.label())
        .show_ui(ui, |ui| {
            for mode in BlendMode::ALL {
                ui.selectable_value(&mut blend, mode, mode.label());
            }
        });
    if blend != style.blend_mode {
        app.editor_mut().set_blend_mode(blend);
    }

    ui.horizontal(|ui| {
        if ui.button("Flip ↔").clicked() {
            app.editor_mut().toggle_flip_x();
        }
        if ui.button("Flip ↕").clicked() {
            app.editor_mut().toggle_flip_y();
        }
    });

    let active = app.editor().selection().active();
    let object = active.and_then(|id| app.editor().scene().get(id));
    if let Some(object) = object {
        let id = object.id;
        let mut angle = object.transform.angle;
        let mut excluded = object.flags.excluded_from_export;
        let angle_response = ui.add(egui::DragValue::new(&mut angle).range(0.0..=359.0).suffix("°").prefix("Angle "));
        if angle_response.changed() {
            app.editor_mut().set_angle(angle);
        }
        if ui.checkbox(&mut excluded, "Exclude from export").changed() {
            app.editor_mut().set_excluded_from_export(id, excluded);
        }
    }
}

fn text_section(app: &mut CottonBroApp, ui: &mut egui::Ui) {
    let style = app.editor().current_style().clone();
    ui.label("Text");

    let family = app
        .pending_font()
        .map(str::to_owned)
        .or(style.font_family.clone())
        .unwrap_or_default();
    let mut chosen = family.clone();
    egui::ComboBox::from_label("Font")
        .selected_text(family.as_str())
        .show_ui(ui, |ui| {
            for candidate in FONT_FAMILIES {
                ui.selectable_value(&mut chosen, candidate.to_owned(), candidate);
            }
        });
    if chosen != family {
        app.request_font_family(&chosen);
    }
    if app.pending_font().is_some() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading font…");
        });
    }

    if let Some(size) = style.font_size {
        let mut size = size;
        let response = ui.add(egui::DragValue::new(&mut size).range(4.0..=400.0).prefix("Size "));
        if response.changed() {
            app.editor_mut().set_font_size(size);
        }
    }

    ui.horizontal(|ui| {
        let mut bold = style.font_weight == Some(FontWeight::Bold);
        if ui.toggle_value(&mut bold, "B").changed() {
            let weight = if bold { FontWeight::Bold } else { FontWeight::Normal };
            app.editor_mut().set_font_weight(weight);
        }
        let mut italic = style.font_style == Some(FontStyle::Italic);
        if ui.toggle_value(&mut italic, "I").changed() {
            let font_style = if italic { FontStyle::Italic } else { FontStyle::Normal };
            app.editor_mut().set_font_style(font_style);
        }
        for (align, label) in [(TextAlign::Left, "⬅"), (TextAlign::Center, "↔"), (TextAlign::Right, "➡")] {
            if ui.selectable_label(style.text_align == Some(align), label).clicked() {
                app.editor_mut().set_text_align(align);
            }
        }
    });

    if let Some(line_height) = style.line_height {
        let mut line_height = line_height;
        let response = ui.add(egui::Slider::new(&mut line_height, 0.5..=3.0).text("Line height"));
        if response.changed() {
            app.editor_mut().set_line_height(line_height);
        }
    }
    if let Some(spacing) = style.char_spacing {
        let mut spacing = spacing;
        let response = ui.add(egui::Slider::new(&mut spacing, -200.0..=800.0).text("Spacing"));
        if response.changed() {
            app.editor_mut().set_char_spacing(spacing);
        }
    }

    ui.horizontal(|ui| {
        let background = style.text_background_color;
        let mut enabled = background.is_some();
        if ui.checkbox(&mut enabled, "Background").changed() {
            let color = if enabled { Some(Color::WHITE) } else { None };
            app.editor_mut().set_text_background(color);
        }
        if let Some(background) = background {
            if let Some(color) = color_button(ui, background) {
                app.editor_mut().set_text_background(Some(color));
            }
        }
    });
}

/// Colour picker button; returns the new colour once the user changed it
fn color_button(ui: &mut egui::Ui, color: Color) -> Option<Color> {
    let mut edited: Color32 = color.to_color32();
    let response = egui::color_picker::color_edit_button_srgba(ui, &mut edited, egui::color_picker::Alpha::OnlyBlend);
    (response.changed() && edited != color.to_color32()).then(|| Color::from_color32(edited))
}
