use cottonbro_editor::element::{ImageElement, ShapeKind, factory};
use cottonbro_editor::util::Color;
use cottonbro_editor::{Editor, EditorConfig, Viewport};
use egui::{pos2, vec2};
use image::{Rgba, RgbaImage};
use serde_json::Value;

fn populated_editor() -> Editor {
    let mut editor = Editor::new(EditorConfig::default()).unwrap();
    editor.add_text(pos2(250.0, 250.0));
    editor.add_object(factory::create_shape(
        ShapeKind::Ellipse,
        vec2(60.0, 30.0),
        Color::rgb(200, 10, 10),
        pos2(80.0, 400.0),
    ));
    let image = ImageElement::from_raster(RgbaImage::from_pixel(20, 10, Rgba([0, 0, 255, 255]))).unwrap();
    editor.add_object(factory::create_image(image, pos2(400.0, 100.0), 2.0));
    editor
}

fn export_value(editor: &mut Editor) -> Value {
    serde_json::from_str(&editor.export_json().unwrap()).unwrap()
}

#[test]
fn test_export_is_independent_of_view() {
    let mut editor = populated_editor();
    let plain = editor.export_json().unwrap();

    editor.set_viewport(Viewport::new(2.5, vec2(137.0, -42.0)));
    let zoomed = editor.export_json().unwrap();

    assert_eq!(plain, zoomed);
    // The view itself is left as the user set it
    assert_eq!(editor.viewport().zoom, 2.5);
    assert_eq!(editor.viewport().pan, vec2(137.0, -42.0));
}

#[test]
fn test_document_shape() {
    let mut editor = populated_editor();
    let doc = export_value(&mut editor);

    assert_eq!(doc["version"], 1);
    assert_eq!(doc["artboard"]["width"], 500.0);
    assert_eq!(doc["artboard"]["height"], 500.0);
    assert!(doc["design"].get("artboard").is_none());
    assert_eq!(doc["design"]["objects"].as_array().unwrap().len(), 3);

    let normalized = doc["normalized"].as_array().unwrap();
    let types: Vec<&str> = normalized.iter().map(|o| o["type"].as_str().unwrap()).collect();
    assert_eq!(types, ["text", "shape", "image"]);
}

#[test]
fn test_text_entry_is_artboard_relative() {
    let mut editor = Editor::new(EditorConfig::default()).unwrap();
    let id = editor.add_text(pos2(250.0, 250.0));
    // Move the artboard away from the scene origin; geometry stays artboard-relative
    editor.resize_viewport(vec2(1500.0, 1000.0));
    assert_eq!(editor.scene().artboard().left, 500.0);
    let doc = export_value(&mut editor);

    let text = &doc["normalized"][0];
    assert_eq!(text["id"], serde_json::to_value(id).unwrap());
    let bbox = &text["boundingBox"];
    let left = bbox["left"].as_f64().unwrap();
    let width = bbox["width"].as_f64().unwrap();
    assert!((left - 149.2).abs() < 1e-2);
    assert!((width - 201.6).abs() < 1e-2);
    let origin_left = text["transform"]["originLeft"].as_f64().unwrap();
    assert!((origin_left - 250.0).abs() < 1e-3);
    assert_eq!(text["style"]["text"], "Heading");
    assert_eq!(text["style"]["fontFamily"], "Ubuntu");
    assert_eq!(text["style"]["fontSize"], 48.0);
    assert!(text["style"].get("src").is_none());
}

#[test]
fn test_image_entry_carries_src_and_blend_mode() {
    let mut editor = populated_editor();
    let doc = export_value(&mut editor);
    let image = &doc["normalized"][2];

    let src = image["style"]["src"].as_str().unwrap();
    assert!(src.starts_with("data:image/png;base64,"));
    assert_eq!(image["transform"]["src"], image["style"]["src"]);
    assert_eq!(image["style"]["blendMode"], "source-over");
    assert_eq!(image["transform"]["scaleX"], 2.0);
    assert_eq!(image["boundingBox"]["width"], 40.0);
}

#[test]
fn test_hidden_and_excluded_objects_are_left_out() {
    let mut editor = populated_editor();
    let ids = editor.scene().ids();
    editor.set_visible(ids[0], false);
    editor.set_excluded_from_export(ids[1], true);

    let doc = export_value(&mut editor);
    assert_eq!(doc["design"]["objects"].as_array().unwrap().len(), 1);
    let normalized = doc["normalized"].as_array().unwrap();
    assert_eq!(normalized.len(), 1);
    assert_eq!(normalized[0]["type"], "image");
}

fn normalized_box(doc: &Value, index: usize) -> [f64; 4] {
    let bbox = &doc["normalized"][index]["boundingBox"];
    ["left", "top", "width", "height"].map(|key| bbox[key].as_f64().unwrap())
}

#[test]
fn test_design_reloads_into_a_differently_sized_canvas() {
    let mut source = Editor::new(EditorConfig::default()).unwrap();
    source.resize_viewport(vec2(1500.0, 1000.0));
    assert_eq!(source.scene().artboard().left, 500.0);
    assert_eq!(source.scene().artboard().top, 250.0);
    source.add_object(factory::create_shape(
        ShapeKind::Rect,
        vec2(40.0, 40.0),
        Color::rgb(10, 200, 10),
        pos2(750.0, 500.0),
    ));
    let exported = source.export();
    let before = export_value(&mut source);
    assert_eq!(normalized_box(&before, 0), [230.0, 230.0, 40.0, 40.0]);

    let mut target = Editor::new(EditorConfig::default()).unwrap();
    target.resize_viewport(vec2(800.0, 600.0));
    target.load_design(exported.design).unwrap();
    assert_eq!(target.scene().artboard().left, 150.0);
    assert_eq!(target.scene().artboard().top, 50.0);

    let object = &target.scene().objects()[0];
    assert!(target.scene().artboard().rect().contains_rect(object.bounding_rect()));
    let after = export_value(&mut target);
    for (a, b) in normalized_box(&before, 0).iter().zip(normalized_box(&after, 0)) {
        assert!((a - b).abs() < 1e-3, "{a} vs {b}");
    }
}

#[test]
fn test_off_artboard_design_is_clamped_on_load() {
    let mut source = Editor::new(EditorConfig::default()).unwrap();
    source.add_object(factory::create_shape(
        ShapeKind::Rect,
        vec2(40.0, 40.0),
        Color::rgb(10, 200, 10),
        pos2(250.0, 250.0),
    ));
    let mut design = source.export().design;
    design.objects[0].translate(vec2(900.0, 0.0));

    let mut target = Editor::new(EditorConfig::default()).unwrap();
    target.load_design(design).unwrap();
    let rect = target.scene().objects()[0].bounding_rect();
    assert!((rect.max.x - 500.0).abs() < 1e-3);
    assert!((rect.min.y - 230.0).abs() < 1e-3);
}
