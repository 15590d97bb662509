use cottonbro_editor::element::{ShapeKind, factory};
use cottonbro_editor::input::InputEvent;
use cottonbro_editor::scene::StackEntry;
use cottonbro_editor::util::Color;
use cottonbro_editor::{Editor, EditorConfig, ObjectId, ToolMode, Viewport};
use egui::{Key, Modifiers, PointerButton, Pos2, pos2, vec2};

fn editor() -> Editor {
    Editor::new(EditorConfig::default()).unwrap()
}

fn add_box(editor: &mut Editor, x: f32, y: f32) -> ObjectId {
    editor.add_object(factory::create_shape(ShapeKind::Rect, vec2(40.0, 40.0), Color::BLACK, pos2(x, y)))
}

fn press(editor: &mut Editor, pos: Pos2, time: f64) {
    editor.handle_input(InputEvent::PointerDown {
        pos,
        button: PointerButton::Primary,
        modifiers: Modifiers::NONE,
        time,
    });
}

fn release(editor: &mut Editor, pos: Pos2) {
    editor.handle_input(InputEvent::PointerUp {
        pos,
        button: PointerButton::Primary,
        modifiers: Modifiers::NONE,
    });
}

fn drag(editor: &mut Editor, path: &[Pos2], modifiers: Modifiers) {
    let (first, rest) = path.split_first().unwrap();
    editor.handle_input(InputEvent::PointerDown {
        pos: *first,
        button: PointerButton::Primary,
        modifiers,
        time: 0.0,
    });
    for pos in rest {
        editor.handle_input(InputEvent::PointerMove { pos: *pos, modifiers });
    }
    editor.handle_input(InputEvent::PointerUp {
        pos: *path.last().unwrap(),
        button: PointerButton::Primary,
        modifiers,
    });
}

fn key(editor: &mut Editor, key: Key, modifiers: Modifiers) {
    editor.handle_input(InputEvent::KeyDown { key, modifiers });
}

fn order(editor: &Editor) -> Vec<StackEntry> {
    editor.scene().stacking_order()
}

#[test]
fn test_send_to_back_stays_above_artboard() {
    let mut editor = editor();
    let a = add_box(&mut editor, 100.0, 100.0);
    let b = add_box(&mut editor, 200.0, 100.0);
    let c = add_box(&mut editor, 300.0, 100.0);

    assert!(editor.send_to_back(c));
    assert_eq!(
        order(&editor),
        [StackEntry::Artboard, StackEntry::Object(c), StackEntry::Object(a), StackEntry::Object(b)]
    );
    assert!(!editor.reorder_backward(c));
    assert!(!editor.send_to_back(c));

    assert!(editor.undo());
    assert_eq!(
        order(&editor),
        [StackEntry::Artboard, StackEntry::Object(a), StackEntry::Object(b), StackEntry::Object(c)]
    );
}

#[test]
fn test_forward_and_front() {
    let mut editor = editor();
    let a = add_box(&mut editor, 100.0, 100.0);
    let b = add_box(&mut editor, 200.0, 100.0);
    let c = add_box(&mut editor, 300.0, 100.0);

    assert!(editor.reorder_forward(a));
    assert_eq!(editor.scene().ids(), vec![b, a, c]);
    assert!(editor.bring_to_front(a));
    assert_eq!(editor.scene().ids(), vec![b, c, a]);
    assert!(!editor.reorder_forward(a));
}

#[test]
fn test_text_tool_places_then_nudges() {
    let mut editor = editor();
    editor.set_tool(ToolMode::Text);
    press(&mut editor, pos2(250.0, 250.0), 0.0);
    release(&mut editor, pos2(250.0, 250.0));

    assert_eq!(editor.tool(), ToolMode::Select);
    assert_eq!(editor.scene().len(), 1);
    let id = editor.selected_ids()[0];
    assert!(editor.scene().get(id).unwrap().is_text());

    key(&mut editor, Key::ArrowRight, Modifiers::NONE);
    assert_eq!(editor.scene().get(id).unwrap().transform.left, 251.0);
    key(&mut editor, Key::ArrowRight, Modifiers::SHIFT);
    assert_eq!(editor.scene().get(id).unwrap().transform.left, 261.0);
}

#[test]
fn test_double_tap_edits_text() {
    let mut editor = editor();
    let id = editor.add_text(pos2(250.0, 250.0));
    let undo_before = editor.history().undo_len();

    press(&mut editor, pos2(250.0, 250.0), 1.0);
    release(&mut editor, pos2(250.0, 250.0));
    assert!(!editor.is_text_editing());
    press(&mut editor, pos2(250.0, 250.0), 1.2);
    release(&mut editor, pos2(250.0, 250.0));
    assert_eq!(editor.interaction().editing_text(), Some(id));

    editor.handle_input(InputEvent::Text("!".to_owned()));
    key(&mut editor, Key::Escape, Modifiers::NONE);

    assert!(!editor.is_text_editing());
    assert_eq!(editor.scene().get(id).unwrap().as_text().unwrap().text, "Heading!");
    assert_eq!(editor.history().undo_len(), undo_before + 1);
}

#[test]
fn test_slow_taps_do_not_edit() {
    let mut editor = editor();
    editor.add_text(pos2(250.0, 250.0));

    press(&mut editor, pos2(250.0, 250.0), 1.0);
    release(&mut editor, pos2(250.0, 250.0));
    press(&mut editor, pos2(250.0, 250.0), 2.0);
    release(&mut editor, pos2(250.0, 250.0));
    assert!(!editor.is_text_editing());
}

#[test]
fn test_marquee_selects_intersecting_objects() {
    let mut editor = editor();
    let a = add_box(&mut editor, 100.0, 100.0);
    let b = add_box(&mut editor, 150.0, 150.0);
    add_box(&mut editor, 400.0, 400.0);

    press(&mut editor, pos2(10.0, 10.0), 0.0);
    editor.handle_input(InputEvent::PointerMove {
        pos: pos2(200.0, 200.0),
        modifiers: Modifiers::NONE,
    });
    assert!(editor.interaction().marquee_rect().is_some());
    release(&mut editor, pos2(200.0, 200.0));

    assert_eq!(editor.selected_ids(), vec![a, b]);
    assert!(editor.interaction().marquee_rect().is_none());
}

#[test]
fn test_delete_key_removes_selection_in_one_step() {
    let mut editor = editor();
    let a = add_box(&mut editor, 100.0, 100.0);
    let b = add_box(&mut editor, 200.0, 200.0);
    editor.select([a, b]);
    let undo_before = editor.history().undo_len();

    key(&mut editor, Key::Delete, Modifiers::NONE);
    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().undo_len(), undo_before + 1);

    editor.undo();
    assert_eq!(editor.scene().len(), 2);
}

#[test]
fn test_scroll_zoom_is_clamped_around_pointer() {
    let mut editor = editor();
    editor.set_viewport(Viewport::new(1.0, vec2(30.0, -20.0)));
    let anchor = pos2(320.0, 180.0);
    let under_pointer = editor.viewport().screen_to_scene(anchor);

    editor.handle_input(InputEvent::Scroll { pos: anchor, delta: -200.0 });
    let zoom = editor.viewport().zoom;
    assert!(zoom > 1.0 && zoom < 5.0);
    assert!((editor.viewport().screen_to_scene(anchor) - under_pointer).length() < 1e-3);

    editor.handle_input(InputEvent::Scroll { pos: anchor, delta: -100_000.0 });
    assert_eq!(editor.viewport().zoom, 5.0);
    assert!((editor.viewport().screen_to_scene(anchor) - under_pointer).length() < 1e-3);

    editor.handle_input(InputEvent::Scroll { pos: anchor, delta: 100_000.0 });
    assert_eq!(editor.viewport().zoom, 0.1);
    assert!((editor.viewport().screen_to_scene(anchor) - under_pointer).length() < 1e-2);
}

#[test]
fn test_undo_and_redo_shortcuts() {
    let mut editor = editor();
    let id = add_box(&mut editor, 100.0, 100.0);
    editor.select([id]);
    key(&mut editor, Key::ArrowRight, Modifiers::NONE);
    let left = |editor: &Editor| editor.scene().get(id).unwrap().transform.left;
    assert_eq!(left(&editor), 101.0);

    key(&mut editor, Key::Z, Modifiers::CTRL);
    assert_eq!(left(&editor), 100.0);
    assert!(editor.can_redo());

    let ctrl_shift = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };
    key(&mut editor, Key::Z, ctrl_shift);
    assert_eq!(left(&editor), 101.0);
    assert!(!editor.can_redo());

    // Cmd on macOS
    let cmd = Modifiers {
        mac_cmd: true,
        command: true,
        ..Modifiers::NONE
    };
    key(&mut editor, Key::Z, cmd);
    assert_eq!(left(&editor), 100.0);
    key(&mut editor, Key::Z, Modifiers { shift: true, ..cmd });
    assert_eq!(left(&editor), 101.0);

    // Plain Z does nothing
    key(&mut editor, Key::Z, Modifiers::NONE);
    assert_eq!(left(&editor), 101.0);
}

#[test]
fn test_space_drag_pans_without_moving_objects() {
    let mut editor = editor();
    let id = add_box(&mut editor, 100.0, 100.0);
    let before = editor.scene().get(id).unwrap().bounding_rect();
    let undo_before = editor.history().undo_len();

    key(&mut editor, Key::Space, Modifiers::NONE);
    // Starts on top of the box: still a pan
    drag(&mut editor, &[pos2(100.0, 100.0), pos2(130.0, 110.0), pos2(160.0, 130.0)], Modifiers::NONE);
    editor.handle_input(InputEvent::KeyUp {
        key: Key::Space,
        modifiers: Modifiers::NONE,
    });

    assert_eq!(editor.viewport().pan, vec2(60.0, 30.0));
    assert_eq!(editor.scene().get(id).unwrap().bounding_rect(), before);
    assert_eq!(editor.history().undo_len(), undo_before);

    // Released: the same drag on empty canvas is a marquee again
    drag(&mut editor, &[pos2(400.0, 400.0), pos2(450.0, 450.0)], Modifiers::NONE);
    assert_eq!(editor.viewport().pan, vec2(60.0, 30.0));
}

#[test]
fn test_alt_drag_pans_without_moving_objects() {
    let mut editor = editor();
    let id = add_box(&mut editor, 100.0, 100.0);
    editor.select([id]);
    let before = editor.scene().get(id).unwrap().bounding_rect();
    let undo_before = editor.history().undo_len();

    drag(&mut editor, &[pos2(100.0, 100.0), pos2(60.0, 140.0)], Modifiers::ALT);

    assert_eq!(editor.viewport().pan, vec2(-40.0, 40.0));
    assert_eq!(editor.scene().get(id).unwrap().bounding_rect(), before);
    assert_eq!(editor.history().undo_len(), undo_before);
}

#[test]
fn test_delete_keys_edit_text_while_editing() {
    let mut editor = editor();
    let id = editor.add_text(pos2(250.0, 250.0));
    assert!(editor.start_text_editing(id));
    let undo_before = editor.history().undo_len();

    key(&mut editor, Key::Backspace, Modifiers::NONE);
    key(&mut editor, Key::Delete, Modifiers::NONE);
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.scene().get(id).unwrap().as_text().unwrap().text, "Headin");
    assert!(editor.is_text_editing());

    key(&mut editor, Key::Escape, Modifiers::NONE);
    assert!(!editor.is_text_editing());
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.history().undo_len(), undo_before + 1);
}

#[test]
fn test_corner_drag_scales_once_and_stays_on_artboard() {
    let mut editor = editor();
    let id = editor.add_object(factory::create_shape(
        ShapeKind::Rect,
        vec2(100.0, 100.0),
        Color::BLACK,
        pos2(200.0, 200.0),
    ));
    editor.select([id]);
    let undo_before = editor.history().undo_len();

    // Bottom-right handle; the top-left corner is the anchor
    drag(&mut editor, &[pos2(250.0, 250.0), pos2(300.0, 300.0), pos2(540.0, 520.0)], Modifiers::NONE);

    let rect = editor.scene().get(id).unwrap().bounding_rect();
    assert!((rect.width() - 390.0).abs() < 1e-3);
    assert!((rect.height() - 390.0).abs() < 1e-3);
    assert!(rect.max.x <= 500.0 + 1e-3 && rect.max.y <= 500.0 + 1e-3);
    assert!(rect.min.x >= 0.0 && rect.min.y >= 0.0);
    assert_eq!(editor.history().undo_len(), undo_before + 1);

    assert!(editor.undo());
    let rect = editor.scene().get(id).unwrap().bounding_rect();
    assert!((rect.min - pos2(150.0, 150.0)).length() < 1e-3);
    assert!((rect.width() - 100.0).abs() < 1e-3);
}

#[test]
fn test_rotate_drag_commits_once_and_stays_on_artboard() {
    let mut editor = editor();
    let id = editor.add_object(factory::create_shape(
        ShapeKind::Rect,
        vec2(400.0, 40.0),
        Color::BLACK,
        pos2(250.0, 480.0),
    ));
    editor.select([id]);
    let undo_before = editor.history().undo_len();

    // The handle sits 30px above the top edge; drag a quarter turn clockwise
    drag(&mut editor, &[pos2(250.0, 430.0), pos2(300.0, 440.0), pos2(350.0, 480.0)], Modifiers::NONE);

    let object = editor.scene().get(id).unwrap();
    assert!((object.transform.angle - 90.0).abs() < 1e-3);
    let rect = object.bounding_rect();
    assert!((rect.height() - 400.0).abs() < 1e-2);
    assert!(rect.max.y <= 500.0 + 1e-3);
    assert!(rect.min.y >= -1e-3);
    assert_eq!(editor.history().undo_len(), undo_before + 1);

    assert!(editor.undo());
    assert_eq!(editor.scene().get(id).unwrap().transform.angle, 0.0);
}

#[test]
fn test_handle_click_without_drag_commits_nothing() {
    let mut editor = editor();
    let id = editor.add_object(factory::create_shape(
        ShapeKind::Rect,
        vec2(100.0, 100.0),
        Color::BLACK,
        pos2(200.0, 200.0),
    ));
    editor.select([id]);
    let undo_before = editor.history().undo_len();

    drag(&mut editor, &[pos2(250.0, 250.0)], Modifiers::NONE);
    drag(&mut editor, &[pos2(200.0, 120.0)], Modifiers::NONE);
    assert_eq!(editor.history().undo_len(), undo_before);
}
