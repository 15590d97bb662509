use cottonbro_editor::element::{ShapeKind, factory};
use cottonbro_editor::event::{EditorEvent, EventRecorder, SceneEvent};
use cottonbro_editor::util::Color;
use cottonbro_editor::{Editor, EditorConfig, ObjectId, SnapshotCodec};
use egui::{pos2, vec2};

fn editor() -> Editor {
    Editor::new(EditorConfig::default()).unwrap()
}

fn state(editor: &Editor) -> String {
    SnapshotCodec::encode_scene(editor.scene()).unwrap()
}

fn add_box(editor: &mut Editor, x: f32, y: f32) -> ObjectId {
    editor.add_object(factory::create_shape(ShapeKind::Rect, vec2(40.0, 40.0), Color::BLACK, pos2(x, y)))
}

#[test]
fn test_fresh_editor_has_only_baseline() {
    let mut editor = editor();
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
    assert!(!editor.undo());
    assert_eq!(editor.history().undo_len(), 1);
}

#[test]
fn test_undo_then_redo_round_trips() {
    let mut editor = editor();
    let id = add_box(&mut editor, 100.0, 100.0);
    editor.select([id]);
    let before = state(&editor);

    assert!(editor.nudge(vec2(15.0, 0.0)));
    let after = state(&editor);
    assert_ne!(before, after);

    assert!(editor.undo());
    assert_eq!(state(&editor), before);
    assert!(editor.can_redo());

    assert!(editor.redo());
    assert_eq!(state(&editor), after);
    assert!(!editor.can_redo());
}

#[test]
fn test_new_commit_clears_redo() {
    let mut editor = editor();
    let id = add_box(&mut editor, 100.0, 100.0);
    editor.select([id]);
    editor.nudge(vec2(5.0, 0.0));
    editor.undo();
    assert!(editor.can_redo());

    editor.nudge(vec2(0.0, 5.0));
    assert!(!editor.can_redo());
    assert!(!editor.redo());
}

#[test]
fn test_history_is_capped() {
    let mut editor = editor();
    let id = add_box(&mut editor, 100.0, 250.0);
    editor.select([id]);
    for _ in 0..60 {
        editor.nudge(vec2(1.0, 0.0));
    }
    // The current state plus fifty undo steps
    assert_eq!(editor.history().undo_len(), 51);

    let mut undone = 0;
    while editor.undo() {
        undone += 1;
    }
    assert_eq!(undone, 50);
    assert!(!editor.can_undo());
    // The oldest surviving entry is ten nudges in
    let left = editor.scene().get(id).unwrap().transform.left;
    assert!((left - 110.0).abs() < 1e-3);
}

#[test]
fn test_undo_add_drops_object_and_selection() {
    let mut editor = editor();
    let recorder = EventRecorder::new();
    editor.events().subscribe(Box::new(recorder.clone()));

    let id = add_box(&mut editor, 100.0, 100.0);
    editor.select([id]);
    recorder.drain();

    assert!(editor.undo());
    assert!(editor.scene().get(id).is_none());
    assert!(editor.selection().is_empty());

    let events = recorder.drain();
    assert!(events.contains(&EditorEvent::SceneChanged(SceneEvent::Replayed)));
    assert!(events.contains(&EditorEvent::SelectionChanged { ids: Vec::new() }));
    assert!(events.contains(&EditorEvent::HistoryChanged {
        can_undo: false,
        can_redo: true,
    }));
}

#[test]
fn test_redo_restores_object_by_id() {
    let mut editor = editor();
    let id = add_box(&mut editor, 100.0, 100.0);
    editor.undo();
    editor.redo();
    let object = editor.scene().get(id).unwrap();
    assert_eq!(object.id, id);
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_artboard_fill_is_undoable() {
    let mut editor = editor();
    assert!(editor.set_artboard_fill(None));
    assert!(editor.scene().artboard().is_transparent());

    editor.undo();
    assert_eq!(editor.scene().artboard().fill, Some(Color::WHITE));
}

#[test]
fn test_load_design_resets_history() {
    let mut source = editor();
    add_box(&mut source, 100.0, 100.0);
    add_box(&mut source, 200.0, 200.0);
    let design = source.export().design;

    let mut editor = editor();
    add_box(&mut editor, 300.0, 300.0);
    editor.load_design(design).unwrap();

    assert_eq!(editor.scene().len(), 2);
    assert!(!editor.can_undo());
    assert_eq!(editor.scene().artboard().size(), vec2(500.0, 500.0));
}
