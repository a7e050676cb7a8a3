// End-to-end editing scenarios through the public API: commands, history,
// plain-text export and persistence working together.

use flow_editor_core::{
    Alignment, Block, BlockKind, Document, Editor, EditorAction, EditorConfig, EditorState,
    MarkKind, MemoryStorage, Outcome, Point, Selection, TextRun, ToolbarVariant, UndoManager,
    deserialize_plain_text, is_block_active, is_mark_active, persist, serialize_plain_text,
    toggle_block, toggle_mark,
};

fn hello_world() -> Document {
    Document::new(vec![Block::paragraph("Hello world")]).unwrap()
}

fn runs(doc: &Document, block: usize) -> Vec<TextRun> {
    doc.block(block).unwrap().children().to_vec()
}

#[test]
fn bold_hello_then_unbold() {
    let doc = hello_world();
    let sel = Selection::within(0, 0, 5);

    let bolded = toggle_mark(&doc, &sel, MarkKind::Bold).unwrap();
    assert_eq!(
        runs(&bolded, 0),
        vec![
            TextRun::new("Hello").with_mark(MarkKind::Bold),
            TextRun::new(" world"),
        ]
    );
    assert!(is_mark_active(&bolded, &sel, MarkKind::Bold));

    let unbolded = toggle_mark(&bolded, &sel, MarkKind::Bold).unwrap();
    assert_eq!(
        runs(&unbolded, 0),
        vec![TextRun::new("Hello"), TextRun::new(" world")]
    );
    assert!(!is_mark_active(&unbolded, &sel, MarkKind::Bold));
}

#[test]
fn heading_toggle_round_trip() {
    let doc = hello_world();
    let caret = Selection::collapsed(Point::new(0, 0));
    let heading = toggle_block(&doc, &caret, BlockKind::Heading1).unwrap();
    assert!(is_block_active(&heading, &caret, BlockKind::Heading1));
    let back = toggle_block(&heading, &caret, BlockKind::Heading1).unwrap();
    assert!(!is_block_active(&back, &caret, BlockKind::Heading1));
    assert_eq!(back.block(0).unwrap().kind(), BlockKind::Default);
}

fn mutations() -> Vec<EditorAction> {
    vec![
        "bold@0:0-0:5".parse().unwrap(),
        "heading2@1:0".parse().unwrap(),
        "center@0:2-1:1".parse().unwrap(),
        "italic@0:3-1:4".parse().unwrap(),
        "underline@1:0-1:2".parse().unwrap(),
    ]
}

fn two_blocks() -> Document {
    Document::new(vec![Block::paragraph("Hello world"), Block::paragraph("Second")]).unwrap()
}

#[test]
fn history_round_trip_reproduces_final_tree() {
    let mut state = EditorState::new(two_blocks());
    let mut snapshots = vec![state.document().clone()];
    for action in mutations() {
        assert!(state.execute(action).is_applied(), "{action} should apply");
        snapshots.push(state.document().clone());
    }
    let n = mutations().len();
    let last = state.document().clone();

    for step in (0..n).rev() {
        assert!(state.execute(EditorAction::Undo).is_applied());
        assert_eq!(state.document(), &snapshots[step]);
    }
    assert!(matches!(state.execute(EditorAction::Undo), Outcome::Unchanged));

    for step in 1..=n {
        assert!(state.execute(EditorAction::Redo).is_applied());
        assert_eq!(state.document(), &snapshots[step]);
    }
    assert_eq!(state.document(), &last);
    assert!(!state.can_redo());
}

#[test]
fn new_mutation_after_undo_clears_redo() {
    let mut state = EditorState::new(two_blocks());
    state.execute("bold@0:0-0:5".parse().unwrap());
    state.execute("italic@0:0-0:5".parse().unwrap());
    state.execute(EditorAction::Undo);
    assert!(state.can_redo());

    state.execute("right@1:0".parse().unwrap());
    assert!(!state.can_redo());
    let current = state.document().clone();
    assert!(matches!(state.execute(EditorAction::Redo), Outcome::Unchanged));
    assert_eq!(state.document(), &current);
}

#[test]
fn rejected_selection_does_not_touch_history() {
    let mut state = EditorState::new(two_blocks());
    state.execute("bold@0:0-0:5".parse().unwrap());
    state.execute(EditorAction::Undo);
    // A rejected command must not clear the redo stack either.
    let outcome = state.execute("italic@0:0-0:99".parse().unwrap());
    assert!(matches!(outcome, Outcome::Rejected(_)));
    assert!(state.can_redo());
    assert_eq!(state.history().undo_depth(), 0);
}

#[test]
fn plain_text_export_and_import() {
    let mut state = EditorState::new(two_blocks());
    for action in mutations() {
        state.execute(action);
    }
    let text = serialize_plain_text(state.document());
    assert_eq!(text, "Hello world\nSecond");

    // Formatting is lost, content and block count survive.
    let imported = deserialize_plain_text(&text);
    assert_eq!(imported, two_blocks());
}

#[test]
fn toolbar_follows_selection_and_history() {
    let mut state = EditorState::new(two_blocks());
    state.execute("bold@0:0-0:5".parse().unwrap());
    state.execute("justify@0:0".parse().unwrap());
    state.set_selection(Some(Selection::within(0, 0, 5)));

    let toolbar = state.toolbar(ToolbarVariant::Extended);
    assert!(toolbar.can_undo);
    assert!(!toolbar.can_redo);
    assert!(toolbar.is_pressed(flow_editor_core::FormatCommand::ToggleMark(MarkKind::Bold)));
    assert!(!toolbar.is_pressed(flow_editor_core::FormatCommand::ToggleMark(
        MarkKind::Strikethrough
    )));
    assert!(toolbar.is_pressed(flow_editor_core::FormatCommand::ToggleAlign(
        Alignment::Justify
    )));
}

#[test]
fn session_survives_restart() {
    let config = EditorConfig::default();
    let dir = tempfile::tempdir().unwrap();

    {
        let mut editor = Editor::open(flow_editor_core::FileStorage::new(dir.path()), &config);
        editor.replace_document(two_blocks()).unwrap();
        for action in mutations() {
            editor.execute(action);
        }
    }

    let reopened = Editor::open(flow_editor_core::FileStorage::new(dir.path()), &config);
    let mut expected = EditorState::new(two_blocks());
    for action in mutations() {
        expected.execute(action);
    }
    assert_eq!(reopened.document(), expected.document());
    // History is session-only.
    assert!(!reopened.state().can_undo());
}

#[test]
fn corrupt_snapshot_falls_back_to_default() {
    use flow_editor_core::Storage;

    let config = EditorConfig::default();
    let mut storage = MemoryStorage::new();
    storage
        .set(&config.storage_key, r#"[{"children":[]}]"#)
        .unwrap();
    let editor = Editor::open(storage, &config);
    assert_eq!(editor.document(), &Document::default());

    let mut storage = MemoryStorage::new();
    persist::persist(&mut storage, &config.storage_key, &two_blocks()).unwrap();
    let editor = Editor::open(storage, &config);
    assert_eq!(editor.document(), &two_blocks());
}
