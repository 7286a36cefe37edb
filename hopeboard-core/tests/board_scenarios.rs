//! End-to-end editor flows over a board document, without a server.

use chrono::Utc;
use hopeboard_core::editor::{NodeContent, DEFAULT_TEXT, WELCOME_TEXT};
use hopeboard_core::models::{BoardTitle, TextAlign};
use hopeboard_core::{
    AddOutcome, Board, BoardEditor, Canvas, Dimension, ElementKind, ElementType, Point,
    PointerTarget,
    StyleCommand, Visibility,
};
use uuid::Uuid;

fn new_board(title: &str) -> Board {
    Board::new(BoardTitle::new(title).unwrap(), Uuid::new_v4(), Utc::now())
}

#[test]
fn trip_notes_edit_save_reopen() {
    let mut stored = new_board("Trip Notes");
    let mut editor = BoardEditor::open(stored.clone(), Canvas::new(1024.0, 768.0), true);

    // The welcome element is part of the list until the user removes it.
    let welcome = editor.elements()[0].id.clone();
    editor.delete(&welcome).unwrap();

    let AddOutcome::Added(title_id) = editor.add(ElementType::Text).unwrap() else {
        panic!("text is added inline");
    };
    editor.set_text_content(&title_id, "Lisbon, day one").unwrap();
    editor.apply_style(StyleCommand::FontFamily("Georgia".into())).unwrap();
    editor.apply_style(StyleCommand::Align(TextAlign::Center)).unwrap();

    let photo = editor
        .attach_file(ElementType::Image, "image/jpeg", &[0xff, 0xd8, 0xff])
        .unwrap();
    let drag = editor.pointer_down(PointerTarget::Body(photo.clone()), Point::new(100.0, 100.0));
    editor.pointer_move(&drag, Point::new(400.0, 300.0));
    editor.pointer_up(drag);

    stored.apply(editor.save_request(), Utc::now()).unwrap();
    let reopened = BoardEditor::open(stored, Canvas::new(1024.0, 768.0), true);

    assert_eq!(reopened.elements().len(), 2);
    assert!(reopened
        .elements()
        .iter()
        .all(|e| e.kind.content() != Some(WELCOME_TEXT)));

    let title = reopened.element(&title_id).unwrap();
    match &title.kind {
        ElementKind::Text { content, style } => {
            assert_eq!(content, "Lisbon, day one");
            assert_eq!(style.font_family, "Georgia");
            assert_eq!(style.text_align, TextAlign::Center);
        }
        other => panic!("expected text, got {:?}", other),
    }

    let photo = reopened.element(&photo).unwrap();
    assert_eq!((photo.x, photo.y), (350.0, 250.0));
    assert_eq!(photo.z_index, 2);
    assert!(photo
        .kind
        .content()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));

    // Photo was raised by the drag, so it paints last.
    let tree = reopened.render();
    assert_eq!(tree.nodes.last().unwrap().id, photo.id);
    assert!(matches!(tree.nodes[0].content, NodeContent::Text { editable: true, .. }));
}

#[test]
fn default_text_survives_save_and_reload() {
    let mut stored = new_board("Trip Notes");
    let mut editor = BoardEditor::open(stored.clone(), Canvas::default(), true);
    let AddOutcome::Added(text_id) = editor.add(ElementType::Text).unwrap() else {
        panic!("text is added inline");
    };

    stored.apply(editor.save_request(), Utc::now()).unwrap();
    let json = serde_json::to_string(&stored).unwrap();
    let reloaded: Board = serde_json::from_str(&json).unwrap();
    let reopened = BoardEditor::open(reloaded, Canvas::default(), true);

    // The welcome element was saved along with the new one.
    assert_eq!(reopened.elements().len(), 2);
    let texts: Vec<_> = reopened
        .elements()
        .iter()
        .filter(|e| e.kind.content() == Some(DEFAULT_TEXT))
        .collect();
    assert_eq!(texts.len(), 1);

    let text = texts[0];
    assert_eq!(text.id, text_id);
    assert!(matches!(text.kind, ElementKind::Text { .. }));
    assert_eq!((text.x, text.y), (50.0, 50.0));
    assert_eq!(text.width, Dimension::Px(200.0));

    let other = reopened.elements().iter().find(|e| e.id != text_id).unwrap();
    assert_eq!(other.kind.content(), Some(WELCOME_TEXT));
}

#[test]
fn unsaved_welcome_is_not_persisted() {
    let stored = new_board("Scratch");
    let editor = BoardEditor::open(stored.clone(), Canvas::default(), true);
    assert_eq!(editor.elements().len(), 1);

    // Nothing saved: the stored board is still empty.
    assert!(stored.elements.is_empty());
}

#[test]
fn visibility_controls_share_link() {
    let mut stored = new_board("Moodboard");
    let mut editor = BoardEditor::open(stored.clone(), Canvas::default(), true);
    let origin = "http://localhost:3000/board.html";

    assert_eq!(editor.share_link(origin), None);

    editor.set_visibility(Visibility::Public).unwrap();
    let link = editor.share_link(origin).unwrap();
    assert_eq!(link, format!("{}?share={}", origin, stored.share_token));

    stored.apply(editor.save_request(), Utc::now()).unwrap();
    assert!(stored.is_public());

    let viewer = BoardEditor::open(stored, Canvas::default(), false);
    assert!(!viewer.is_editable());
    assert_eq!(viewer.share_link(origin), Some(link));
    assert!(viewer.render().nodes.iter().all(|n| !n.controls));
}
