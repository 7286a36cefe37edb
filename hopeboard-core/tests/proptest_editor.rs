use chrono::Utc;
use hopeboard_core::editor::{MIN_ELEMENT_SIZE, STICKERS};
use hopeboard_core::models::{BoardTitle, TextStyle};
use hopeboard_core::{
    AddOutcome, Board, BoardEditor, Canvas, Dimension, ElementType, Interaction, Point,
    PointerTarget, StyleCommand,
};
use proptest::prelude::*;
use uuid::Uuid;

const CANVAS: Canvas = Canvas {
    width: 900.0,
    height: 700.0,
};

/// One user action against the editor; indexes wrap around the list
#[derive(Debug, Clone)]
enum Op {
    Add(ElementType),
    Delete(usize),
    Forward(usize),
    Backward(usize),
    Drag(usize, f64, f64),
    Resize(usize, f64, f64),
}

fn arb_element_type() -> impl Strategy<Value = ElementType> {
    prop::sample::select(ElementType::all().to_vec())
}

fn arb_op() -> impl Strategy<Value = Op> {
    // Whole pixels keep the JSON round trip exact.
    let coord = (-2000i32..3000).prop_map(f64::from);
    prop_oneof![
        arb_element_type().prop_map(Op::Add),
        any::<usize>().prop_map(Op::Delete),
        any::<usize>().prop_map(Op::Forward),
        any::<usize>().prop_map(Op::Backward),
        (any::<usize>(), coord.clone(), coord.clone()).prop_map(|(i, x, y)| Op::Drag(i, x, y)),
        (any::<usize>(), coord.clone(), coord).prop_map(|(i, x, y)| Op::Resize(i, x, y)),
    ]
}

fn empty_board() -> Board {
    Board::new(BoardTitle::new("Props").unwrap(), Uuid::new_v4(), Utc::now())
}

fn id_at(editor: &BoardEditor, index: usize) -> Option<String> {
    let elements = editor.elements();
    if elements.is_empty() {
        return None;
    }
    Some(elements[index % elements.len()].id.clone())
}

fn run(editor: &mut BoardEditor, op: &Op) {
    match op {
        Op::Add(kind) => {
            if let AddOutcome::AwaitingFile(kind) = editor.add(*kind).unwrap() {
                editor.attach_file(kind, "image/gif", b"GIF89a").unwrap();
            }
        }
        Op::Delete(i) => {
            if let Some(id) = id_at(editor, *i) {
                editor.delete(&id).unwrap();
            }
        }
        Op::Forward(i) => {
            if let Some(id) = id_at(editor, *i) {
                editor.bring_forward(&id).unwrap();
            }
        }
        Op::Backward(i) => {
            if let Some(id) = id_at(editor, *i) {
                editor.send_backward(&id).unwrap();
            }
        }
        Op::Drag(i, x, y) => {
            if let Some(id) = id_at(editor, *i) {
                let drag = editor.pointer_down(PointerTarget::Body(id), Point::new(60.0, 60.0));
                editor.pointer_move(&drag, Point::new(*x, *y));
                editor.pointer_up(drag);
            }
        }
        Op::Resize(i, x, y) => {
            if let Some(id) = id_at(editor, *i) {
                let resize =
                    editor.pointer_down(PointerTarget::ResizeHandle(id), Point::new(250.0, 250.0));
                editor.pointer_move(&resize, Point::new(*x, *y));
                editor.pointer_up(resize);
            }
        }
    }
}

proptest! {
    /// Property: one render node per element after any add/delete sequence
    #[test]
    fn prop_render_matches_list(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut editor = BoardEditor::open(empty_board(), CANVAS, true);
        for op in &ops {
            run(&mut editor, op);
            prop_assert_eq!(editor.render().nodes.len(), editor.elements().len());
        }
    }

    /// Property: z-index never drops below 1, sizes never below 50 after a resize
    #[test]
    fn prop_z_and_size_floors(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut editor = BoardEditor::open(empty_board(), CANVAS, true);
        for op in &ops {
            run(&mut editor, op);
        }
        for element in editor.elements() {
            prop_assert!(element.z_index >= 1);
            if let Dimension::Px(w) = element.width {
                prop_assert!(w >= MIN_ELEMENT_SIZE);
            }
            if let Dimension::Px(h) = element.height {
                prop_assert!(h >= MIN_ELEMENT_SIZE);
            }
        }
    }

    /// Property: a drag keeps a canvas-sized-or-smaller element fully inside the canvas
    #[test]
    fn prop_drag_stays_in_canvas(
        w in 50.0..900.0f64,
        h in 50.0..700.0f64,
        px in -5000.0..5000.0f64,
        py in -5000.0..5000.0f64,
    ) {
        let mut editor = BoardEditor::open(empty_board(), CANVAS, true);
        let AddOutcome::Added(id) = editor.add(ElementType::Shape).unwrap() else {
            panic!("shape needs no file");
        };

        // Size the shape through a resize from its 200x200 default.
        let resize = editor.pointer_down(PointerTarget::ResizeHandle(id.clone()), Point::new(0.0, 0.0));
        editor.pointer_move(&resize, Point::new(w - 200.0, h - 200.0));
        editor.pointer_up(resize);

        let drag = editor.pointer_down(PointerTarget::Body(id.clone()), Point::new(60.0, 60.0));
        editor.pointer_move(&drag, Point::new(px, py));
        prop_assert!(editor.pointer_up(drag).is_idle());

        let e = editor.element(&id).unwrap();
        prop_assert!(e.x >= 0.0 && e.x + w <= CANVAS.width + 1e-9);
        prop_assert!(e.y >= 0.0 && e.y + h <= CANVAS.height + 1e-9);
    }

    /// Property: repeated send-backward bottoms out at 1
    #[test]
    fn prop_send_backward_floor(forward in 0usize..10, backward in 0usize..20) {
        let mut editor = BoardEditor::open(empty_board(), CANVAS, true);
        let AddOutcome::Added(id) = editor.add(ElementType::Sticker).unwrap() else {
            panic!("sticker needs no file");
        };
        for _ in 0..forward {
            editor.bring_forward(&id).unwrap();
        }
        let mut z = 0;
        for _ in 0..backward {
            z = editor.send_backward(&id).unwrap();
        }
        if backward > 0 {
            prop_assert_eq!(z, (1 + forward as u32).saturating_sub(backward as u32).max(1));
        }
    }

    /// Property: toggling bold, italic or underline twice restores the style
    #[test]
    fn prop_double_toggle_is_identity(which in 0usize..3, bold in any::<bool>()) {
        let mut editor = BoardEditor::open(empty_board(), CANVAS, true);
        let AddOutcome::Added(id) = editor.add(ElementType::Text).unwrap() else {
            panic!("text needs no file");
        };
        if bold {
            editor.apply_style(StyleCommand::ToggleBold).unwrap();
        }
        let before: TextStyle = editor.element(&id).unwrap().text_style().unwrap().clone();

        let toggle = [StyleCommand::ToggleBold, StyleCommand::ToggleItalic, StyleCommand::ToggleUnderline][which].clone();
        editor.apply_style(toggle.clone()).unwrap();
        editor.apply_style(toggle).unwrap();

        prop_assert_eq!(editor.element(&id).unwrap().text_style().unwrap(), &before);
    }

    /// Property: save, store as JSON, reload reproduces the element list
    #[test]
    fn prop_save_reload_round_trip(ops in prop::collection::vec(arb_op(), 0..25)) {
        let mut editor = BoardEditor::open(empty_board(), CANVAS, true);
        for op in &ops {
            run(&mut editor, op);
        }

        let mut stored = editor.board().clone();
        stored.apply(editor.save_request(), Utc::now()).unwrap();
        let json = serde_json::to_string(&stored).unwrap();
        let reloaded: Board = serde_json::from_str(&json).unwrap();

        let viewer = BoardEditor::open(reloaded, CANVAS, false);
        prop_assert_eq!(viewer.elements(), editor.elements());
    }
}

#[test]
fn stickers_are_single_glyphs() {
    for sticker in STICKERS {
        assert!(!sticker.is_empty());
    }
    assert!(Interaction::default().is_idle());
}
