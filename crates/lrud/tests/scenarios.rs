//! End-to-end navigation scenarios driven through `handle_key_event`.
//!
//! Each test builds a small tree, feeds raw key codes through the default
//! key configuration, and checks the resulting focus sequence together with
//! the notifications observed by subscribers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lrud::{CallbackKeyEvent, EventKind, KeyEvent, KeyOutcome, Lrud, NavEvent, NodeAttrs};

const ENTER: u32 = 13;
const LEFT: u32 = 37;
const UP: u32 = 38;
const RIGHT: u32 = 39;
const DOWN: u32 = 40;

// ── Helpers ─────────────────────────────────────────────────────────────

fn collect(nav: &mut Lrud, kinds: &[EventKind]) -> Rc<RefCell<Vec<NavEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    for &kind in kinds {
        let sink = Rc::clone(&seen);
        nav.on(kind, move |ev, _| sink.borrow_mut().push(ev.clone()));
    }
    seen
}

fn press(nav: &mut Lrud, code: u32) -> KeyOutcome {
    nav.handle_key_event(&mut KeyEvent::new(code))
}

fn horizontal_list(wrapping: bool) -> Lrud {
    let mut nav = Lrud::new();
    nav.register(
        "root",
        NodeAttrs::new().horizontal().with_wrapping(wrapping),
    )
    .unwrap();
    for id in ["child1", "child2", "child3"] {
        nav.register(id, NodeAttrs::child_of("root")).unwrap();
    }
    nav
}

fn grid_2x3() -> Lrud {
    let mut nav = Lrud::new();
    nav.register("grid", NodeAttrs::new().vertical().with_grid(true))
        .unwrap();
    for row in ["row1", "row2"] {
        nav.register(row, NodeAttrs::child_of("grid").horizontal())
            .unwrap();
        for col in 1..=3 {
            let id = format!("{row}-child{col}");
            nav.register(&id, NodeAttrs::child_of(row)).unwrap();
        }
    }
    nav
}

// ── Lists ───────────────────────────────────────────────────────────────

#[test]
fn horizontal_list_walk() {
    let mut nav = horizontal_list(false);
    nav.focus(Some("child1")).unwrap();
    let moves = collect(&mut nav, &[EventKind::Move]);

    let stops = Rc::new(Cell::new(0u32));
    let mut sequence = Vec::new();
    for code in [RIGHT, RIGHT, RIGHT, LEFT, LEFT, LEFT] {
        let counter = Rc::clone(&stops);
        let mut ev = CallbackKeyEvent::new(code, move || counter.set(counter.get() + 1));
        nav.handle_key_event(&mut ev);
        sequence.push(nav.current_focus().unwrap().to_owned());
    }

    assert_eq!(
        sequence,
        ["child2", "child3", "child3", "child2", "child1", "child1"]
    );
    assert_eq!(moves.borrow().len(), 4);
    assert_eq!(stops.get(), 6);
}

#[test]
fn edge_emits_nothing_but_stops_propagation() {
    let mut nav = horizontal_list(false);
    nav.focus(Some("child3")).unwrap();
    let seen = collect(&mut nav, &EventKind::ALL);

    let mut ev = KeyEvent::new(RIGHT);
    let outcome = nav.handle_key_event(&mut ev);

    assert_eq!(
        outcome,
        KeyOutcome::Edge {
            container: "root".into()
        }
    );
    assert_eq!(nav.current_focus(), Some("child3"));
    assert!(seen.borrow().is_empty());
    assert_eq!(ev.stop_count(), 1);
}

#[test]
fn wrapping_list_cycles_both_ways() {
    let mut nav = horizontal_list(true);
    nav.focus(Some("child3")).unwrap();

    press(&mut nav, RIGHT);
    assert_eq!(nav.current_focus(), Some("child1"));
    press(&mut nav, LEFT);
    assert_eq!(nav.current_focus(), Some("child3"));
}

#[test]
fn move_payload_names_container_and_landing_leaf() {
    let mut nav = Lrud::new();
    nav.register("list", NodeAttrs::new().horizontal()).unwrap();
    nav.register("a", NodeAttrs::child_of("list")).unwrap();
    nav.register("group", NodeAttrs::child_of("list")).unwrap();
    nav.register("g1", NodeAttrs::child_of("group")).unwrap();
    nav.register("g2", NodeAttrs::child_of("group")).unwrap();
    nav.set_active_child("group", "g2").unwrap();
    nav.focus(Some("a")).unwrap();
    let moves = collect(&mut nav, &[EventKind::Move]);

    press(&mut nav, RIGHT);

    let moves = moves.borrow();
    let [NavEvent::Move(mv)] = moves.as_slice() else {
        panic!("expected a single move, got {moves:?}");
    };
    assert_eq!(mv.from, "a");
    assert_eq!(mv.to, "g2");
    assert_eq!(mv.parent, "list");
    assert_eq!(nav.current_focus(), Some("g2"));
}

// ── Grids ───────────────────────────────────────────────────────────────

#[test]
fn grid_walk_keeps_column() {
    let mut nav = grid_2x3();
    nav.focus(Some("row1-child1")).unwrap();

    let mut sequence = Vec::new();
    for code in [RIGHT, DOWN, RIGHT, UP] {
        assert!(press(&mut nav, code).is_consumed());
        sequence.push(nav.current_focus().unwrap().to_owned());
    }

    assert_eq!(
        sequence,
        ["row1-child2", "row2-child2", "row2-child3", "row1-child3"]
    );
}

#[test]
fn grid_rows_track_active_path() {
    let mut nav = grid_2x3();
    nav.focus(Some("row1-child2")).unwrap();
    press(&mut nav, DOWN);

    assert_eq!(
        nav.tree().active_path(),
        vec!["grid", "row2", "row2-child2"]
    );
    assert_eq!(nav.tree().active_child("row1"), None);
}

// ── Notifications ───────────────────────────────────────────────────────

#[test]
fn active_reported_deepest_first() {
    let mut nav = Lrud::new();
    nav.register("root", NodeAttrs::new()).unwrap();
    nav.register("child", NodeAttrs::child_of("root")).unwrap();
    nav.register("grandchild", NodeAttrs::child_of("child"))
        .unwrap();
    let seen = collect(&mut nav, &[EventKind::Active, EventKind::Focus]);

    nav.focus(Some("root")).unwrap();

    let names: Vec<String> = seen.borrow().iter().map(ToString::to_string).collect();
    assert_eq!(names, ["active grandchild", "active child", "focus grandchild"]);
}

#[test]
fn enter_emits_select_and_leaves_propagation() {
    let mut nav = horizontal_list(false);
    nav.focus(Some("child2")).unwrap();
    let seen = collect(&mut nav, &[EventKind::Select]);

    let mut ev = KeyEvent::new(ENTER);
    nav.handle_key_event(&mut ev);

    assert_eq!(
        *seen.borrow(),
        vec![NavEvent::Select {
            id: "child2".into()
        }]
    );
    assert!(!ev.propagation_stopped());
}

#[test]
fn unregister_focused_blurs_once() {
    let mut nav = horizontal_list(false);
    nav.focus(Some("child2")).unwrap();
    let seen = collect(&mut nav, &EventKind::ALL);

    assert!(nav.unregister("child2"));

    assert_eq!(nav.current_focus(), None);
    assert_eq!(
        *seen.borrow(),
        vec![NavEvent::Blur {
            id: "child2".into()
        }]
    );
    assert_eq!(nav.tree().children("root"), ["child1", "child3"]);
}

#[test]
fn destroy_leaves_nothing_listening() {
    let mut nav = horizontal_list(false);
    nav.focus(None).unwrap();
    let seen = collect(&mut nav, &EventKind::ALL);

    nav.destroy();
    assert!(nav.tree().is_empty());
    assert_eq!(nav.current_focus(), None);

    nav.register("fresh", NodeAttrs::new().horizontal()).unwrap();
    nav.register("x", NodeAttrs::child_of("fresh")).unwrap();
    nav.focus(None).unwrap();
    press(&mut nav, ENTER);
    assert!(seen.borrow().is_empty());
}

// ── Registration ────────────────────────────────────────────────────────

#[test]
fn reregistration_merges_metadata() {
    let mut nav = Lrud::new();
    nav.register("tile", NodeAttrs::new().with_data("title", "Home"))
        .unwrap();
    nav.register("tile", NodeAttrs::new().with_data("badge", 3))
        .unwrap();

    let node = nav.node("tile").unwrap();
    assert_eq!(node.get_data("title"), Some(&"Home".into()));
    assert_eq!(node.get_data("badge"), Some(&3.into()));
}

#[test]
fn listeners_read_tree_during_emission() {
    let mut nav = horizontal_list(false);
    nav.focus(Some("child1")).unwrap();
    let observed = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&observed);
    nav.on(EventKind::Move, move |_, tree| {
        *sink.borrow_mut() = tree.current_focus().map(str::to_owned);
    });

    press(&mut nav, RIGHT);

    // move fires before focus is applied
    assert_eq!(observed.borrow().as_deref(), Some("child1"));
    assert_eq!(nav.current_focus(), Some("child2"));
}
