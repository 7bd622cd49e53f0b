use std::sync::Arc;

use super::*;
use crate::assets::catalog::{AccessoryCatalog, AccessoryId};

fn store_with_one() -> (CompositionStore, InstanceId) {
    let cat = AccessoryCatalog::builtin();
    let mut store = CompositionStore::new();
    let id = store.add_accessory(&Arc::clone(cat.get(AccessoryId(3)).unwrap()));
    (store, id)
}

#[test]
fn drag_moves_by_pointer_delta_and_end_keeps_offset() {
    let (mut store, id) = store_with_one();

    store.pointer_down(id, &PointerInput::mouse(100.0, 100.0));
    assert!(store.accessory(id).unwrap().is_dragging());

    store.pointer_move(id, &PointerInput::mouse(150.0, 130.0));
    assert_eq!(store.accessory(id).unwrap().offset, Vec2::new(50.0, 30.0));

    store.pointer_up(id);
    let inst = store.accessory(id).unwrap();
    assert_eq!(inst.offset, Vec2::new(50.0, 30.0));
    assert!(!inst.is_dragging());
}

#[test]
fn second_gesture_continues_from_previous_offset() {
    let (mut store, id) = store_with_one();
    store.set_accessory_offset(id, Vec2::new(50.0, 30.0));

    store.pointer_down(id, &PointerInput::touch(10.0, 10.0));
    store.pointer_move(id, &PointerInput::touch(0.0, 20.0));
    store.pointer_leave(id);

    assert_eq!(store.accessory(id).unwrap().offset, Vec2::new(40.0, 40.0));
}

#[test]
fn move_without_down_is_ignored() {
    let (mut store, id) = store_with_one();
    store.pointer_move(id, &PointerInput::mouse(400.0, 400.0));
    assert_eq!(store.accessory(id).unwrap().offset, Vec2::ZERO);

    store.pointer_down(id, &PointerInput::mouse(0.0, 0.0));
    store.pointer_up(id);
    store.pointer_move(id, &PointerInput::mouse(400.0, 400.0));
    assert_eq!(store.accessory(id).unwrap().offset, Vec2::ZERO);
}

#[test]
fn offsets_are_unbounded() {
    let (mut store, id) = store_with_one();
    store.pointer_down(id, &PointerInput::mouse(0.0, 0.0));
    store.pointer_move(id, &PointerInput::mouse(-5_000.0, 9_000.0));
    assert_eq!(
        store.accessory(id).unwrap().offset,
        Vec2::new(-5_000.0, 9_000.0)
    );
}

#[test]
fn empty_touch_list_and_unknown_ids_are_ignored() {
    let (mut store, id) = store_with_one();
    store.pointer_down(id, &PointerInput::Touch { touches: vec![] });
    assert!(!store.accessory(id).unwrap().is_dragging());

    let ghost = InstanceId(1);
    store.pointer_down(ghost, &PointerInput::mouse(1.0, 1.0));
    store.pointer_move(ghost, &PointerInput::mouse(2.0, 2.0));
    store.pointer_up(ghost);
    assert_eq!(store.accessories().len(), 1);
}

#[test]
fn multi_touch_uses_first_point() {
    let input = PointerInput::Touch {
        touches: vec![Point::new(7.0, 8.0), Point::new(100.0, 100.0)],
    };
    assert_eq!(input.position(), Some(Point::new(7.0, 8.0)));
}

#[test]
fn drag_states_are_per_instance() {
    let cat = AccessoryCatalog::builtin();
    let mut store = CompositionStore::new();
    let a = store.add_accessory(&Arc::clone(cat.get(AccessoryId(1)).unwrap()));
    let b = store.add_accessory(&Arc::clone(cat.get(AccessoryId(2)).unwrap()));

    store.pointer_down(a, &PointerInput::mouse(0.0, 0.0));
    store.pointer_down(b, &PointerInput::touch(10.0, 10.0));
    store.pointer_move(a, &PointerInput::mouse(5.0, 0.0));
    store.pointer_move(b, &PointerInput::touch(10.0, 25.0));
    store.pointer_up(a);

    assert_eq!(store.accessory(a).unwrap().offset, Vec2::new(5.0, 0.0));
    assert!(!store.accessory(a).unwrap().is_dragging());
    assert_eq!(store.accessory(b).unwrap().offset, Vec2::new(0.0, 15.0));
    assert!(store.accessory(b).unwrap().is_dragging());
}

#[test]
fn drag_state_machine_transitions() {
    let s = DragState::begin(Point::new(100.0, 100.0), Vec2::new(20.0, -10.0));
    assert_eq!(
        s,
        DragState::Dragging {
            anchor: Point::new(80.0, 110.0)
        }
    );
    assert_eq!(
        s.offset_at(Point::new(90.0, 90.0)),
        Some(Vec2::new(10.0, -20.0))
    );
    assert_eq!(DragState::Idle.offset_at(Point::ORIGIN), None);
}
