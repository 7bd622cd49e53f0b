use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::assets::catalog::AccessoryCatalog;
use crate::assets::catalog::AccessoryId;

fn def(cat: &AccessoryCatalog, id: u32) -> Arc<AccessoryDef> {
    Arc::clone(cat.get(AccessoryId(id)).unwrap())
}

fn recording(store: &mut CompositionStore) -> Rc<RefCell<Vec<StoreEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    store.subscribe(move |e| sink.borrow_mut().push(*e));
    log
}

#[test]
fn re_adding_a_placed_accessory_is_a_noop() {
    let cat = AccessoryCatalog::builtin();
    let mut store = CompositionStore::new();
    let hat = store.add_accessory(&def(&cat, 1));
    let chain = store.add_accessory(&def(&cat, 2));
    store.set_accessory_scale(hat, 1.5);
    let before = store.snapshot().accessories;

    let again = store.add_accessory(&def(&cat, 1));
    assert_eq!(again, hat);
    assert_eq!(store.snapshot().accessories, before);
    assert_ne!(hat, chain);
}

#[test]
fn remove_takes_out_exactly_one_instance() {
    let cat = AccessoryCatalog::builtin();
    let mut store = CompositionStore::new();
    let a = store.add_accessory(&def(&cat, 1));
    let b = store.add_accessory(&def(&cat, 2));
    let c = store.add_accessory(&def(&cat, 3));
    store.set_accessory_scale(a, 0.5);
    store.set_accessory_offset(c, Vec2::new(-12.0, 40.0));

    store.remove_accessory(b);

    let ids: Vec<InstanceId> = store.accessories().iter().map(|i| i.instance_id).collect();
    assert_eq!(ids, vec![a, c]);
    assert_eq!(store.accessory(a).unwrap().scale, 0.5);
    assert_eq!(store.accessory(c).unwrap().offset, Vec2::new(-12.0, 40.0));

    // Unknown id: nothing happens.
    store.remove_accessory(b);
    assert_eq!(store.accessories().len(), 2);
}

#[test]
fn scale_is_clamped_and_nan_ignored() {
    let cat = AccessoryCatalog::builtin();
    let mut store = CompositionStore::new();
    let id = store.add_accessory(&def(&cat, 4));
    assert_eq!(store.accessory(id).unwrap().scale, 1.0);

    store.set_accessory_scale(id, 5.0);
    assert_eq!(store.accessory(id).unwrap().scale, 2.0);
    store.set_accessory_scale(id, 0.0);
    assert_eq!(store.accessory(id).unwrap().scale, 0.3);
    store.set_accessory_scale(id, 1.1);
    assert_eq!(store.accessory(id).unwrap().scale, 1.1);
    store.set_accessory_scale(id, f64::NAN);
    assert_eq!(store.accessory(id).unwrap().scale, 1.1);
}

#[test]
fn instance_ids_are_unique_even_within_one_millisecond() {
    let cat = AccessoryCatalog::builtin();
    let mut store = CompositionStore::new();
    let ids: Vec<InstanceId> = cat.iter().map(|d| store.add_accessory(d)).collect();
    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn background_variants_keep_their_caches() {
    let mut store = CompositionStore::new();
    assert_eq!(store.background(), Background::None);
    assert_eq!(store.background_color(), ColorDef::default());

    // Nothing uploaded yet.
    store.select_background(BackgroundKind::Image);
    assert_eq!(store.background(), Background::None);

    let red = ColorDef::rgb8(255, 0, 0);
    store.set_background_color(red);
    assert_eq!(store.background(), Background::Color(red));

    let img = ImageBlob::new("bg.png", vec![1u8, 2, 3]);
    store.set_background_image(img.clone());
    assert_eq!(store.background(), Background::Image(img.clone()));
    assert_eq!(store.background_color(), red);

    store.select_background(BackgroundKind::Color);
    assert_eq!(store.background(), Background::Color(red));
    assert_eq!(store.background_image(), Some(&img));

    store.clear_background();
    assert_eq!(store.background().kind(), BackgroundKind::None);
}

#[test]
fn photo_is_replaced_wholesale() {
    let mut store = CompositionStore::new();
    store.set_photo(ImageBlob::new("a.png", vec![1u8]));
    store.set_photo(ImageBlob::new("b.png", vec![2u8]));
    assert_eq!(store.photo().unwrap().label(), "b.png");
    assert_eq!(store.snapshot().photo.unwrap().bytes(), &[2u8]);
}

#[test]
fn invalid_file_input_is_ignored() {
    let dir = std::env::temp_dir().join(format!("pfpkit-store-input-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let text = dir.join("notes.txt");
    std::fs::write(&text, b"not an image").unwrap();

    let mut store = CompositionStore::new();
    let log = recording(&mut store);

    store.set_photo_file(None);
    store.set_photo_file(Some(&dir.join("missing.png")));
    store.set_photo_file(Some(&text));
    store.set_background_image_file(Some(&text));
    assert!(store.photo().is_none());
    assert_eq!(store.background(), Background::None);
    assert!(log.borrow().is_empty());

    let svg = dir.join("me.svg");
    std::fs::write(&svg, br#"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"/>"#)
        .unwrap();
    store.set_photo_file(Some(&svg));
    assert_eq!(store.photo().unwrap().label(), "me.svg");
    assert_eq!(log.borrow().as_slice(), &[StoreEvent::PhotoChanged]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn observers_see_each_mutation_until_unsubscribed() {
    let cat = AccessoryCatalog::builtin();
    let mut store = CompositionStore::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let sub = store.subscribe(move |e| sink.borrow_mut().push(*e));

    let id = store.add_accessory(&def(&cat, 5));
    store.add_accessory(&def(&cat, 5));
    store.set_accessory_scale(id, 1.4);
    store.set_accessory_offset(id, Vec2::new(3.0, 4.0));
    store.set_background_color(ColorDef::default());
    store.remove_accessory(id);

    assert_eq!(
        log.borrow().as_slice(),
        &[
            StoreEvent::AccessoryAdded(id),
            StoreEvent::AccessoryScaled(id),
            StoreEvent::AccessoryMoved(id),
            StoreEvent::BackgroundChanged(BackgroundKind::Color),
            StoreEvent::AccessoryRemoved(id),
        ]
    );

    assert!(store.unsubscribe(sub));
    assert!(!store.unsubscribe(sub));
    store.set_photo(ImageBlob::new("p.png", vec![0u8]));
    assert_eq!(log.borrow().len(), 5);
}
