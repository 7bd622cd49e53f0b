use std::io::Cursor;

use super::*;
use crate::composition::model::{Background, BackgroundKind};

fn png_bytes(px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn parses_full_document() {
    let doc = CompositionDoc::from_json(
        r##"{
            "photo": "me.png",
            "background": { "color": "#667eea" },
            "preview_size": 448,
            "accessories": [
                { "accessory": 1, "scale": 1.2, "offset": [10, -20] },
                { "accessory": 3 }
            ],
            "photo_fit": "contain"
        }"##,
    )
    .unwrap();
    assert_eq!(doc.photo.as_deref(), Some("me.png"));
    assert_eq!(doc.background, BackgroundDoc::Color(ColorDef::default()));
    assert_eq!(doc.accessories[0].offset, [10.0, -20.0]);
    assert_eq!(doc.accessories[1].scale, 1.0);
    assert_eq!(doc.accessories[1].offset, [0.0, 0.0]);
    assert_eq!(doc.photo_fit, PhotoFit::Contain);
    assert!((doc.preview().scale_ratio(1000) - 1000.0 / 448.0).abs() < 1e-12);
    doc.validate().unwrap();
}

#[test]
fn background_forms() {
    let none = CompositionDoc::from_json(r#"{ "background": "none" }"#).unwrap();
    assert_eq!(none.background, BackgroundDoc::None);
    let img = CompositionDoc::from_json(r#"{ "background": { "image": "bg.jpg" } }"#).unwrap();
    assert_eq!(img.background, BackgroundDoc::Image("bg.jpg".to_owned()));
    assert_eq!(CompositionDoc::from_json("{}").unwrap().photo_fit, PhotoFit::Stretch);
}

#[test]
fn rejects_unknown_fields_and_bad_values() {
    assert!(matches!(
        CompositionDoc::from_json(r#"{ "fotos": "x.png" }"#),
        Err(PfpError::Serde(_))
    ));

    let escape = CompositionDoc::from_json(r#"{ "photo": "../x.png" }"#).unwrap();
    assert!(escape.validate().is_err());

    let zero = CompositionDoc::from_json(r#"{ "preview_size": 0 }"#).unwrap();
    assert!(zero.validate().is_err());
}

#[test]
fn apply_replays_into_store_and_clamps() {
    let dir = std::env::temp_dir().join(format!("pfpkit-doc-apply-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("me.png"), png_bytes([255, 0, 0, 255])).unwrap();

    let doc = CompositionDoc::from_json(
        r#"{
            "photo": "me.png",
            "background": { "image": "missing-bg.png" },
            "accessories": [
                { "accessory": 2, "scale": 9, "offset": [1, 2] },
                { "accessory": 2, "scale": 0.5 },
                { "accessory": 6 }
            ]
        }"#,
    )
    .unwrap();

    let catalog = doc.catalog(&dir).unwrap();
    let mut store = CompositionStore::new();
    doc.apply(&dir, &catalog, &mut store).unwrap();

    assert_eq!(store.photo().unwrap().label(), "me.png");
    // Unreadable background file is ignored.
    assert_eq!(store.background().kind(), BackgroundKind::None);
    assert_eq!(store.background(), Background::None);

    let placed = store.accessories();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].accessory_id(), AccessoryId(2));
    // The second placement of id 2 re-targets the existing instance.
    assert_eq!(placed[0].scale, 0.5);
    assert_eq!(placed[0].offset, Vec2::new(0.0, 0.0));
    assert_eq!(placed[1].accessory_id(), AccessoryId(6));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn apply_rejects_unknown_accessory() {
    let doc = CompositionDoc::from_json(r#"{ "accessories": [ { "accessory": 99 } ] }"#).unwrap();
    let mut store = CompositionStore::new();
    let err = doc
        .apply(Path::new("."), &AccessoryCatalog::builtin(), &mut store)
        .unwrap_err();
    assert!(err.to_string().contains("unknown accessory id 99"));
}
