use colonist_core::Rgb;
use colonist_media::imaging::fade_image;
use colonist_media::{MediaError, MemoryResourceStore, ResourceStore};
use image::{Rgba, RgbaImage};
use proptest::prelude::*;
use std::fs;

#[test]
fn test_load_manifest() {
    let dir = tempfile::tempdir().unwrap();
    RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255]))
        .save(dir.path().join("furs.png"))
        .unwrap();
    fs::write(
        dir.path().join("resources.json"),
        r##"{
            "images": { "model.goods.furs.image": "furs.png" },
            "strings": { "cross": "+" },
            "colors": { "mission.expert.foreground.color": "#102030" }
        }"##,
    )
    .unwrap();

    let store = MemoryResourceStore::new();
    let generation = store.generation();
    let loaded = store.load_manifest(&dir.path().join("resources.json")).unwrap();
    assert_eq!(loaded, 3);
    assert!(store.generation() > generation);

    let furs = store.image("model.goods.furs.image", 1.0).unwrap();
    assert_eq!(furs.dimensions(), (4, 2));
    assert_eq!(store.string("cross").as_deref(), Some("+"));
    assert_eq!(
        store.color("mission.expert.foreground.color"),
        Some(Rgb::new(0x10, 0x20, 0x30))
    );
}

#[test]
fn test_manifest_errors() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryResourceStore::new();

    let missing = store.load_manifest(&dir.path().join("nope.json"));
    assert!(matches!(missing, Err(MediaError::FileOpen(_))));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(store.load_manifest(&broken), Err(MediaError::Manifest(_))));

    let bad_color = dir.path().join("color.json");
    fs::write(&bad_color, r#"{ "colors": { "x.color": "orange" } }"#).unwrap();
    assert!(matches!(store.load_manifest(&bad_color), Err(MediaError::Core(_))));
}

#[test]
fn test_scan_directory() {
    let dir = tempfile::tempdir().unwrap();
    let goods = dir.path().join("model").join("goods");
    fs::create_dir_all(&goods).unwrap();
    RgbaImage::new(2, 2).save(goods.join("furs.image.png")).unwrap();
    fs::write(goods.join("readme.txt"), "ignored").unwrap();
    fs::write(goods.join("broken.image.png"), "not a png").unwrap();

    let store = MemoryResourceStore::new();
    assert_eq!(store.scan_directory(dir.path()).unwrap(), 1);
    assert!(store.has("model.goods.furs.image"));
    assert!(!store.has("model.goods.broken.image"));

    assert!(store.scan_directory(&dir.path().join("missing")).is_err());
}

#[test]
fn test_fade_to_mid_gray_keeps_alpha() {
    let mut image = RgbaImage::from_pixel(3, 2, Rgba([10, 200, 255, 255]));
    image.put_pixel(1, 1, Rgba([0, 0, 0, 40]));
    let faded = fade_image(&image, 0.0, 128.0);
    for (x, y, pixel) in faded.enumerate_pixels() {
        let alpha = image.get_pixel(x, y).0[3];
        assert_eq!(pixel.0, [128, 128, 128, alpha]);
    }
}

proptest! {
    #[test]
    fn prop_fade_identity(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>()) {
        let image = RgbaImage::from_pixel(2, 1, Rgba([r, g, b, a]));
        prop_assert_eq!(fade_image(&image, 1.0, 0.0), image);
    }

    #[test]
    fn prop_fade_to_zero_keeps_alpha(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>()) {
        let image = RgbaImage::from_pixel(1, 1, Rgba([r, g, b, a]));
        let faded = fade_image(&image, 0.0, 0.0);
        prop_assert_eq!(faded.get_pixel(0, 0).0, [0, 0, 0, a]);
    }

    #[test]
    fn prop_full_fade_reaches_target(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>(), t in any::<u8>()) {
        let image = RgbaImage::from_pixel(1, 1, Rgba([r, g, b, a]));
        let faded = fade_image(&image, 0.0, f32::from(t));
        prop_assert_eq!(faded.get_pixel(0, 0).0, [t, t, t, a]);
    }
}
