use colonist_core::keys::{self, variant_index};
use colonist_core::model::{BuildingType, Nation, Player, TileImprovementStyle, TileType};
use colonist_core::{PathType, Rgb};
use proptest::prelude::*;

#[test]
fn test_building_keys_use_nation_name_key() {
    let player = Player::new("player:1", Nation::new("model.nation.french"), Rgb::new(0, 0, 255));
    let dock = BuildingType {
        id: "model.building.docks".to_string(),
    };
    assert_eq!(
        keys::national_building(&dock, &player).as_str(),
        "model.building.docks.model.nation.french.name.image"
    );
    assert_eq!(keys::building(&dock).as_str(), "model.building.docks.image");
}

#[test]
fn test_forest_keys_with_and_without_river() {
    let mut woods = TileType::new("model.tile.mixedForest");
    woods.forested = true;
    assert_eq!(keys::forest(&woods, None).as_str(), "model.tile.mixedForest.forest");
    let style = TileImprovementStyle {
        style: "0101".to_string(),
        mask: "0101".to_string(),
    };
    assert_eq!(
        keys::forest(&woods, Some(&style)).as_str(),
        "model.tile.mixedForest.forest0101"
    );
    assert_eq!(keys::overlay_prefix(&woods), "model.tile.mixedForest.overlay");
    assert_eq!(
        keys::variant("model.tile.mixedForest.overlay", 2).as_str(),
        "model.tile.mixedForest.overlay2.image"
    );
}

#[test]
fn test_path_keys() {
    assert_eq!(keys::path(PathType::Naval).as_str(), "path.naval.image");
    assert_eq!(
        keys::path_next_turn(PathType::Wagon).as_str(),
        "path.wagon.nextTurn.image"
    );
}

#[test]
fn test_alarm_chip_key_embeds_all_inputs() {
    let a = keys::alarm_chip("!", Rgb::new(200, 50, 50), 3, Rgb::BLACK, 1.0);
    let b = keys::alarm_chip("!", Rgb::new(200, 50, 50), 4, Rgb::BLACK, 1.0);
    let c = keys::alarm_chip("!", Rgb::new(200, 50, 50), 3, Rgb::BLACK, 2.0);
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.as_str(), "dynamic.alarm.!.ffc83232.3.ff000000.0x1.0p0");
}

proptest! {
    #[test]
    fn prop_key_derivation_is_pure(id in "[a-z.]{1,24}", x in 0i32..200, y in 0i32..200) {
        let tile_type = TileType::new(id);
        prop_assert_eq!(keys::terrain(Some(&tile_type), x, y), keys::terrain(Some(&tile_type), x, y));
    }

    #[test]
    fn prop_variant_index_is_stable_and_in_range(seed in ".{0,32}", count in 1usize..64) {
        let first = variant_index(&seed, count).unwrap();
        prop_assert!(first < count);
        prop_assert_eq!(Some(first), variant_index(&seed, count));
    }
}
