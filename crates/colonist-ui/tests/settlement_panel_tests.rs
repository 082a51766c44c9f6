use colonist_core::{
    GoodsType, IndianSettlement, Nation, Player, Rgb, Settlement, SettlementType, Tension, Unit,
    UnitType,
};
use colonist_media::{ImageLibrary, MemoryResourceStore, ResourceStore};
use colonist_ui::{Messages, SettlementPanel, SettlementReport, UnitLabel};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

fn solid(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([90, 140, 60, 255]))
}

fn dutch() -> Player {
    Player::new("player:1", Nation::new("model.nation.dutch"), Rgb::new(255, 128, 0))
}

fn setup() -> (ImageLibrary, Messages) {
    let store = Arc::new(MemoryResourceStore::new());
    for (key, value) in [
        ("indianSettlement.nameUnknown", "Unknown"),
        ("indianSettlement", "%nation% settlement"),
        ("indianCapital", "%nation% capital"),
        ("model.nation.sioux.name", "Sioux"),
        ("model.nation.dutch.name", "Dutch"),
        ("model.nation.french.name", "French"),
        ("model.tension.unknown", "unknown"),
        ("model.tension.content", "content"),
        ("unscoutedIndianSettlement", "unscouted"),
        ("indianSettlement.skillUnknown", "Skill unknown"),
        ("indianSettlement.mostHatedUnknown", "Hatred unknown"),
        ("indianSettlement.wantedGoodsUnknown", "Wants unknown"),
        ("indianSettlement.wantedGoodsNone", "Nothing"),
        ("model.unit.expertFurTrapper.name", "Expert Fur Trapper"),
        ("model.unit.jesuitMissionary.name", "Jesuit Missionary"),
        ("model.goods.rum.name", "Rum"),
        ("model.goods.cloth.name", "Cloth"),
        ("model.goods.tools.name", "Tools"),
    ] {
        store.insert_string(key, value);
    }
    store.insert_image("model.settlement.camp.image", solid(60, 40));
    store.insert_image("model.unit.expertFurTrapper.image", solid(30, 30));
    store.insert_image("model.unit.jesuitMissionary.image", solid(30, 30));
    store.insert_image("model.nation.french.image", solid(30, 45));
    store.insert_image("model.goods.rum.image", solid(20, 20));
    store.insert_image("model.goods.cloth.image", solid(20, 20));
    store.insert_image("model.goods.tools.image", solid(20, 20));

    let store: Arc<dyn ResourceStore> = store;
    (ImageLibrary::new(store.clone()), Messages::new(store))
}

fn camp(capital: bool) -> IndianSettlement {
    let sioux = Player::new("player:9", Nation::new("model.nation.sioux"), Rgb::new(200, 50, 50));
    let mut settlement = IndianSettlement::new(Settlement {
        id: "settlement:7".into(),
        name: "Wakpa".into(),
        settlement_type: SettlementType {
            id: "model.settlement.camp".into(),
            capital,
        },
        owner: sioux,
        image_key: "model.settlement.camp.image".into(),
    });
    settlement.learnable_skill = Some(UnitType::new("model.unit.expertFurTrapper"));
    settlement.most_hated = Some(Player::new(
        "player:2",
        Nation::new("model.nation.french"),
        Rgb::new(0, 0, 200),
    ));
    settlement.wanted_goods = vec![
        Some(GoodsType::new("model.goods.rum")),
        Some(GoodsType::new("model.goods.cloth")),
        Some(GoodsType::new("model.goods.tools")),
    ];
    settlement
}

#[test]
fn test_unknown_settlement_hides_everything() {
    let (library, messages) = setup();
    let report = SettlementReport::build(&camp(false), &dutch(), &library, &messages);

    assert_eq!(report.header.text, "Unknown, Sioux settlement (unknown,unscouted)");
    assert!(report.header.image.is_some());
    assert!(report.missionary.is_none());

    assert_eq!(report.learnable_skill.entries[0].text, "Skill unknown");
    assert!(report.learnable_skill.entries[0].image.is_none());
    assert_eq!(report.most_hated.entries[0].text, "Hatred unknown");
    assert!(report.most_hated.entries[0].image.is_none());

    assert_eq!(report.highly_wanted.entries.len(), 1);
    assert_eq!(report.other_wanted.entries.len(), 1);
    assert_eq!(report.other_wanted.entries[0].text, "Wants unknown");
    assert!(report.other_wanted.entries[0].image.is_none());
}

#[test]
fn test_contacted_but_unvisited() {
    let (library, messages) = setup();
    let player = dutch();
    let mut settlement = camp(true);
    settlement.contacted.insert(player.id.clone());
    settlement.scouted.insert(player.id.clone());
    settlement.alarm.insert(player.id.clone(), Tension::Content);

    let report = SettlementReport::build(&settlement, &player, &library, &messages);
    assert_eq!(report.header.text, "Wakpa, Sioux capital (content)");
    assert_eq!(report.most_hated.entries[0].text, "French");
    assert!(report.most_hated.entries[0].image.is_some());
    assert!(report.learnable_skill.entries[0].image.is_none());
    assert!(report.highly_wanted.entries[0].image.is_none());
}

#[test]
fn test_visited_settlement_shows_all_wanted_goods() {
    let (library, messages) = setup();
    let player = dutch();
    let mut settlement = camp(false);
    settlement.contacted.insert(player.id.clone());
    settlement.visited.insert(player.id.clone());
    settlement.missionary = Some(Unit::new(
        "unit:3",
        UnitType::new("model.unit.jesuitMissionary"),
        player.clone(),
    ));

    let report = SettlementReport::build(&settlement, &player, &library, &messages);
    let missionary = report.missionary.as_ref().unwrap();
    assert_eq!(missionary.text, "Dutch Jesuit Missionary");
    assert_eq!(missionary.image.as_ref().unwrap().dimensions(), (20, 20));

    let skill = &report.learnable_skill.entries[0];
    assert_eq!(skill.text, "Expert Fur Trapper");
    assert_eq!(skill.image.as_ref().unwrap().dimensions(), (20, 20));

    assert_eq!(report.highly_wanted.entries[0].text, "Rum");
    let other: Vec<_> = report.other_wanted.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(other, ["Cloth", "Tools"]);
    assert!(report.other_wanted.entries.iter().all(|e| e.image.is_some()));
}

#[test]
fn test_visited_with_gaps_in_wanted_goods() {
    let (library, messages) = setup();
    let player = dutch();
    let mut settlement = camp(false);
    settlement.visited.insert(player.id.clone());
    settlement.wanted_goods = vec![None, Some(GoodsType::new("model.goods.cloth"))];

    let report = SettlementReport::build(&settlement, &player, &library, &messages);
    assert_eq!(report.highly_wanted.entries[0].text, "Nothing");
    assert!(report.highly_wanted.entries[0].image.is_none());
    assert!(report.other_wanted.entries.is_empty());
}

#[test]
fn test_panel_opens_with_report() {
    let (library, messages) = setup();
    let report = SettlementReport::build(&camp(false), &dutch(), &library, &messages);
    let mut panel = SettlementPanel::default();
    assert!(panel.report().is_none());
    panel.open(report);
    assert!(panel.visible);
    assert!(panel.report().is_some());
    assert_eq!(panel.take_action(), None);
}

#[test]
fn test_small_unit_label_icon_is_half_size() {
    let (library, _) = setup();
    let mut label = UnitLabel::new(Unit::new(
        "unit:4",
        UnitType::new("model.unit.expertFurTrapper"),
        dutch(),
    ));
    assert_eq!(label.icon(&library).unwrap().dimensions(), (30, 30));
    label.set_small(true);
    assert_eq!(label.icon(&library).unwrap().dimensions(), (15, 15));
}
