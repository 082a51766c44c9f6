//! Asset key derivation.
//!
//! Every function here is pure: the same request always produces the same
//! key. Static assets end in `.image`; synthesized images live under the
//! `dynamic.` namespace and embed everything that affects their pixels.

use crate::color::Rgb;
use crate::model::{
    is_default_role_id, role_suffix, BuildingType, Direction, FoundingFather, GoodsType, Nation,
    PathType, Player, ResourceType, SettlementType, TileImprovementStyle, TileType, UnitType,
};
use std::fmt;

/// Key of the unit selection cursor.
pub const UNIT_SELECT: &str = "unitSelect.image";
/// Key of the delete icon.
pub const DELETE: &str = "delete.image";
/// Key of the plowed-land overlay.
pub const PLOWED: &str = "model.improvement.plow.image";
/// Key of the marker for tiles worked by another settlement.
pub const TILE_TAKEN: &str = "tileTaken.image";
/// Key of the marker for native-owned land.
pub const TILE_OWNED_BY_INDIANS: &str = "nativeLand.image";
/// Key of the lost city rumour marker.
pub const LOST_CITY_RUMOUR: &str = "lostCityRumour.image";
/// Key of the fog-of-war halo.
pub const DARKNESS: &str = "halo.dark.image";
/// Key of the liberty bell icon.
pub const BELLS: &str = "model.goods.bells.image";

const UNEXPLORED: &str = "model.tile.unexplored";

/// A resource store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey(String);

impl AssetKey {
    /// Wrap an already formatted key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for keys of synthesized images.
    pub fn is_dynamic(&self) -> bool {
        self.0.starts_with("dynamic.")
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Tile parity used to alternate art and avoid stripes or a checker board.
///
/// Remainders keep the sign of the dividend, so every row with a negative
/// `y` counts as even. Existing art sets are laid out against that rule.
pub fn is_even(x: i32, y: i32) -> bool {
    y % 8 <= 2 || x.wrapping_add(y) % 2 == 0
}

fn parity(x: i32, y: i32) -> &'static str {
    if is_even(x, y) {
        "_even"
    } else {
        "_odd"
    }
}

/// The 31-polynomial string hash over UTF-16 code units with wrapping `i32`
/// arithmetic. Stable across processes and platforms.
pub fn stable_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Pick one of `count` variants for `seed`, or `None` when there are none.
pub fn variant_index(seed: &str, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let count = i64::try_from(count).ok()?;
    let index = (i64::from(stable_hash(seed)) % count).unsigned_abs();
    usize::try_from(index).ok()
}

/// Hexadecimal rendering of a scale factor (`1.0` is `0x1.0p0`).
///
/// Used inside keys so that distinct scales never collide through decimal
/// rounding.
pub fn scale_hex(scale: f32) -> String {
    if scale.is_nan() {
        return "NaN".to_string();
    }
    if scale.is_infinite() {
        return if scale > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let bits = scale.to_bits();
    let sign = if bits >> 31 == 1 { "-" } else { "" };
    let exponent = ((bits >> 23) & 0xff) as i32;
    let mantissa = bits & 0x7f_ffff;
    if exponent == 0 && mantissa == 0 {
        return format!("{sign}0x0.0p0");
    }
    // 23 mantissa bits, left-aligned into 24 so they print as six hex digits.
    let digits = format!("{:06x}", mantissa << 1);
    let trimmed = digits.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };
    if exponent == 0 {
        format!("{sign}0x0.{fraction}p-126")
    } else {
        format!("{sign}0x1.{fraction}p{}", exponent - 127)
    }
}

/// Key of the plain image of any game object type.
pub fn type_image(type_id: &str) -> AssetKey {
    AssetKey(format!("{type_id}.image"))
}

/// Key of a unit image.
///
/// The role qualifier is omitted for the default role; the `.native` part
/// is never used for types that can only be born native.
pub fn unit_image(unit_type: &UnitType, role_id: &str, native_ethnicity: bool) -> AssetKey {
    let native = native_ethnicity && !unit_type.born_in_indian_settlement;
    AssetKey(format!(
        "{}{}{}.image",
        unit_type.id,
        role_qualifier(role_id),
        if native { ".native" } else { "" }
    ))
}

/// Key of the non-native fallback for a unit image.
pub fn unit_image_fallback(unit_type: &UnitType, role_id: &str) -> AssetKey {
    unit_image(unit_type, role_id, false)
}

fn role_qualifier(role_id: &str) -> String {
    if is_default_role_id(role_id) {
        String::new()
    } else {
        format!(".{}", role_suffix(role_id))
    }
}

/// Key of the base terrain image of a tile type at a map position.
pub fn terrain(tile_type: Option<&TileType>, x: i32, y: i32) -> AssetKey {
    let id = tile_type.map_or(UNEXPLORED, |t| t.id.as_str());
    let variant = if is_even(x, y) { "0" } else { "1" };
    AssetKey(format!("{id}.center{variant}.image"))
}

/// Key of the border blended towards a neighbour in `direction`.
pub fn border(tile_type: Option<&TileType>, direction: Direction, x: i32, y: i32) -> AssetKey {
    let id = tile_type.map_or(UNEXPLORED, |t| t.id.as_str());
    AssetKey(format!("{id}.border_{direction}{}.image", parity(x, y)))
}

/// Key of a beach corner piece.
pub fn beach_corner(index: u32, x: i32, y: i32) -> AssetKey {
    AssetKey(format!("model.tile.beach.corner{index}{}", parity(x, y)))
}

/// Key of a beach edge piece.
pub fn beach_edge(index: u32, x: i32, y: i32) -> AssetKey {
    AssetKey(format!("model.tile.beach.edge{index}{}", parity(x, y)))
}

/// Key of a forest layer, optionally cut around a river.
pub fn forest(tile_type: &TileType, river: Option<&TileImprovementStyle>) -> AssetKey {
    match river {
        Some(style) => AssetKey(format!("{}.forest{}", tile_type.id, style.mask)),
        None => AssetKey(format!("{}.forest", tile_type.id)),
    }
}

/// Prefix of the overlay variant family of a tile type.
pub fn overlay_prefix(tile_type: &TileType) -> String {
    format!("{}.overlay", tile_type.id)
}

/// Key of numbered variant `index` within a family.
pub fn variant(prefix: &str, index: usize) -> AssetKey {
    AssetKey(format!("{prefix}{index}.image"))
}

/// Key of a river piece.
pub fn river(style: &str) -> AssetKey {
    AssetKey(format!("model.tile.river{style}"))
}

/// Key of a river delta flowing out in `direction`.
pub fn river_mouth(direction: Direction, magnitude: u32) -> AssetKey {
    let size = if magnitude == 1 { "_small" } else { "_large" };
    AssetKey(format!("model.tile.delta_{direction}{size}"))
}

/// Key of a tile bonus resource.
pub fn bonus(resource: &ResourceType) -> AssetKey {
    type_image(&resource.id)
}

/// Key of a nation's coat of arms.
pub fn coat_of_arms(nation: &Nation) -> AssetKey {
    type_image(&nation.id)
}

/// Key of a nation's monarch portrait.
pub fn monarch(nation: &Nation) -> AssetKey {
    AssetKey(format!("{}.monarch.image", nation.id))
}

/// Key of a goods icon.
pub fn goods(goods_type: &GoodsType) -> AssetKey {
    type_image(&goods_type.id)
}

/// Key of the national variant of a building.
pub fn national_building(building_type: &BuildingType, owner: &Player) -> AssetKey {
    AssetKey(format!("{}.{}.image", building_type.id, owner.nation_name_key()))
}

/// Key of the generic variant of a building.
pub fn building(building_type: &BuildingType) -> AssetKey {
    type_image(&building_type.id)
}

/// Key of a founding father portrait.
pub fn founding_father(father: &FoundingFather) -> AssetKey {
    type_image(&father.id)
}

/// Key of a settlement type's generic image.
pub fn settlement_type(settlement_type: &SettlementType) -> AssetKey {
    type_image(&settlement_type.id)
}

/// Key of the path marker for a movement class.
pub fn path(path_type: PathType) -> AssetKey {
    AssetKey(format!("path.{}.image", path_type.key()))
}

/// Key of the path marker shown where next turn's movement begins.
pub fn path_next_turn(path_type: PathType) -> AssetKey {
    AssetKey(format!("path.{}.nextTurn.image", path_type.key()))
}

/// Key of the alarm chip of a native settlement.
pub fn alarm_chip(text: &str, owner: Rgb, amount: u8, enemy: Rgb, scale: f32) -> AssetKey {
    AssetKey(format!(
        "dynamic.alarm.{text}.{}.{amount}.{}.{}",
        owner.argb_hex(),
        enemy.argb_hex(),
        scale_hex(scale)
    ))
}

/// Key of the capital/normal chip of a native settlement.
pub fn settlement_chip(text: &str, background: Rgb, scale: f32) -> AssetKey {
    AssetKey(format!(
        "dynamic.indianSettlement.{text}.{}.{}",
        background.argb_hex(),
        scale_hex(scale)
    ))
}

/// Key of the mission chip.
pub fn mission_chip(expert: bool, background: Rgb, scale: f32) -> AssetKey {
    AssetKey(format!(
        "dynamic.mission.{}.{}.{}",
        if expert { "expert" } else { "normal" },
        background.argb_hex(),
        scale_hex(scale)
    ))
}

/// Key of a unit occupation indicator chip.
pub fn occupation_chip(text: &str, background: Rgb, foreground: Rgb, scale: f32) -> AssetKey {
    AssetKey(format!(
        "dynamic.occupationIndicator.{text}.{}.{}.{}",
        background.argb_hex(),
        foreground.argb_hex(),
        scale_hex(scale)
    ))
}

/// Key of an arbitrary chip; every input that affects pixels is embedded.
pub fn chip(
    text: &str,
    border: Rgb,
    background: Rgb,
    foreground: Rgb,
    fill: Option<(f64, Rgb)>,
    scale: f32,
) -> AssetKey {
    let fill = match fill {
        Some((amount, color)) => format!("{amount}.{}", color.argb_hex()),
        None => "none".to_string(),
    };
    AssetKey(format!(
        "dynamic.chip.{text}.{}.{}.{}.{fill}.{}",
        border.argb_hex(),
        background.argb_hex(),
        foreground.argb_hex(),
        scale_hex(scale)
    ))
}

/// Key of an outlined string image.
pub fn string_image(text: &str, font_name: &str, font_size: u32, color: Rgb) -> AssetKey {
    AssetKey(format!(
        "dynamic.stringImage.{text}.{}.{font_size}.{}",
        font_name.replace(' ', "-"),
        color.argb_hex()
    ))
}

/// Key of a composited terrain image.
pub fn compound_terrain(tile_type: &TileType, scale: f32) -> AssetKey {
    AssetKey(format!(
        "dynamic.compoundTerrain.{}.{}",
        tile_type.id,
        scale_hex(scale)
    ))
}

/// Key of a faded rendition of another asset.
pub fn faded(source: &AssetKey, fade: f32, target: f32, scale: f32) -> AssetKey {
    AssetKey(format!(
        "dynamic.faded.{source}.{}.{}.{}",
        scale_hex(fade),
        scale_hex(target),
        scale_hex(scale)
    ))
}
