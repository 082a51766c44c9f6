//! The image library: resolves typed requests from the map view and panels
//! into images.
//!
//! Static assets come straight from the [`ResourceStore`]. Derived images
//! (chips, outlined strings, faded and composited images) are synthesized on
//! first use and kept in a bounded [`DerivedImageCache`] under a key that
//! embeds every input affecting their pixels.

use crate::cache::{CacheStats, DerivedImageCache};
use crate::chip::{render_chip, ChipFill, ChipStyle};
use crate::config::LibraryConfig;
use crate::font::{BitmapFont, Font};
use crate::imaging::{compose_bottom_aligned, draw_tiled, fade_image, Insets, TileArea};
use crate::outline::render_outlined;
use crate::store::ResourceStore;
use crate::variants::VariantCounter;
use crate::{Image, MediaError, Result};
use colonist_core::keys::{self, AssetKey};
use colonist_core::model::{
    Building, BuildingType, Direction, DisplayObject, FoundingFather, GoodsType, IndianSettlement,
    Nation, PathType, Player, ResourceType, Settlement, SettlementType, Tile,
    TileImprovementStyle, TileType, Unit, UnitState, UnitType,
};
use colonist_core::{check_scale, Rgb};
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, warn};

/// String keys of chip labels, with the label used when the store lacks one.
const CAPITAL_CHIP: (&str, &str) = ("indianSettlementChip.capital", "*");
const NORMAL_CHIP: (&str, &str) = ("indianSettlementChip.normal", "-");
const CONTACTED_CHIP: (&str, &str) = ("indianAlarmChip.contacted", "?");
const SCOUTED_CHIP: (&str, &str) = ("indianAlarmChip.scouted", "!");
const CROSS: (&str, &str) = ("cross", "\u{2020}");

/// Resolves game entities into images at a fixed scale factor.
///
/// Libraries created with [`ImageLibrary::with_scale`] share the store and
/// all caches with their parent.
pub struct ImageLibrary {
    store: Arc<dyn ResourceStore>,
    scale: f32,
    config: LibraryConfig,
    derived: Arc<DerivedImageCache>,
    variants: Arc<VariantCounter>,
}

impl ImageLibrary {
    /// Create a library at scale 1.
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self::with_config(store, LibraryConfig::default())
    }

    /// Create a library at scale 1 with custom tuning.
    pub fn with_config(store: Arc<dyn ResourceStore>, config: LibraryConfig) -> Self {
        let derived = Arc::new(DerivedImageCache::new(config.derived_cache_capacity));
        Self {
            store,
            scale: 1.0,
            config,
            derived,
            variants: Arc::new(VariantCounter::new()),
        }
    }

    /// A library drawing at `scale` that shares this one's store and caches.
    pub fn with_scale(&self, scale: f32) -> Result<Self> {
        Ok(Self {
            store: Arc::clone(&self.store),
            scale: check_scale(scale)?,
            config: self.config.clone(),
            derived: Arc::clone(&self.derived),
            variants: Arc::clone(&self.variants),
        })
    }

    /// The scale factor every unqualified request is drawn at.
    pub fn scale_factor(&self) -> f32 {
        self.scale
    }

    /// Scale of "small" images.
    pub fn small_scale(&self) -> f32 {
        self.scale * self.config.small_scale_ratio
    }

    /// The backing resource store.
    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Counters of the derived image cache.
    pub fn derived_stats(&self) -> CacheStats {
        self.derived.stats()
    }

    /// Forget every derived image and variant count. Call after the resource
    /// store has been changed behind the library's back.
    pub fn reload_hook(&self) {
        self.derived.clear();
        self.variants.clear();
        debug!("image library caches reset");
    }

    /// Drop one derived image so the next request synthesizes it again.
    pub fn invalidate(&self, key: &AssetKey) -> bool {
        self.derived.invalidate(key)
    }

    // ========================================================================
    // Static assets
    // ========================================================================

    /// Look up a static asset at `scale`. A missing asset is not an error:
    /// it is logged and `None` is returned.
    pub fn static_image(&self, key: &AssetKey, scale: f32) -> Option<Image> {
        let image = self.store.image(key.as_str(), scale);
        if image.is_none() {
            debug!(%key, scale, "image not found");
        }
        image
    }

    /// Look up a static asset resampled to `size`.
    pub fn static_image_sized(&self, key: &AssetKey, size: (u32, u32)) -> Option<Image> {
        let image = self.store.image_sized(key.as_str(), size);
        if image.is_none() {
            debug!(%key, ?size, "image not found");
        }
        image
    }

    /// Look up a desaturated static asset.
    pub fn grayscale_image(&self, key: &AssetKey, scale: f32) -> Option<Image> {
        let image = self.store.grayscale_image(key.as_str(), scale);
        if image.is_none() {
            debug!(%key, scale, "grayscale image not found");
        }
        image
    }

    /// Image of any typed game object, by `<id>.image`.
    pub fn type_image(&self, type_id: &str) -> Option<Image> {
        self.static_image(&keys::type_image(type_id), self.scale)
    }

    /// Image registered under an arbitrary key, at the library scale.
    pub fn misc_image(&self, key: &str) -> Option<Image> {
        self.misc_image_scaled(key, self.scale)
    }

    pub fn misc_image_scaled(&self, key: &str, scale: f32) -> Option<Image> {
        self.static_image(&AssetKey::new(key), scale)
    }

    // ========================================================================
    // Units
    // ========================================================================

    /// Image of a unit type in a role.
    ///
    /// The `.native` variant is tried first for units of native ethnicity and
    /// falls back to the ordinary key when the store lacks it.
    pub fn unit_image(
        &self,
        unit_type: &UnitType,
        role_id: &str,
        native_ethnicity: bool,
        grayscale: bool,
        scale: f32,
    ) -> Option<Image> {
        let mut key = keys::unit_image(unit_type, role_id, native_ethnicity);
        if native_ethnicity && !self.store.has(key.as_str()) {
            key = keys::unit_image_fallback(unit_type, role_id);
        }
        let image = if grayscale {
            self.store.grayscale_image(key.as_str(), scale)
        } else {
            self.store.image(key.as_str(), scale)
        };
        if image.is_none() {
            warn!(
                unit_type = %unit_type.id,
                role = role_id,
                native = native_ethnicity,
                gray = grayscale,
                scale,
                %key,
                "no image icon for unit"
            );
        }
        image
    }

    /// Image of a unit in its current role.
    pub fn unit_image_for(&self, unit: &Unit, grayscale: bool) -> Option<Image> {
        self.unit_image_scaled(unit, grayscale, self.scale)
    }

    pub fn unit_image_scaled(&self, unit: &Unit, grayscale: bool, scale: f32) -> Option<Image> {
        self.unit_image(
            &unit.unit_type,
            &unit.role_id,
            unit.native_ethnicity,
            grayscale,
            scale,
        )
    }

    /// Image of a unit at the small scale.
    pub fn small_unit_image(&self, unit: &Unit, grayscale: bool) -> Option<Image> {
        self.unit_image_scaled(unit, grayscale, self.small_scale())
    }

    /// Image of a unit type in its display role.
    pub fn unit_type_image(&self, unit_type: &UnitType) -> Option<Image> {
        self.unit_type_image_scaled(unit_type, self.scale)
    }

    pub fn unit_type_image_scaled(&self, unit_type: &UnitType, scale: f32) -> Option<Image> {
        self.unit_image(unit_type, &unit_type.display_role_id, false, false, scale)
    }

    // ========================================================================
    // Terrain
    // ========================================================================

    /// Base terrain image; unexplored tiles use the unexplored art.
    pub fn terrain_image(&self, tile_type: Option<&TileType>, x: i32, y: i32) -> Option<Image> {
        self.terrain_image_scaled(tile_type, x, y, self.scale)
    }

    pub fn terrain_image_scaled(
        &self,
        tile_type: Option<&TileType>,
        x: i32,
        y: i32,
        scale: f32,
    ) -> Option<Image> {
        self.static_image(&keys::terrain(tile_type, x, y), scale)
    }

    pub fn border_image(
        &self,
        tile_type: Option<&TileType>,
        direction: Direction,
        x: i32,
        y: i32,
    ) -> Option<Image> {
        self.static_image(&keys::border(tile_type, direction, x, y), self.scale)
    }

    pub fn beach_corner_image(&self, index: u32, x: i32, y: i32) -> Option<Image> {
        self.static_image(&keys::beach_corner(index, x, y), self.scale)
    }

    pub fn beach_edge_image(&self, index: u32, x: i32, y: i32) -> Option<Image> {
        self.static_image(&keys::beach_edge(index, x, y), self.scale)
    }

    /// Forest layer, cut around a river when one flows through the tile.
    pub fn forest_image(
        &self,
        tile_type: &TileType,
        river: Option<&TileImprovementStyle>,
    ) -> Option<Image> {
        self.forest_image_scaled(tile_type, river, self.scale)
    }

    pub fn forest_image_scaled(
        &self,
        tile_type: &TileType,
        river: Option<&TileImprovementStyle>,
        scale: f32,
    ) -> Option<Image> {
        self.static_image(&keys::forest(tile_type, river), scale)
    }

    /// Pseudo-random overlay for a tile, stable for the tile's id.
    pub fn overlay_image(&self, tile: &Tile) -> Option<Image> {
        let tile_type = tile.tile_type.as_ref()?;
        self.overlay_image_for(tile_type, &tile.id, self.scale)
    }

    pub fn overlay_image_for(&self, tile_type: &TileType, seed: &str, scale: f32) -> Option<Image> {
        self.randomized_image(&keys::overlay_prefix(tile_type), seed, scale)
    }

    /// Pick variant `|hash(seed) % N|` of the family `<prefix>N.image`, where
    /// N is the number of store keys under `prefix`.
    pub fn randomized_image(&self, prefix: &str, seed: &str, scale: f32) -> Option<Image> {
        let index = self.variants.pick(self.store.as_ref(), prefix, seed)?;
        let key = keys::variant(prefix, index);
        if !self.store.has(key.as_str()) {
            debug!(prefix, seed, %key, "variant not present");
            return None;
        }
        self.static_image(&key, scale)
    }

    pub fn river_image(&self, style: &TileImprovementStyle) -> Option<Image> {
        self.river_image_scaled(&style.style, self.scale)
    }

    pub fn river_image_scaled(&self, style: &str, scale: f32) -> Option<Image> {
        self.static_image(&keys::river(style), scale)
    }

    pub fn river_mouth_image(&self, direction: Direction, magnitude: u32) -> Option<Image> {
        self.static_image(&keys::river_mouth(direction, magnitude), self.scale)
    }

    pub fn bonus_image(&self, resource: &ResourceType) -> Option<Image> {
        self.bonus_image_scaled(resource, self.scale)
    }

    pub fn bonus_image_scaled(&self, resource: &ResourceType, scale: f32) -> Option<Image> {
        self.static_image(&keys::bonus(resource), scale)
    }

    /// Terrain, overlay and forest of a tile type stacked into one image,
    /// each layer aligned to the bottom edge.
    ///
    /// Without overlay or forest this is simply the terrain image.
    pub fn compound_terrain_image(&self, tile_type: &TileType, scale: f32) -> Option<Image> {
        let terrain = self.terrain_image_scaled(Some(tile_type), 0, 0, scale)?;
        let overlay = self.overlay_image_for(tile_type, &tile_type.id, scale);
        let forest = if tile_type.forested {
            self.forest_image_scaled(tile_type, None, scale)
        } else {
            None
        };
        if overlay.is_none() && forest.is_none() {
            return Some(terrain);
        }

        let key = keys::compound_terrain(tile_type, scale);
        self.derive_cached(&key, || {
            let mut layers: Vec<&RgbaImage> = vec![&terrain];
            layers.extend(overlay.as_deref());
            layers.extend(forest.as_deref());
            compose_bottom_aligned(&layers)
                .ok_or_else(|| MediaError::Synthesis(format!("no layers for {key}")))
        })
    }

    /// Height the compound terrain image of `tile_type` would have.
    pub fn compound_terrain_height(&self, tile_type: Option<&TileType>) -> Option<u32> {
        let mut height = self.terrain_image(tile_type, 0, 0)?.height();
        if let Some(tile_type) = tile_type {
            if let Some(overlay) = self.overlay_image_for(tile_type, &tile_type.id, self.scale) {
                height = height.max(overlay.height());
            }
            if tile_type.forested {
                if let Some(forest) = self.forest_image(tile_type, None) {
                    height = height.max(forest.height());
                }
            }
        }
        Some(height)
    }

    // ========================================================================
    // Goods, buildings, nations and settlements
    // ========================================================================

    pub fn goods_image(&self, goods_type: &GoodsType) -> Option<Image> {
        self.goods_image_scaled(goods_type, self.scale)
    }

    pub fn goods_image_scaled(&self, goods_type: &GoodsType, scale: f32) -> Option<Image> {
        self.static_image(&keys::goods(goods_type), scale)
    }

    pub fn goods_image_sized(&self, goods_type: &GoodsType, size: (u32, u32)) -> Option<Image> {
        self.static_image_sized(&keys::goods(goods_type), size)
    }

    pub fn bells_image(&self, scale: f32) -> Option<Image> {
        self.static_image(&AssetKey::new(keys::BELLS), scale)
    }

    /// Building art, preferring the owner's national variant.
    pub fn building_image(&self, building: &Building) -> Option<Image> {
        self.building_type_image(&building.building_type, &building.owner, self.scale)
    }

    pub fn building_type_image(
        &self,
        building_type: &BuildingType,
        owner: &Player,
        scale: f32,
    ) -> Option<Image> {
        let national = keys::national_building(building_type, owner);
        let key = if self.store.has(national.as_str()) {
            national
        } else {
            keys::building(building_type)
        };
        self.static_image(&key, scale)
    }

    /// Founding father portrait, drawn at its natural size.
    pub fn founding_father_image(&self, father: &FoundingFather, grayscale: bool) -> Option<Image> {
        let key = keys::founding_father(father);
        if grayscale {
            self.grayscale_image(&key, 1.0)
        } else {
            self.static_image(&key, 1.0)
        }
    }

    pub fn coat_of_arms_image(&self, nation: &Nation) -> Option<Image> {
        self.coat_of_arms_image_scaled(nation, self.scale)
    }

    pub fn coat_of_arms_image_scaled(&self, nation: &Nation, scale: f32) -> Option<Image> {
        self.static_image(&keys::coat_of_arms(nation), scale)
    }

    pub fn coat_of_arms_image_sized(&self, nation: &Nation, size: (u32, u32)) -> Option<Image> {
        self.static_image_sized(&keys::coat_of_arms(nation), size)
    }

    pub fn monarch_image(&self, nation: &Nation) -> Option<Image> {
        self.static_image(&keys::monarch(nation), 1.0)
    }

    /// Image reflecting a settlement's current size and stockade.
    pub fn settlement_image(&self, settlement: &Settlement) -> Option<Image> {
        self.settlement_image_scaled(settlement, self.scale)
    }

    pub fn settlement_image_scaled(&self, settlement: &Settlement, scale: f32) -> Option<Image> {
        self.static_image(&AssetKey::new(settlement.image_key.as_str()), scale)
    }

    pub fn settlement_image_sized(&self, settlement: &Settlement, size: (u32, u32)) -> Option<Image> {
        self.static_image_sized(&AssetKey::new(settlement.image_key.as_str()), size)
    }

    /// Generic image of a settlement type.
    pub fn settlement_type_image(&self, settlement_type: &SettlementType) -> Option<Image> {
        self.settlement_type_image_scaled(settlement_type, self.scale)
    }

    pub fn settlement_type_image_scaled(
        &self,
        settlement_type: &SettlementType,
        scale: f32,
    ) -> Option<Image> {
        self.static_image(&keys::settlement_type(settlement_type), scale)
    }

    pub fn path_image(&self, path_type: PathType) -> Option<Image> {
        self.static_image(&keys::path(path_type), 1.0)
    }

    pub fn path_image_for(&self, unit: Option<&Unit>) -> Option<Image> {
        self.path_image(PathType::for_unit(unit))
    }

    pub fn path_next_turn_image(&self, path_type: PathType) -> Option<Image> {
        self.static_image(&keys::path_next_turn(path_type), 1.0)
    }

    pub fn path_next_turn_image_for(&self, unit: Option<&Unit>) -> Option<Image> {
        self.path_next_turn_image(PathType::for_unit(unit))
    }

    // ========================================================================
    // Display objects
    // ========================================================================

    /// Image of anything a panel may show, at the library scale.
    pub fn object_image(&self, object: DisplayObject<'_>) -> Option<Image> {
        self.logged_object(object, self.scale)
    }

    /// Image of anything a panel may show, at the small scale.
    pub fn small_object_image(&self, object: DisplayObject<'_>) -> Option<Image> {
        self.logged_object(object, self.small_scale())
    }

    /// Like [`ImageLibrary::object_image`] at an explicit scale, reporting
    /// a miss as [`MediaError::MissingAsset`].
    pub fn try_object_image(&self, object: DisplayObject<'_>, scale: f32) -> Result<Image> {
        let scale = check_scale(scale)?;
        let image = match object {
            DisplayObject::Goods(goods) => self.goods_image_scaled(&goods.goods_type, scale),
            DisplayObject::GoodsType(goods_type) => self.goods_image_scaled(goods_type, scale),
            DisplayObject::Unit(unit) => self.unit_image_scaled(unit, false, scale),
            DisplayObject::UnitType(unit_type) => self.unit_type_image_scaled(unit_type, scale),
            DisplayObject::Settlement(settlement) => {
                self.settlement_image_scaled(settlement, scale)
            }
            DisplayObject::LostCityRumour(_) => self.misc_image_scaled(keys::LOST_CITY_RUMOUR, scale),
            DisplayObject::Player(player) => self.coat_of_arms_image_scaled(&player.nation, scale),
        };
        image.ok_or_else(|| MediaError::MissingAsset(object.to_string()))
    }

    fn logged_object(&self, object: DisplayObject<'_>, scale: f32) -> Option<Image> {
        match self.try_object_image(object, scale) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!("could not find image for {object}: {e}");
                None
            }
        }
    }

    // ========================================================================
    // Derived images
    // ========================================================================

    fn derive_cached<F>(&self, key: &AssetKey, synthesize: F) -> Option<Image>
    where
        F: FnOnce() -> Result<RgbaImage>,
    {
        self.derived.sync_generation(self.store.generation());
        let result = self.derived.get_or_try_insert_with(key, || {
            let image = synthesize()?;
            debug!(%key, width = image.width(), height = image.height(), "synthesized image");
            Ok(image)
        });
        match result {
            Ok(image) => {
                if self.config.publish_derived_images && !self.store.has(key.as_str()) {
                    self.store.put_image(key.as_str(), Arc::clone(&image));
                }
                Some(image)
            }
            Err(e) => {
                warn!(%key, "failed to synthesize image: {e}");
                None
            }
        }
    }

    fn chip_font(&self) -> BitmapFont {
        BitmapFont::for_scale(self.scale).bold()
    }

    fn chip_padding(&self) -> f32 {
        self.config.chip_padding * self.scale
    }

    fn label(&self, (key, default): (&str, &str)) -> String {
        self.store.string(key).unwrap_or_else(|| {
            debug!(key, "label missing, using default");
            default.to_string()
        })
    }

    /// A chip with `text` in `foreground` on `background`, framed by a one
    /// pixel `border`, optionally filled from the top by `fill`.
    pub fn derived_chip(
        &self,
        text: &str,
        border: Rgb,
        background: Rgb,
        foreground: Rgb,
        fill: Option<ChipFill>,
    ) -> Option<Image> {
        let style = ChipStyle {
            border,
            background,
            foreground,
            fill,
        };
        let key = keys::chip(text, border, background, foreground, style.fill_key(), self.scale);
        self.chip_with_key(&key, text, &style)
    }

    fn chip_with_key(&self, key: &AssetKey, text: &str, style: &ChipStyle) -> Option<Image> {
        self.derive_cached(key, || {
            render_chip(text, style, &self.chip_font(), self.chip_padding())
        })
    }

    /// Capital or normal chip of a native settlement in the owner's color.
    pub fn indian_settlement_chip(&self, settlement: &IndianSettlement) -> Option<Image> {
        let text = self.label(if settlement.is_capital() {
            CAPITAL_CHIP
        } else {
            NORMAL_CHIP
        });
        let background = settlement.owner().nation_color;
        let key = keys::settlement_chip(&text, background, self.scale);
        self.chip_with_key(&key, &text, &ChipStyle::on(background))
    }

    /// Alarm chip of a native settlement as seen by `observer`.
    ///
    /// The chip is filled with the most hated player's color in proportion to
    /// the alarm: fully when someone else is most hated, by the tension level
    /// (at least a quarter) when the observer is, and not at all when nobody
    /// is. Returns `None` until the observer has met the settlement.
    pub fn alarm_chip(&self, settlement: &IndianSettlement, observer: Option<&Player>) -> Option<Image> {
        let observer = observer.filter(|p| settlement.has_contacted(p))?;
        let owner_color = settlement.owner().nation_color;
        let enemy = settlement.most_hated.as_ref();
        let enemy_color = enemy.map_or(Rgb::UNKNOWN_NATION, |p| p.nation_color);

        let amount = match enemy {
            None => 0,
            Some(enemy) if enemy.id == observer.id => settlement
                .alarm_for(enemy)
                .map_or(4, |tension| tension.ordinal().max(1)),
            Some(_) => 4,
        };

        let text = self.label(if settlement.worth_scouting(observer) {
            CONTACTED_CHIP
        } else {
            SCOUTED_CHIP
        });
        let style = ChipStyle {
            border: Rgb::BLACK,
            background: owner_color,
            foreground: Rgb::foreground_for(Some(enemy_color)),
            fill: Some(ChipFill {
                amount: f64::from(amount) / 4.0,
                color: enemy_color,
            }),
        };
        let key = keys::alarm_chip(&text, owner_color, amount, enemy_color, self.scale);
        self.chip_with_key(&key, &text, &style)
    }

    /// Mission chip showing a cross in the missionary owner's color.
    pub fn mission_chip(&self, owner: &Player, expert: bool) -> Option<Image> {
        let background = owner.nation_color;
        let color_key = if expert {
            "mission.expert.foreground.color"
        } else {
            "mission.normal.foreground.color"
        };
        let foreground = self.store.color(color_key).unwrap_or(if expert {
            Rgb::BLACK
        } else {
            Rgb::GRAY
        });
        let text = self.label(CROSS);
        let style = ChipStyle {
            foreground,
            ..ChipStyle::on(background)
        };
        let key = keys::mission_chip(expert, background, self.scale);
        self.chip_with_key(&key, &text, &style)
    }

    /// Chip with a one-letter occupation code; fortified units get a gray
    /// label.
    pub fn occupation_indicator_chip(&self, unit: &Unit, text: &str) -> Option<Image> {
        let background = unit.owner.nation_color;
        let foreground = if unit.state == UnitState::Fortified {
            Rgb::GRAY
        } else {
            Rgb::foreground_for(Some(background))
        };
        let style = ChipStyle {
            foreground,
            ..ChipStyle::on(background)
        };
        let key = keys::occupation_chip(text, background, foreground, self.scale);
        self.chip_with_key(&key, text, &style)
    }

    /// `text` in `color` with a contrasting one pixel outline.
    ///
    /// A missing color is reported and replaced by white.
    pub fn string_image(&self, text: &str, color: Option<Rgb>, font: &dyn Font) -> Option<Image> {
        let color = color.unwrap_or_else(|| {
            warn!(text, "string image requested without a color, using white");
            Rgb::WHITE
        });
        let key = keys::string_image(text, font.name(), font.size(), color);
        self.derive_cached(&key, || render_outlined(text, color, font))
    }

    /// A copy of the asset under `source` with its RGB channels blended
    /// towards `target`; see [`crate::imaging::fade_image`].
    pub fn faded_image(&self, source: &AssetKey, fade: f32, target: f32) -> Option<Image> {
        let original = self.static_image(source, self.scale)?;
        let key = keys::faded(source, fade, target, self.scale);
        self.derive_cached(&key, || Ok(fade_image(&original, fade, target)))
    }

    // ========================================================================
    // Tiling
    // ========================================================================

    /// Cover `area` of `canvas` with repeats of the image under `resource`,
    /// or with `background` if there is no such image.
    pub fn draw_tiled_image(
        &self,
        resource: &str,
        canvas: &mut RgbaImage,
        area: TileArea,
        insets: Option<Insets>,
        background: Rgb,
    ) {
        let tile = self.store.image(resource, self.scale);
        if tile.is_none() {
            debug!(resource, "no tile image, filling with background");
        }
        draw_tiled(canvas, tile.as_deref(), area, insets, background);
    }
}

impl std::fmt::Debug for ImageLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLibrary")
            .field("scale", &self.scale)
            .field("config", &self.config)
            .field("derived", &self.derived)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryResourceStore;
    use colonist_core::model::Goods;

    fn tile(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]))
    }

    fn library() -> (Arc<MemoryResourceStore>, ImageLibrary) {
        let store = Arc::new(MemoryResourceStore::new());
        let library = ImageLibrary::new(store.clone());
        (store, library)
    }

    fn dutch() -> Player {
        Player::new("player:1", Nation::new("model.nation.dutch"), Rgb::new(255, 128, 0))
    }

    #[test]
    fn test_with_scale_validates() {
        let (_, library) = library();
        assert!(library.with_scale(0.0).is_err());
        let big = library.with_scale(2.0).unwrap();
        assert_eq!(big.scale_factor(), 2.0);
        assert!((big.small_scale() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_object_image_dispatch() {
        let (store, library) = library();
        store.insert_image("model.goods.furs.image", tile(6, 6));
        store.insert_image(keys::LOST_CITY_RUMOUR, tile(3, 3));

        let goods = Goods {
            goods_type: GoodsType::new("model.goods.furs"),
            amount: 100,
        };
        assert!(library.object_image(DisplayObject::Goods(&goods)).is_some());
        let small = library.small_object_image(DisplayObject::Goods(&goods)).unwrap();
        assert_eq!(small.dimensions(), (4, 4));

        let rumour = colonist_core::LostCityRumour {
            tile_id: "tile:1".into(),
        };
        assert!(library.object_image(DisplayObject::LostCityRumour(&rumour)).is_some());

        let player = dutch();
        assert!(library.object_image(DisplayObject::Player(&player)).is_none());
        assert!(matches!(
            library.try_object_image(DisplayObject::Player(&player), 1.0),
            Err(MediaError::MissingAsset(_))
        ));
    }

    #[test]
    fn test_faded_image_is_cached() {
        let (store, library) = library();
        store.insert_image("halo.image", tile(2, 2));
        let key = AssetKey::new("halo.image");
        let a = library.faded_image(&key, 0.5, 0.0).unwrap();
        let b = library.faded_image(&key, 0.5, 0.0).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.get_pixel(0, 0).0, [5, 10, 15, 255]);
    }

    #[test]
    fn test_draw_tiled_falls_back_to_background() {
        let (_, library) = library();
        let mut canvas = RgbaImage::new(3, 3);
        library.draw_tiled_image("background.image", &mut canvas, TileArea::full(3, 3), None, Rgb::GRAY);
        assert_eq!(canvas.get_pixel(2, 2).0, [128, 128, 128, 255]);
    }
}
