//! Game entities as seen by the presentation layer.
//!
//! Only identity and the handful of attributes that influence which image is
//! drawn live here. Rules, AI and persistence belong to the simulation engine.

use crate::color::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Identifier of the role every unit has when it carries no equipment.
pub const DEFAULT_ROLE_ID: &str = "model.role.default";

/// Returns true if `role_id` names the default (unequipped) role.
pub fn is_default_role_id(role_id: &str) -> bool {
    role_id == DEFAULT_ROLE_ID
}

/// The last dotted segment of a role id, e.g. `soldier` for `model.role.soldier`.
pub fn role_suffix(role_id: &str) -> &str {
    role_id.rsplit('.').next().unwrap_or(role_id)
}

/// A kind of goods (`model.goods.furs`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoodsType {
    /// Stable identifier
    pub id: String,
}

impl GoodsType {
    /// Create a goods type.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A quantity of goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goods {
    /// Kind of goods
    pub goods_type: GoodsType,
    /// Amount carried
    pub amount: u32,
}

/// A kind of unit (`model.unit.veteranSoldier`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitType {
    /// Stable identifier
    pub id: String,
    /// Role used when the type is displayed without a concrete unit
    pub display_role_id: String,
    /// Units that can only ever be native need no `.native` key part
    pub born_in_indian_settlement: bool,
}

impl UnitType {
    /// Create a unit type displayed in the default role.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_role_id: DEFAULT_ROLE_ID.to_string(),
            born_in_indian_settlement: false,
        }
    }
}

/// What a unit is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitState {
    #[default]
    Active,
    Sentry,
    InColony,
    Improving,
    ToEurope,
    InEurope,
    ToAmerica,
    Fortifying,
    Fortified,
    Skipped,
}

/// A European nation or a native tribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nation {
    /// Stable identifier (`model.nation.dutch`)
    pub id: String,
}

impl Nation {
    /// Create a nation.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The part of the id after `model.nation.`.
    pub fn suffix(&self) -> &str {
        self.id.strip_prefix("model.nation.").unwrap_or(&self.id)
    }
}

/// A participant in the game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier
    pub id: String,
    /// Nation this player leads
    pub nation: Nation,
    /// Color used for borders, flags and chips
    pub nation_color: Rgb,
}

impl Player {
    /// Create a player.
    pub fn new(id: impl Into<String>, nation: Nation, nation_color: Rgb) -> Self {
        Self {
            id: id.into(),
            nation,
            nation_color,
        }
    }

    /// Message key of the nation name, also used to select national building art.
    pub fn nation_name_key(&self) -> String {
        format!("{}.name", self.nation.id)
    }
}

/// A single unit on the map, in a colony or in Europe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identifier
    pub id: String,
    /// Kind of unit
    pub unit_type: UnitType,
    /// Current role id
    pub role_id: String,
    /// Owning player
    pub owner: Player,
    /// True for converts and other units of native origin
    pub native_ethnicity: bool,
    /// Current occupation
    pub state: UnitState,
    /// Ships and other naval units
    pub naval: bool,
    /// Dragoons, scouts and other mounted units
    pub mounted: bool,
    /// Colonists as opposed to wagons and artillery
    pub person: bool,
    /// Units that can carry other units or goods
    pub carrier: bool,
}

impl Unit {
    /// Create an active, unequipped land unit.
    pub fn new(id: impl Into<String>, unit_type: UnitType, owner: Player) -> Self {
        Self {
            id: id.into(),
            unit_type,
            role_id: DEFAULT_ROLE_ID.to_string(),
            owner,
            native_ethnicity: false,
            state: UnitState::Active,
            naval: false,
            mounted: false,
            person: true,
            carrier: false,
        }
    }
}

/// Attitude of a native settlement towards a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tension {
    Happy,
    Content,
    Displeased,
    Angry,
    Hateful,
}

impl Tension {
    /// Position on the 0..=4 scale.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Message key of the short alarm description.
    pub fn message_key(self) -> &'static str {
        match self {
            Tension::Happy => "model.tension.happy",
            Tension::Content => "model.tension.content",
            Tension::Displeased => "model.tension.displeased",
            Tension::Angry => "model.tension.angry",
            Tension::Hateful => "model.tension.hateful",
        }
    }
}

/// A kind of settlement (`model.settlement.village`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementType {
    /// Stable identifier
    pub id: String,
    /// Capitals get their own chip text
    pub capital: bool,
}

/// A colony or native settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of settlement
    pub settlement_type: SettlementType,
    /// Owning player
    pub owner: Player,
    /// Image key that reflects the settlement's current size or stockade
    pub image_key: String,
}

/// A native settlement together with what the observing players know about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndianSettlement {
    /// Common settlement data
    pub settlement: Settlement,
    /// Alarm level towards each player, keyed by player id
    pub alarm: HashMap<String, Tension>,
    /// The player this settlement dislikes most
    pub most_hated: Option<Player>,
    /// Players that have met this settlement
    pub contacted: HashSet<String>,
    /// Players that have visited this settlement with a scout
    pub visited: HashSet<String>,
    /// Players whose scouts have already spoken to the chief
    pub scouted: HashSet<String>,
    /// Resident missionary
    pub missionary: Option<Unit>,
    /// Skill a free colonist can learn here
    pub learnable_skill: Option<UnitType>,
    /// Goods in decreasing order of demand
    pub wanted_goods: Vec<Option<GoodsType>>,
}

impl IndianSettlement {
    /// Create a settlement nobody knows anything about yet.
    pub fn new(settlement: Settlement) -> Self {
        Self {
            settlement,
            alarm: HashMap::new(),
            most_hated: None,
            contacted: HashSet::new(),
            visited: HashSet::new(),
            scouted: HashSet::new(),
            missionary: None,
            learnable_skill: None,
            wanted_goods: Vec::new(),
        }
    }

    /// The owning tribe.
    pub fn owner(&self) -> &Player {
        &self.settlement.owner
    }

    /// True if this settlement is the tribe's capital.
    pub fn is_capital(&self) -> bool {
        self.settlement.settlement_type.capital
    }

    /// True if `player` has met this settlement.
    pub fn has_contacted(&self, player: &Player) -> bool {
        self.contacted.contains(&player.id)
    }

    /// True if `player` has visited this settlement.
    pub fn has_visited(&self, player: &Player) -> bool {
        self.visited.contains(&player.id)
    }

    /// True if a scout of `player` could still learn something here.
    pub fn worth_scouting(&self, player: &Player) -> bool {
        !self.scouted.contains(&player.id)
    }

    /// Alarm towards `player`, if known.
    pub fn alarm_for(&self, player: &Player) -> Option<Tension> {
        self.alarm.get(&player.id).copied()
    }

    /// Number of wanted goods slots that carry a value.
    pub fn wanted_goods_amount(&self) -> usize {
        self.wanted_goods.iter().filter(|g| g.is_some()).count()
    }
}

/// A kind of terrain (`model.tile.plains`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileType {
    /// Stable identifier
    pub id: String,
    /// Forested types get a forest layer on top of the terrain
    pub forested: bool,
}

impl TileType {
    /// Create an unforested tile type.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            forested: false,
        }
    }
}

/// A map tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Stable identifier, used to pick overlay variants
    pub id: String,
    /// Terrain, `None` while unexplored
    pub tile_type: Option<TileType>,
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

/// Compass direction between neighbouring tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        };
        f.write_str(name)
    }
}

/// Connection pattern of a river or road on a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileImprovementStyle {
    /// Full style string, one digit per direction (`0101`)
    pub style: String,
    /// Reduced form selecting the forest art cut out around the river
    pub mask: String,
}

/// A founding father of the continental congress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundingFather {
    /// Stable identifier
    pub id: String,
}

/// A kind of colony building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingType {
    /// Stable identifier
    pub id: String,
}

/// A building in a colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Kind of building
    pub building_type: BuildingType,
    /// Colony owner
    pub owner: Player,
}

/// A tile bonus resource (`model.resource.fish`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    /// Stable identifier
    pub id: String,
}

/// An unexplored rumour site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostCityRumour {
    /// Tile the rumour sits on
    pub tile_id: String,
}

/// Broad class of movement shown along a unit's planned path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathType {
    Naval,
    Wagon,
    Horse,
    Foot,
}

impl PathType {
    /// Lower-case name used in message and image keys.
    pub fn key(self) -> &'static str {
        match self {
            PathType::Naval => "naval",
            PathType::Wagon => "wagon",
            PathType::Horse => "horse",
            PathType::Foot => "foot",
        }
    }

    /// Classify a unit; no unit walks.
    pub fn for_unit(unit: Option<&Unit>) -> PathType {
        match unit {
            None => PathType::Foot,
            Some(u) if u.naval => PathType::Naval,
            Some(u) if u.mounted => PathType::Horse,
            Some(u) if u.person => PathType::Foot,
            Some(_) => PathType::Wagon,
        }
    }
}

/// Anything a panel may ask the image library to draw.
#[derive(Debug, Clone, Copy)]
pub enum DisplayObject<'a> {
    Goods(&'a Goods),
    GoodsType(&'a GoodsType),
    Unit(&'a Unit),
    UnitType(&'a UnitType),
    Settlement(&'a Settlement),
    LostCityRumour(&'a LostCityRumour),
    Player(&'a Player),
}

impl fmt::Display for DisplayObject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayObject::Goods(g) => write!(f, "goods {} x{}", g.goods_type.id, g.amount),
            DisplayObject::GoodsType(t) => write!(f, "goods type {}", t.id),
            DisplayObject::Unit(u) => write!(f, "unit {} ({})", u.id, u.unit_type.id),
            DisplayObject::UnitType(t) => write!(f, "unit type {}", t.id),
            DisplayObject::Settlement(s) => write!(f, "settlement {}", s.id),
            DisplayObject::LostCityRumour(r) => write!(f, "rumour on {}", r.tile_id),
            DisplayObject::Player(p) => write!(f, "player {}", p.id),
        }
    }
}
