use crate::PokemonType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum DamageClass {
    Physical,
    Special,
    Status,
}

/// Who a move's stat changes land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTarget {
    SelectedPokemon,
    AllOpponents,
    User,
    UsersField,
    EntireField,
}

/// Stats that carry a battle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum StageStat {
    #[strum(serialize = "ATTACK")]
    Attack,
    #[strum(serialize = "DEFENSE")]
    Defense,
    #[strum(serialize = "SP. ATK")]
    SpecialAttack,
    #[strum(serialize = "SP. DEF")]
    SpecialDefense,
    #[strum(serialize = "SPEED")]
    Speed,
    #[strum(serialize = "ACCURACY")]
    Accuracy,
    #[strum(serialize = "EVASIVENESS")]
    Evasion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: StageStat,
    pub change: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: PokemonType,
    pub power: Option<u16>,
    /// Moves without accuracy never miss.
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    pub damage_class: DamageClass,
    pub target: MoveTarget,
    #[serde(default)]
    pub stat_changes: Vec<StatChange>,
}

impl MoveData {
    /// Whether stat changes land on the user rather than the defender.
    pub fn targets_user(&self) -> bool {
        matches!(self.target, MoveTarget::User | MoveTarget::UsersField)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    StandardBalls,
    SpecialBalls,
    Healing,
    Other,
}

impl ItemCategory {
    pub fn is_ball(self) -> bool {
        matches!(self, ItemCategory::StandardBalls | ItemCategory::SpecialBalls)
    }
}

/// Bag pockets in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum BagPocket {
    #[strum(serialize = "ITEMS")]
    Items,
    #[strum(serialize = "POKé BALLS")]
    PokeBalls,
    #[strum(serialize = "TMs & HMs")]
    TmsHms,
    #[strum(serialize = "BERRIES")]
    Berries,
    #[strum(serialize = "KEY ITEMS")]
    KeyItems,
}

impl BagPocket {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub category: ItemCategory,
    pub pocket: BagPocket,
    /// Hit points restored by healing items; `None` restores to full.
    #[serde(default)]
    pub heal_amount: Option<u16>,
}
