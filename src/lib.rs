//! Wild battle engine
//!
//! A single-player-versus-wild battle: encounter tables and combatant spawning, the
//! damage, capture, escape and experience formulas, and a frame-driven phase machine
//! that talks to the host through an input port and a presentation port.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod encounter;
pub mod errors;
pub mod factory;
pub mod items;
pub mod move_data;
pub mod player;
pub mod pokemon;
pub mod progression;
pub mod species;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BagPocket, BaseStats, DamageClass, GrowthRate, ItemCategory, ItemData, LevelUpMove, MoveData, MoveTarget,
    PokemonSpecies, PokemonType, StageStat, StatChange,
};

// --- From this crate's modules (`src/`) ---

// The battle controller and the host-facing ports.
pub use battle::controller::{BattleController, BattleEnd, BattleOutcome};
pub use battle::input::{InputPort, Key, NoInput, ScriptedInput};
pub use battle::phase::BattlePhase;
pub use battle::presentation::{Frame, NullPresentation, PresentationPort, TranscriptPresentation};
pub use battle::runner::run_battle;
pub use battle::state::{BattleEvent, TurnRng};

// Runtime types.
pub use battle::catch::Ball;
pub use config::BattleConfig;
pub use encounter::{EncounterMethod, EncounterTable};
pub use player::{Inventory, PartyStore, PlayerData};
pub use pokemon::{Combatant, MoveSlot, Nature};

// Primary data access functions.
pub use factory::spawn;
pub use items::get_item_data;
pub use move_data::get_move_data;
pub use species::get_species_data;

// Crate-specific error and result types.
pub use errors::{
    BattleEngineError, BattleResult, BattleStateError, DataLoadError, ItemDataError, MoveDataError, MoveDataResult,
    SpeciesDataError, SpeciesDataResult,
};
