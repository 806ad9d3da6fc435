// Pokemon Battle Schema - Shared type definitions
// This crate contains the serde data definitions that the static RON tables
// (species, moves, items) are written against, plus the type chart.

// Re-export the main types
pub use battle_data::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod pokemon_types;
pub mod species_data;
