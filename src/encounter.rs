//! Wild encounter tables and the per-step encounter check.
use crate::battle::state::TurnRng;
use crate::errors::{BattleStateError, DataLoadError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use strum::Display;
use tracing::{debug, warn};

const EMBEDDED_ENCOUNTERS: &str = include_str!("../data/encounters.ron");

/// Range the per-step encounter roll is drawn from.
pub const ENCOUNTER_ROLL_MAX: u32 = 2879;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EncounterMethod {
    Grass,
    Cave,
    Water,
    Seaweed,
}

impl EncounterMethod {
    /// Encounter rate out of 2880 per step.
    pub fn step_rate(self) -> u32 {
        match self {
            EncounterMethod::Cave => 160,
            EncounterMethod::Grass | EncounterMethod::Water | EncounterMethod::Seaweed => 320,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSlot {
    pub species: u16,
    pub rate: u32,
    /// Inclusive (min, max) level.
    pub level: (u8, u8),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterTable {
    routes: HashMap<u16, HashMap<EncounterMethod, Vec<EncounterSlot>>>,
}

impl EncounterTable {
    pub fn from_ron(content: &str) -> Result<Self, DataLoadError> {
        let routes = ron::from_str(content).map_err(|e| DataLoadError::parse("encounters", e))?;
        Ok(Self { routes })
    }

    /// The table shipped with the crate.
    pub fn embedded() -> Result<Self, DataLoadError> {
        Self::from_ron(EMBEDDED_ENCOUNTERS)
    }

    pub fn load(data_path: &Path) -> Result<Self, DataLoadError> {
        let path = data_path.join("encounters.ron");
        let content = std::fs::read_to_string(&path).map_err(|e| DataLoadError::io(&path, e))?;
        Self::from_ron(&content)
    }

    pub fn slots(&self, route: u16, method: EncounterMethod) -> &[EncounterSlot] {
        self.routes
            .get(&route)
            .and_then(|methods| methods.get(&method))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pick a slot weighted by its rate.
    pub fn pick(
        &self,
        route: u16,
        method: EncounterMethod,
        rng: &mut TurnRng,
    ) -> Result<&EncounterSlot, BattleStateError> {
        let slots = self.slots(route, method);
        let total: u32 = slots.iter().map(|slot| slot.rate).sum();
        if total == 0 {
            warn!(route, %method, "no encounter slots");
            return Err(BattleStateError::NoEncounters {
                route,
                method: method.to_string(),
            });
        }

        let mut roll = rng.next(0..=total - 1, "encounter slot");
        for slot in slots {
            if roll < slot.rate {
                debug!(route, %method, species = slot.species, "encounter slot picked");
                return Ok(slot);
            }
            roll -= slot.rate;
        }
        Err(BattleStateError::InconsistentState(
            "encounter roll exceeded slot weights".to_string(),
        ))
    }
}

/// Whether a single step on `method` terrain starts an encounter.
pub fn step_triggers_encounter(method: EncounterMethod, rng: &mut TurnRng) -> bool {
    rng.next(0..=ENCOUNTER_ROLL_MAX, "encounter step") < method.step_rate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_embedded_table() {
        let table = EncounterTable::embedded().unwrap();
        assert_eq!(table.slots(101, EncounterMethod::Grass).len(), 3);
        assert!(table.slots(101, EncounterMethod::Cave).is_empty());
        assert!(table.slots(999, EncounterMethod::Grass).is_empty());
    }

    #[test]
    fn test_weighted_pick_walks_cumulative_rates() {
        // route 101: wurmple 45, poochyena 10, zigzagoon 45
        let table = EncounterTable::embedded().unwrap();
        let mut rng = TurnRng::new_for_test(vec![0, 44, 45, 54, 55, 99]);
        let picks: Vec<u16> = (0..6)
            .map(|_| table.pick(101, EncounterMethod::Grass, &mut rng).unwrap().species)
            .collect();
        assert_eq!(picks, vec![265, 265, 261, 261, 263, 263]);
    }

    #[test]
    fn test_empty_method_is_an_error() {
        let table = EncounterTable::embedded().unwrap();
        let mut rng = TurnRng::new_for_test(vec![]);
        assert_eq!(
            table.pick(104, EncounterMethod::Seaweed, &mut rng),
            Err(BattleStateError::NoEncounters {
                route: 104,
                method: "seaweed".to_string()
            })
        );
    }

    #[test]
    fn test_step_rates() {
        let mut rng = TurnRng::new_for_test(vec![319, 320, 159, 160]);
        assert!(step_triggers_encounter(EncounterMethod::Grass, &mut rng));
        assert!(!step_triggers_encounter(EncounterMethod::Grass, &mut rng));
        assert!(step_triggers_encounter(EncounterMethod::Cave, &mut rng));
        assert!(!step_triggers_encounter(EncounterMethod::Cave, &mut rng));
    }
}
