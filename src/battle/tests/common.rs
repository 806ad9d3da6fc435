use crate::battle::controller::BattleController;
use crate::battle::input::InputPort;
use crate::battle::presentation::PresentationPort;
use crate::battle::state::TurnRng;
use crate::battle::stats::StatStages;
use crate::config::BattleConfig;
use crate::player::{PartyStore, PlayerData};
use crate::pokemon::{Combatant, MoveSlot, Nature};
use crate::species::get_species_data;

/// Frame delta used by scenario tests.
pub const TEST_DELTA: f32 = 0.05;

/// A builder for creating test combatants with common defaults: zero IVs, a neutral nature,
/// full health and the moves the species knows at that level.
///
/// # Example
/// ```ignore
/// let mudkip = TestCombatantBuilder::new(258, 5)
///     .with_moves(vec!["tackle", "string-shot"])
///     .with_hp(3)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    species_id: u16,
    level: u8,
    ivs: [u8; 6],
    personality: u8,
    moves: Option<Vec<&'static str>>,
    current_hp: Option<u16>,
    stages: Option<StatStages>,
}

impl TestCombatantBuilder {
    pub fn new(species_id: u16, level: u8) -> Self {
        Self {
            species_id,
            level,
            ivs: [0; 6],
            personality: 0,
            moves: None,
            current_hp: None,
            stages: None,
        }
    }

    pub fn with_ivs(mut self, ivs: [u8; 6]) -> Self {
        self.ivs = ivs;
        self
    }

    pub fn with_nature(mut self, personality: u8) -> Self {
        self.personality = personality;
        self
    }

    /// Replace the known moves.
    pub fn with_moves(mut self, moves: Vec<&'static str>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_stages(mut self, stages: StatStages) -> Self {
        self.stages = Some(stages);
        self
    }

    pub fn build(self) -> Combatant {
        let species = match get_species_data(self.species_id) {
            Ok(species) => species,
            Err(err) => panic!("Failed to load species #{}: {}", self.species_id, err),
        };

        let mut combatant = match Combatant::new(
            &species,
            self.level,
            self.ivs,
            Nature::from_personality(self.personality),
            None,
        ) {
            Ok(combatant) => combatant,
            Err(err) => panic!("Failed to build {}: {}", species.name, err),
        };

        if let Some(moves) = self.moves {
            combatant.moves = moves
                .into_iter()
                .map(|id| MoveSlot::new(id).unwrap_or_else(|err| panic!("{}", err)))
                .collect();
        }
        if let Some(hp) = self.current_hp {
            combatant.set_health(hp as f32);
        }
        if let Some(stages) = self.stages {
            combatant.stages = stages;
        }
        combatant
    }
}

/// A player holding `party` and the given `(item id, amount)` stacks.
pub fn player_with(party: Vec<Combatant>, items: &[(&str, u32)]) -> PlayerData {
    let mut player = PlayerData::new("may", party);
    for (item_id, amount) in items {
        player
            .inventory
            .add(item_id, *amount)
            .unwrap_or_else(|err| panic!("{}", err));
    }
    player
}

/// Start a controller with default timings and scripted rolls.
pub fn start_battle<S: PartyStore>(
    store: &mut S,
    wild: Combatant,
    outcomes: Vec<u32>,
) -> BattleController<'_, S> {
    BattleController::new(store, wild, BattleConfig::default(), TurnRng::new_for_test(outcomes))
        .unwrap_or_else(|err| panic!("battle failed to start: {}", err))
}

/// Tick until the battle finishes. Returns the number of frames run.
pub fn run_to_end<S, I, P>(
    controller: &mut BattleController<'_, S>,
    input: &mut I,
    presentation: &mut P,
) -> usize
where
    S: PartyStore,
    I: InputPort,
    P: PresentationPort,
{
    const MAX_FRAMES: usize = 50_000;
    for frame in 0..MAX_FRAMES {
        if controller.is_finished() {
            return frame;
        }
        controller
            .tick(TEST_DELTA, input, presentation)
            .unwrap_or_else(|err| panic!("tick failed in {:?}: {}", controller.phase(), err));
    }
    panic!("battle did not finish; stuck in {:?}", controller.phase());
}
