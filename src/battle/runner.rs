//! Async entry point that spawns a wild encounter and drives its controller to completion.
use crate::battle::controller::{BattleController, BattleOutcome};
use crate::battle::input::InputPort;
use crate::battle::presentation::PresentationPort;
use crate::battle::state::TurnRng;
use crate::config::BattleConfig;
use crate::encounter::{EncounterMethod, EncounterTable};
use crate::errors::BattleResult;
use crate::factory::spawn;
use crate::player::PartyStore;
use crate::species::get_species_data;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// Run one wild battle on `route` and return its outcome once it reaches `Finished`.
///
/// The wild combatant is picked from the encounter table and spawned with `rng`, which then
/// drives every roll of the battle. The player side is borrowed from `store` for the whole
/// battle.
#[allow(clippy::too_many_arguments)]
pub async fn run_battle<S, I, P>(
    store: &mut S,
    encounters: &EncounterTable,
    route: u16,
    method: EncounterMethod,
    input: &mut I,
    presentation: &mut P,
    config: BattleConfig,
    mut rng: TurnRng,
) -> BattleResult<BattleOutcome>
where
    S: PartyStore,
    I: InputPort,
    P: PresentationPort,
{
    let slot = encounters.pick(route, method, &mut rng)?;
    let species = get_species_data(slot.species)?;
    let wild = spawn(&species, slot.level.0..=slot.level.1, None, &mut rng)?;
    info!(route, %method, wild = %wild.name, level = wild.level, "wild encounter");

    let frame_interval = config.frame_interval();
    let controller = BattleController::new(store, wild, config, rng)?;
    drive(controller, input, presentation, frame_interval).await
}

/// Tick `controller` on a fixed interval with the measured frame delta until it finishes.
pub async fn drive<S, I, P>(
    mut controller: BattleController<'_, S>,
    input: &mut I,
    presentation: &mut P,
    frame_interval: Duration,
) -> BattleResult<BattleOutcome>
where
    S: PartyStore,
    I: InputPort,
    P: PresentationPort,
{
    let mut ticker = interval(frame_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last = Instant::now();
    let mut frames: u64 = 0;
    while !controller.is_finished() {
        ticker.tick().await;
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32();
        last = now;

        controller.tick(delta, input, presentation)?;
        frames += 1;
    }

    debug!(frames, events = controller.events().len(), "battle loop finished");
    trace!(log = %controller.events(), "battle event log");
    controller.into_outcome()
}
