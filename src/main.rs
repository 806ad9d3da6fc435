use pokemon_battle::{
    get_species_data, run_battle, spawn, Ball, BattleConfig, BattleEngineError, BattleStateError, EncounterMethod, EncounterTable, Key,
    PlayerData, ScriptedInput, TranscriptPresentation, TurnRng,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const STARTER: u16 = 258;
const ROUTE: u16 = 101;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run_demo().await {
        error!(%err, "demo battle failed");
        std::process::exit(1);
    }
}

/// Fight a wild encounter on route 101 with a freshly spawned starter, choosing the first
/// move every turn.
async fn run_demo() -> Result<(), BattleEngineError> {
    let config = BattleConfig::from_env();
    let encounters = EncounterTable::embedded()
        .map_err(|err| BattleStateError::InconsistentState(format!("encounter table: {}", err)))?;

    let mut rng = TurnRng::new_random();
    let starter = spawn(&get_species_data(STARTER)?, 5..=5, Some(Ball::Poke), &mut rng)?;
    info!(starter = %starter.name, level = starter.level, "starter ready");

    let mut player = PlayerData::new("may", vec![starter]);
    player.inventory.add("poke-ball", 5)?;
    player.inventory.add("potion", 2)?;

    // FIGHT, then the first move, for as many turns as the battle lasts.
    let mut input = ScriptedInput::new([Key::Enter; 200]);
    let mut transcript = TranscriptPresentation::new();

    let outcome = run_battle(
        &mut player,
        &encounters,
        ROUTE,
        EncounterMethod::Grass,
        &mut input,
        &mut transcript,
        config,
        rng,
    )
    .await?;

    println!("=== Battle transcript ===");
    for line in &transcript.lines {
        println!("  {}", line);
    }
    println!();

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{}", json),
        Err(err) => error!(%err, "could not serialize outcome"),
    }
    Ok(())
}
