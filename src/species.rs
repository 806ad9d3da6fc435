use crate::errors::{DataLoadError, SpeciesDataError, SpeciesDataResult};
use schema::PokemonSpecies;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{LazyLock, PoisonError, RwLock};
use tracing::{debug, error};

const EMBEDDED_SPECIES: &str = include_str!("../data/species.ron");

// Global species data storage, seeded from the embedded table
static SPECIES_DATA: LazyLock<RwLock<HashMap<u16, PokemonSpecies>>> =
    LazyLock::new(|| RwLock::new(embedded_species()));

fn embedded_species() -> HashMap<u16, PokemonSpecies> {
    match parse_species(EMBEDDED_SPECIES, "embedded species.ron") {
        Ok(map) => map,
        Err(err) => {
            error!(%err, "embedded species table is invalid");
            HashMap::new()
        }
    }
}

fn parse_species(content: &str, origin: &str) -> Result<HashMap<u16, PokemonSpecies>, DataLoadError> {
    let list: Vec<PokemonSpecies> =
        ron::from_str(content).map_err(|e| DataLoadError::parse(origin, e))?;
    Ok(list
        .into_iter()
        .map(|species| (species.pokedex_number, species))
        .collect())
}

/// Replace the global species table with `species.ron` from `data_path`
pub fn initialize_species_data(data_path: &Path) -> Result<(), DataLoadError> {
    let path = data_path.join("species.ron");
    let content = fs::read_to_string(&path).map_err(|e| DataLoadError::io(&path, e))?;
    let species_map = parse_species(&content, &path.display().to_string())?;
    debug!(count = species_map.len(), "loaded species data");

    let mut global_data = SPECIES_DATA.write().unwrap_or_else(PoisonError::into_inner);
    *global_data = species_map;
    Ok(())
}

/// Get species data by pokedex number from the global store
pub fn get_species_data(pokedex_number: u16) -> SpeciesDataResult<PokemonSpecies> {
    let global_data = SPECIES_DATA.read().unwrap_or_else(PoisonError::into_inner);
    global_data
        .get(&pokedex_number)
        .cloned()
        .ok_or(SpeciesDataError::SpeciesNotFound(pokedex_number))
}

/// Species display names are stored lowercase; battle text shows them uppercased.
pub fn display_name(species: &PokemonSpecies) -> String {
    species.name.to_uppercase()
}
