use crate::errors::{DataLoadError, MoveDataError, MoveDataResult};
use schema::MoveData;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{LazyLock, PoisonError, RwLock};
use tracing::{debug, error};

const EMBEDDED_MOVES: &str = include_str!("../data/moves.ron");

// Global move data storage, keyed by move id
static MOVE_DATA: LazyLock<RwLock<HashMap<String, MoveData>>> =
    LazyLock::new(|| RwLock::new(embedded_moves()));

fn embedded_moves() -> HashMap<String, MoveData> {
    match parse_moves(EMBEDDED_MOVES, "embedded moves.ron") {
        Ok(map) => map,
        Err(err) => {
            error!(%err, "embedded move table is invalid");
            HashMap::new()
        }
    }
}

fn parse_moves(content: &str, origin: &str) -> Result<HashMap<String, MoveData>, DataLoadError> {
    ron::from_str(content).map_err(|e| DataLoadError::parse(origin, e))
}

/// Initialize the global move data by loading `moves.ron` from disk
pub fn initialize_move_data(data_path: &Path) -> Result<(), DataLoadError> {
    let path = data_path.join("moves.ron");
    let content = fs::read_to_string(&path).map_err(|e| DataLoadError::io(&path, e))?;
    let move_data_map = parse_moves(&content, &path.display().to_string())?;
    debug!(count = move_data_map.len(), "loaded move data");

    let mut global_data = MOVE_DATA.write().unwrap_or_else(PoisonError::into_inner);
    *global_data = move_data_map;
    Ok(())
}

/// Get move data for a specific move from the global store
pub fn get_move_data(move_id: &str) -> MoveDataResult<MoveData> {
    let global_data = MOVE_DATA.read().unwrap_or_else(PoisonError::into_inner);
    global_data
        .get(move_id)
        .cloned()
        .ok_or_else(|| MoveDataError::MoveNotFound(move_id.to_string()))
}

/// Move ids are kebab-case; battle text shows them uppercased with spaces.
pub fn move_display_name(move_id: &str) -> String {
    move_id.replace('-', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{DamageClass, PokemonType, StageStat};

    #[test]
    fn test_tackle() {
        let tackle = get_move_data("tackle").unwrap();
        assert_eq!(tackle.move_type, PokemonType::Normal);
        assert_eq!(tackle.power, Some(35));
        assert_eq!(tackle.accuracy, Some(100));
        assert_eq!(tackle.max_pp, 35);
        assert_eq!(tackle.damage_class, DamageClass::Physical);
    }

    #[test]
    fn test_status_moves_carry_stat_changes() {
        let growl = get_move_data("growl").unwrap();
        assert_eq!(growl.power, None);
        assert_eq!(growl.stat_changes[0].stat, StageStat::Attack);
        assert_eq!(growl.stat_changes[0].change, -1);

        let howl = get_move_data("howl").unwrap();
        assert!(howl.targets_user());
    }

    #[test]
    fn test_unknown_move() {
        assert_eq!(
            get_move_data("hyper-beam").unwrap_err(),
            MoveDataError::MoveNotFound("hyper-beam".to_string())
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(move_display_name("quick-attack"), "QUICK ATTACK");
    }

    fn data_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn test_reload_from_data_directory() {
        initialize_move_data(&data_dir()).unwrap();
        assert_eq!(get_move_data("tackle").unwrap().power, Some(35));
    }

    #[test]
    fn test_failed_reload_keeps_current_table() {
        assert!(matches!(
            initialize_move_data(&data_dir().join("no-such-dir")),
            Err(DataLoadError::Io { .. })
        ));

        let broken = std::env::temp_dir().join(format!("pokemon-battle-moves-{}", std::process::id()));
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("moves.ron"), "{ \"tackle\": (").unwrap();
        let result = initialize_move_data(&broken);
        fs::remove_dir_all(&broken).unwrap();

        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
        assert!(get_move_data("tackle").is_ok());
    }
}
