use crate::errors::{DataLoadError, ItemDataError, ItemDataResult};
use schema::ItemData;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{LazyLock, PoisonError, RwLock};
use tracing::{debug, error};

const EMBEDDED_ITEMS: &str = include_str!("../data/items.ron");

static ITEM_DATA: LazyLock<RwLock<HashMap<String, ItemData>>> =
    LazyLock::new(|| RwLock::new(embedded_items()));

fn embedded_items() -> HashMap<String, ItemData> {
    match ron::from_str(EMBEDDED_ITEMS) {
        Ok(map) => map,
        Err(err) => {
            error!(%err, "embedded item table is invalid");
            HashMap::new()
        }
    }
}

/// Replace the global item table with `items.ron` from `data_path`
pub fn initialize_item_data(data_path: &Path) -> Result<(), DataLoadError> {
    let path = data_path.join("items.ron");
    let content = fs::read_to_string(&path).map_err(|e| DataLoadError::io(&path, e))?;
    let item_map: HashMap<String, ItemData> = ron::from_str(&content)
        .map_err(|e| DataLoadError::parse(&path.display().to_string(), e))?;
    debug!(count = item_map.len(), "loaded item data");

    let mut global_data = ITEM_DATA.write().unwrap_or_else(PoisonError::into_inner);
    *global_data = item_map;
    Ok(())
}

pub fn get_item_data(item_id: &str) -> ItemDataResult<ItemData> {
    let global_data = ITEM_DATA.read().unwrap_or_else(PoisonError::into_inner);
    global_data
        .get(item_id)
        .cloned()
        .ok_or_else(|| ItemDataError::ItemNotFound(item_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{BagPocket, ItemCategory};

    #[test]
    fn test_balls_live_in_ball_pocket() {
        for id in ["poke-ball", "great-ball", "net-ball", "premier-ball"] {
            let item = get_item_data(id).unwrap();
            assert!(item.category.is_ball(), "{} should be a ball", id);
            assert_eq!(item.pocket, BagPocket::PokeBalls);
        }
    }

    #[test]
    fn test_healing_items() {
        let potion = get_item_data("potion").unwrap();
        assert_eq!(potion.category, ItemCategory::Healing);
        assert_eq!(potion.heal_amount, Some(20));
        assert_eq!(get_item_data("max-potion").unwrap().heal_amount, None);
    }

    #[test]
    fn test_unknown_item() {
        assert!(matches!(
            get_item_data("rare-candy"),
            Err(ItemDataError::ItemNotFound(_))
        ));
    }

    fn data_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn test_reload_from_data_directory() {
        initialize_item_data(&data_dir()).unwrap();
        assert_eq!(get_item_data("potion").unwrap().heal_amount, Some(20));
    }

    #[test]
    fn test_failed_reload_keeps_current_table() {
        assert!(matches!(
            initialize_item_data(&data_dir().join("no-such-dir")),
            Err(DataLoadError::Io { .. })
        ));

        let broken = std::env::temp_dir().join(format!("pokemon-battle-items-{}", std::process::id()));
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("items.ron"), "{ \"potion\": ").unwrap();
        let result = initialize_item_data(&broken);
        fs::remove_dir_all(&broken).unwrap();

        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
        assert!(get_item_data("potion").is_ok());
    }
}
