use crate::errors::{BattleStateError, ItemDataResult};
use crate::items::get_item_data;
use crate::pokemon::Combatant;
use schema::BagPocket;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub item_id: String,
    pub amount: u32,
}

/// Items grouped by bag pocket, in pocket display order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pockets: [Vec<ItemStack>; BagPocket::COUNT],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pocket(&self, pocket: BagPocket) -> &[ItemStack] {
        &self.pockets[pocket.index()]
    }

    pub fn pocket_at(&self, index: usize) -> &[ItemStack] {
        self.pockets.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add items to the pocket the item table files them under.
    pub fn add(&mut self, item_id: &str, amount: u32) -> ItemDataResult<()> {
        let pocket = get_item_data(item_id)?.pocket;
        let stacks = &mut self.pockets[pocket.index()];
        match stacks.iter_mut().find(|stack| stack.item_id == item_id) {
            Some(stack) => stack.amount += amount,
            None => stacks.push(ItemStack {
                item_id: item_id.to_string(),
                amount,
            }),
        }
        Ok(())
    }

    /// Remove one item from a stack, dropping the stack when it empties.
    /// Returns whether an item was removed.
    pub fn consume(&mut self, pocket_index: usize, stack_index: usize) -> bool {
        let Some(stacks) = self.pockets.get_mut(pocket_index) else {
            return false;
        };
        let Some(stack) = stacks.get_mut(stack_index) else {
            return false;
        };
        if stack.amount == 0 {
            return false;
        }
        stack.amount -= 1;
        if stack.amount == 0 {
            stacks.remove(stack_index);
        }
        true
    }
}

/// The persistence collaborator a battle reads the player's party from and hands
/// captured combatants to. The battle holds it exclusively while running.
pub trait PartyStore {
    fn trainer_name(&self) -> &str;

    fn party(&self) -> &[Combatant];

    fn party_mut(&mut self) -> &mut [Combatant];

    fn inventory(&self) -> &Inventory;

    fn inventory_mut(&mut self) -> &mut Inventory;

    /// Store a combatant caught in battle.
    fn add_caught_combatant(&mut self, combatant: Combatant);

    /// Index of the first combatant able to battle.
    fn first_active(&self) -> Result<usize, BattleStateError> {
        self.party()
            .iter()
            .position(|combatant| !combatant.is_fainted())
            .ok_or(BattleStateError::NoActivePokemon)
    }

    fn owns_species(&self, species_id: u16) -> bool {
        self.party().iter().any(|c| c.species_id == species_id)
    }
}

/// In-memory party store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerData {
    pub name: String,
    pub party: Vec<Combatant>,
    /// Combatants caught while the party was full.
    pub storage: Vec<Combatant>,
    pub inventory: Inventory,
}

pub const MAX_PARTY_SIZE: usize = 6;

impl PlayerData {
    pub fn new(name: &str, party: Vec<Combatant>) -> Self {
        Self {
            name: name.to_string(),
            party,
            storage: Vec::new(),
            inventory: Inventory::new(),
        }
    }
}

impl PartyStore for PlayerData {
    fn trainer_name(&self) -> &str {
        &self.name
    }

    fn party(&self) -> &[Combatant] {
        &self.party
    }

    fn party_mut(&mut self) -> &mut [Combatant] {
        &mut self.party
    }

    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    fn add_caught_combatant(&mut self, combatant: Combatant) {
        info!(pokemon = %combatant.name, "adding caught combatant");
        if self.party.len() < MAX_PARTY_SIZE {
            self.party.push(combatant);
        } else {
            self.storage.push(combatant);
        }
    }

    /// Boxed combatants count as owned too.
    fn owns_species(&self, species_id: u16) -> bool {
        self.party
            .iter()
            .chain(&self.storage)
            .any(|combatant| combatant.species_id == species_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::catch::{ball_bonus, Ball, BallContext};
    use crate::battle::tests::common::TestCombatantBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inventory_files_items_by_pocket() {
        let mut inventory = Inventory::new();
        inventory.add("poke-ball", 5).unwrap();
        inventory.add("potion", 1).unwrap();
        inventory.add("poke-ball", 2).unwrap();

        assert_eq!(
            inventory.pocket(BagPocket::PokeBalls),
            &[ItemStack {
                item_id: "poke-ball".to_string(),
                amount: 7
            }]
        );
        assert_eq!(inventory.pocket(BagPocket::Items).len(), 1);
        assert!(inventory.pocket(BagPocket::KeyItems).is_empty());
        assert!(inventory.add("not-an-item", 1).is_err());
    }

    #[test]
    fn test_consume_drops_empty_stack() {
        let mut inventory = Inventory::new();
        inventory.add("potion", 1).unwrap();
        let pocket = BagPocket::Items.index();
        assert!(inventory.consume(pocket, 0));
        assert!(inventory.pocket(BagPocket::Items).is_empty());
        assert!(!inventory.consume(pocket, 0));
    }

    #[test]
    fn test_first_active_skips_fainted() {
        let fainted = TestCombatantBuilder::new(258, 5).with_hp(0).build();
        let healthy = TestCombatantBuilder::new(252, 5).build();
        let player = PlayerData::new("may", vec![fainted, healthy]);
        assert_eq!(player.first_active(), Ok(1));

        let empty = PlayerData::new("may", vec![]);
        assert_eq!(empty.first_active(), Err(BattleStateError::NoActivePokemon));
    }

    #[test]
    fn test_caught_combatants_overflow_to_storage() {
        let party = (0..MAX_PARTY_SIZE)
            .map(|_| TestCombatantBuilder::new(263, 3).build())
            .collect();
        let mut player = PlayerData::new("may", party);
        player.add_caught_combatant(TestCombatantBuilder::new(265, 3).build());
        assert_eq!(player.party.len(), MAX_PARTY_SIZE);
        assert_eq!(player.storage.len(), 1);
        assert!(player.owns_species(263));
    }

    #[test]
    fn test_species_in_storage_counts_as_owned() {
        let party = (0..MAX_PARTY_SIZE)
            .map(|_| TestCombatantBuilder::new(258, 5).build())
            .collect();
        let mut player = PlayerData::new("may", party);
        assert!(!player.owns_species(263));

        player.add_caught_combatant(TestCombatantBuilder::new(263, 3).build());
        assert_eq!(player.storage.len(), 1);
        assert!(player.owns_species(263));

        let target = TestCombatantBuilder::new(263, 4).build();
        let context = BallContext {
            target: &target,
            species_owned: player.owns_species(target.species_id),
            turns_passed: 0,
        };
        assert_eq!(ball_bonus(Ball::Repeat, &context), 3.5);
    }
}
