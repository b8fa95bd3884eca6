//! The player's carried items. Drops from the run land here, and materials
//! leave here for the sanctum.

pub mod crafting;

use crate::data::items::{HEALTH_POTION, Item, ItemKind, starter_items};

/// What using an item asks the rest of the game to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemUse {
    Heal(i32),
    /// Move `quantity` of a material into sanctum storage under `key`.
    Deposit { key: String, quantity: u32 },
}

/// Stash key for a material name: "Magic Shard" -> "magic_shard".
pub fn material_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Clone, Debug)]
pub struct Inventory {
    items: Vec<Item>,
    potion_heal: i32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_items(starter_items())
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            potion_heal: 50,
        }
    }

    pub fn with_potion_heal(mut self, amount: i32) -> Self {
        self.potion_heal = amount;
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Total quantity across every stack whose name matches, ignoring case.
    pub fn count(&self, name: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.name.eq_ignore_ascii_case(name))
            .map(|item| item.quantity)
            .sum()
    }

    /// Stacks onto an existing item of the same name, otherwise appends.
    pub fn add_item(&mut self, item: Item) {
        match self.items.iter_mut().find(|held| held.name == item.name) {
            Some(held) => held.quantity += item.quantity,
            None => self.items.push(item),
        }
    }

    /// Takes one unit from the stack with `id`, dropping the stack when it
    /// runs out.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let Some(idx) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        if self.items[idx].quantity > 1 {
            self.items[idx].quantity -= 1;
        } else {
            self.items.remove(idx);
        }
        true
    }

    /// Removes `quantity` units of `name` spread across matching stacks.
    /// Nothing is removed unless enough are held.
    pub fn remove_by_name(&mut self, name: &str, quantity: u32) -> bool {
        if self.count(name) < quantity {
            return false;
        }

        let mut owed = quantity;
        for item in self
            .items
            .iter_mut()
            .filter(|item| item.name.eq_ignore_ascii_case(name))
        {
            let taken = owed.min(item.quantity);
            item.quantity -= taken;
            owed -= taken;
            if owed == 0 {
                break;
            }
        }
        self.items.retain(|item| item.quantity > 0);
        true
    }

    pub fn use_item(&mut self, id: &str) -> Option<ItemUse> {
        let item = self.get(id)?;
        let effect = match item.kind {
            ItemKind::Consumable if item.name == HEALTH_POTION => ItemUse::Heal(self.potion_heal),
            ItemKind::Consumable => ItemUse::Heal(0),
            ItemKind::Material => ItemUse::Deposit {
                key: material_key(&item.name),
                quantity: 1,
            },
            ItemKind::Artifact | ItemKind::Equipment => {
                tracing::debug!(item = %item.name, "item is not usable");
                return None;
            }
        };

        tracing::debug!(item = %item.name, ?effect, "item used");
        self.remove_item(id);
        Some(effect)
    }
}
