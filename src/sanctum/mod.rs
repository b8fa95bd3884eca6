//! The persistent home base: a material stockpile and four upgradeable
//! rooms that outlive individual runs.

pub mod storage;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use self::storage::KeyValueStore;

pub const STORAGE_KEY: &str = "sanctum-storage";
pub const MAX_ROOM_LEVEL: u32 = 5;

/// Room keys in display order.
pub const ROOM_KEYS: [&str; 4] = ["training_hall", "workshop", "library", "vault"];

const BASE_UPGRADE_COST: [(&str, u32); 4] =
    [("stone", 5), ("wood", 3), ("iron", 2), ("magic_crystal", 1)];

const INITIAL_MATERIALS: [(&str, u32); 4] =
    [("stone", 10), ("wood", 5), ("iron", 3), ("magic_crystal", 1)];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctumRoom {
    pub level: u32,
    pub description: String,
    pub effects: Vec<String>,
}

impl SanctumRoom {
    fn new(description: &str, effect: &str) -> Self {
        Self {
            level: 1,
            description: description.to_string(),
            effects: vec![effect.to_string()],
        }
    }
}

/// The persisted snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctumState {
    pub materials: BTreeMap<String, u32>,
    pub rooms: BTreeMap<String, SanctumRoom>,
}

impl Default for SanctumState {
    fn default() -> Self {
        let materials = INITIAL_MATERIALS
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect();

        let rooms = [
            (
                "training_hall",
                SanctumRoom::new("A place to hone your combat skills", "Start with +10 health"),
            ),
            (
                "workshop",
                SanctumRoom::new(
                    "Craft better equipment and artifacts",
                    "Unlock basic crafting recipes",
                ),
            ),
            (
                "library",
                SanctumRoom::new(
                    "Store knowledge and unlock mysteries",
                    "Gain +5 XP per monster kill",
                ),
            ),
            (
                "vault",
                SanctumRoom::new("Secure storage for valuable items", "Keep 1 item when you die"),
            ),
        ]
        .into_iter()
        .map(|(key, room)| (key.to_string(), room))
        .collect();

        Self { materials, rooms }
    }
}

/// Sanctum progress bound to a store. Every successful mutation writes the
/// whole snapshot back; write failures are logged and otherwise ignored.
pub struct Sanctum {
    state: SanctumState,
    storage: Box<dyn KeyValueStore>,
}

impl Sanctum {
    /// Restores the stored snapshot, starting fresh when nothing usable is
    /// stored.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        let state = match storage.load(STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!("Discarding unreadable sanctum data: {}", err);
                SanctumState::default()
            }),
            Ok(None) => SanctumState::default(),
            Err(err) => {
                tracing::warn!("Failed to load sanctum data: {}", err);
                SanctumState::default()
            }
        };
        Self { state, storage }
    }

    pub fn state(&self) -> &SanctumState {
        &self.state
    }

    pub fn material(&self, name: &str) -> u32 {
        self.state.materials.get(name).copied().unwrap_or(0)
    }

    pub fn room(&self, key: &str) -> Option<&SanctumRoom> {
        self.state.rooms.get(key)
    }

    pub fn add_material(&mut self, name: &str, quantity: u32) {
        *self.state.materials.entry(name.to_string()).or_insert(0) += quantity;
        tracing::debug!(material = name, quantity, "material stored");
        self.persist();
    }

    /// Materials needed to take `key` to its next level; empty for unknown
    /// rooms.
    pub fn room_upgrade_cost(&self, key: &str) -> BTreeMap<String, u32> {
        let Some(room) = self.room(key) else {
            return BTreeMap::new();
        };
        BASE_UPGRADE_COST
            .iter()
            .map(|(name, base)| (name.to_string(), base * room.level))
            .collect()
    }

    pub fn can_upgrade_room(&self, key: &str) -> bool {
        match self.room(key) {
            Some(room) if room.level < MAX_ROOM_LEVEL => self
                .room_upgrade_cost(key)
                .iter()
                .all(|(name, needed)| self.material(name) >= *needed),
            _ => false,
        }
    }

    pub fn upgrade_room(&mut self, key: &str) -> bool {
        if !self.can_upgrade_room(key) {
            tracing::debug!(room = key, "upgrade refused");
            return false;
        }

        for (name, needed) in self.room_upgrade_cost(key) {
            if let Some(held) = self.state.materials.get_mut(&name) {
                *held -= needed;
            }
        }
        let Some(room) = self.state.rooms.get_mut(key) else {
            return false;
        };
        room.level += 1;
        room.effects.push(format!("Level {} bonus", room.level));
        tracing::info!(room = key, level = room.level, "room upgraded");

        self.persist();
        true
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.state)
            .map_err(storage::StorageError::from)
            .and_then(|json| self.storage.save(STORAGE_KEY, &json));
        if let Err(err) = result {
            tracing::warn!("Failed to persist sanctum: {}", err);
        }
    }
}
