use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Consumable,
    Material,
    Artifact,
    Equipment,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub icon: String,
    pub quantity: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ItemKind,
        icon: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            icon: icon.into(),
            quantity: 1,
            description: description.into(),
            effects: Vec::new(),
        }
    }

    pub fn with_effects(mut self, effects: &[&str]) -> Self {
        self.effects = effects.iter().map(|e| e.to_string()).collect();
        self
    }
}

/// Lowercase, dash-separated form of a display name: "Iron Ore" -> "iron-ore".
pub fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Mints item ids of the form `<stem>-<unix millis>-<seq>`. The sequence
/// keeps ids unique when several items are minted in the same millisecond.
#[derive(Debug, Default)]
pub struct ItemIds {
    next: u64,
}

impl ItemIds {
    pub fn mint(&mut self, stem: &str) -> String {
        let seq = self.next;
        self.next += 1;
        format!("{}-{}-{}", stem, Utc::now().timestamp_millis(), seq)
    }
}

#[derive(Clone, Debug)]
pub struct DropEntry {
    pub name: &'static str,
    pub icon: &'static str,
    pub chance: f32,
}

pub static DROP_TABLE: [DropEntry; 4] = [
    DropEntry::new("Magic Shard", "💎", 0.3),
    DropEntry::new("Iron Ore", "⚡", 0.4),
    DropEntry::new("Ancient Bone", "🦴", 0.2),
    DropEntry::new("Dark Crystal", "🔮", 0.1),
];

impl DropEntry {
    pub const fn new(name: &'static str, icon: &'static str, chance: f32) -> Self {
        Self { name, icon, chance }
    }
}

pub const HEALTH_POTION: &str = "Health Potion";

pub fn starter_items() -> Vec<Item> {
    vec![
        Item::new(
            "health-potion-1",
            HEALTH_POTION,
            ItemKind::Consumable,
            "🧪",
            "Restores 50 health",
        ),
        Item::new(
            "magic-shard-1",
            "Magic Shard",
            ItemKind::Material,
            "💎",
            "A fragment of ancient magic",
        ),
        Item::new(
            "iron-ore-1",
            "Iron Ore",
            ItemKind::Material,
            "⚡",
            "Raw iron for crafting",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_lowercase_and_dashed() {
        assert_eq!(slug("Magic Shard"), "magic-shard");
        assert_eq!(slug("  Dark   Crystal "), "dark-crystal");
    }

    #[test]
    fn minted_ids_never_repeat() {
        let mut ids = ItemIds::default();
        let a = ids.mint("iron-ore");
        let b = ids.mint("iron-ore");
        assert_ne!(a, b);
        assert!(a.starts_with("iron-ore-"));
    }

    #[test]
    fn items_serialize_with_a_type_field() {
        let json = serde_json::to_value(&starter_items()[0]).unwrap();
        assert_eq!(json["type"], "consumable");
        assert!(json.get("effects").is_none());
    }
}
