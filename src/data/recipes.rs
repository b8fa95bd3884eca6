use super::items::ItemKind;

#[derive(Clone, Debug)]
pub struct Ingredient {
    pub name: &'static str,
    pub quantity: u32,
}

#[derive(Clone, Debug)]
pub struct RecipeResult {
    pub name: &'static str,
    pub kind: ItemKind,
    pub icon: &'static str,
    pub description: &'static str,
    pub effects: &'static [&'static str],
}

#[derive(Clone, Debug)]
pub struct Recipe {
    pub id: &'static str,
    pub name: &'static str,
    pub ingredients: &'static [Ingredient],
    pub result: RecipeResult,
}

const fn ingredient(name: &'static str, quantity: u32) -> Ingredient {
    Ingredient { name, quantity }
}

pub static RECIPES: [Recipe; 3] = [
    Recipe {
        id: "basic-sword",
        name: "Basic Sword",
        ingredients: &[ingredient("Iron Ore", 2), ingredient("Wood", 1)],
        result: RecipeResult {
            name: "Iron Sword",
            kind: ItemKind::Equipment,
            icon: "⚔️",
            description: "A sturdy iron sword that increases attack damage",
            effects: &["+10 attack damage"],
        },
    },
    Recipe {
        id: "health-crystal",
        name: "Health Crystal",
        ingredients: &[ingredient("Magic Shard", 2), ingredient("Health Potion", 1)],
        result: RecipeResult {
            name: "Health Crystal",
            kind: ItemKind::Artifact,
            icon: "💚",
            description: "Permanently increases maximum health",
            effects: &["+25 max health"],
        },
    },
    Recipe {
        id: "speed-boots",
        name: "Speed Boots",
        ingredients: &[ingredient("Leather", 2), ingredient("Magic Shard", 1)],
        result: RecipeResult {
            name: "Speed Boots",
            kind: ItemKind::Equipment,
            icon: "👢",
            description: "Increases movement speed",
            effects: &["+50% movement speed"],
        },
    },
];

pub fn recipe(id: &str) -> Option<&'static Recipe> {
    RECIPES.iter().find(|recipe| recipe.id == id)
}
