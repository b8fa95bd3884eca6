use crate::data::items::{Item, ItemIds};
use crate::data::recipes::{Recipe, recipe};

use super::Inventory;

impl Inventory {
    pub fn can_craft(&self, recipe: &Recipe) -> bool {
        recipe
            .ingredients
            .iter()
            .all(|ingredient| self.count(ingredient.name) >= ingredient.quantity)
    }

    /// Consumes the recipe's ingredients and adds the crafted item. Returns
    /// the new item's name, or `None` for unknown recipes and missing
    /// ingredients.
    pub fn craft(&mut self, recipe_id: &str, ids: &mut ItemIds) -> Option<String> {
        let recipe = recipe(recipe_id)?;
        if !self.can_craft(recipe) {
            tracing::debug!(recipe = recipe.id, "missing ingredients");
            return None;
        }

        for ingredient in recipe.ingredients {
            self.remove_by_name(ingredient.name, ingredient.quantity);
        }

        let result = &recipe.result;
        let item = Item::new(
            ids.mint(recipe.id),
            result.name,
            result.kind,
            result.icon,
            result.description,
        )
        .with_effects(result.effects);
        let name = item.name.clone();
        tracing::info!(recipe = recipe.id, item = %name, "crafted");
        self.add_item(item);
        Some(name)
    }
}
