// src/recipe/mapping.rs
//! Raw meal record -> `Recipe`

use super::Recipe;
use crate::mealdb::{INGREDIENT_SLOTS, RawMeal};

/// Placeholder cook time; the meal API does not provide one
pub const DEFAULT_COOK_TIME: &str = "30 minutes";

/// Placeholder serving count; the meal API does not provide one
pub const DEFAULT_SERVINGS: u32 = 4;

/// Category used when the record carries none
pub const DEFAULT_CATEGORY: &str = "Main Course";

/// Description used when the record has no instructions
pub const DESCRIPTION_FALLBACK: &str = "Delicious meal from TheMealDB";

/// Characters of the instructions shown as the description
pub const DESCRIPTION_PREVIEW_CHARS: usize = 120;

/// Build a recipe from a raw record; `None` in, `None` out
pub fn transform(meal: Option<&RawMeal>) -> Option<Recipe> {
    let meal = meal?;

    Some(Recipe {
        id: meal.id.clone().unwrap_or_default(),
        title: meal.name.clone().unwrap_or_default(),
        description: describe(meal.instructions.as_deref()),
        image: meal.thumbnail.clone().unwrap_or_default(),
        cook_time: DEFAULT_COOK_TIME.to_string(),
        servings: DEFAULT_SERVINGS,
        category: non_blank(meal.category.as_deref())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string(),
        area: meal.area.clone(),
        ingredients: ingredients(meal),
        instructions: instructions(meal.instructions.as_deref()),
        original_data: meal.clone(),
    })
}

/// Transform a batch, dropping nothing but absent records
pub fn transform_all(meals: &[RawMeal]) -> Vec<Recipe> {
    meals.iter().filter_map(|meal| transform(Some(meal))).collect()
}

/// `"<measure> <ingredient>"` for every filled slot, in slot order
///
/// Slots are checked independently, so a gap does not end the list.
fn ingredients(meal: &RawMeal) -> Vec<String> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let ingredient = non_blank(meal.ingredient(slot))?;
            Some(match non_blank(meal.measure(slot)) {
                Some(measure) => format!("{measure} {ingredient}"),
                None => ingredient.to_string(),
            })
        })
        .collect()
}

fn instructions(blob: Option<&str>) -> Vec<String> {
    let Some(blob) = blob else {
        return Vec::new();
    };

    // `lines` splits on both "\n" and "\r\n"
    blob.lines()
        .filter(|step| !step.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn describe(blob: Option<&str>) -> String {
    match blob.filter(|text| !text.is_empty()) {
        Some(text) => {
            let preview: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
            format!("{preview}...")
        }
        None => DESCRIPTION_FALLBACK.to_string(),
    }
}

/// Trimmed value, or `None` when absent or whitespace-only
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
