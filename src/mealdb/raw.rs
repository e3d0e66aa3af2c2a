// src/mealdb/raw.rs
//! Raw records as returned by the meal API
//!
//! The upstream schema is loose: filter endpoints return partial records,
//! ingredient slots are often `null` or empty strings, and identifiers are
//! strings that occasionally arrive as numbers. Every field is therefore
//! optional and decoded leniently; nothing here fails on shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Number of paired ingredient/measure slots in a meal record
pub const INGREDIENT_SLOTS: usize = 20;

/// A meal record in the upstream API's native shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMeal {
    #[serde(rename = "idMeal", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "strMeal", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "strMealThumb", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    #[serde(rename = "strCategory", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(rename = "strArea", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(rename = "strInstructions", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(rename = "strYoutube", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,

    #[serde(rename = "strSource", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(rename = "strTags", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// Ingredient/measure slots and any field not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawMeal {
    /// Ingredient in slot `index` (1-based), if it holds a string
    pub fn ingredient(&self, index: usize) -> Option<&str> {
        self.slot("strIngredient", index)
    }

    /// Measure in slot `index` (1-based), if it holds a string
    pub fn measure(&self, index: usize) -> Option<&str> {
        self.slot("strMeasure", index)
    }

    fn slot(&self, prefix: &str, index: usize) -> Option<&str> {
        self.extra
            .get(&format!("{prefix}{index}"))
            .and_then(Value::as_str)
    }

    /// Identifier, if present and non-blank
    pub fn meal_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// A category record in the upstream API's native shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "idCategory", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "strCategory", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "strCategoryThumb", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    #[serde(rename = "strCategoryDescription", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Accept strings and numbers, map everything else (null, bool, objects) to `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
