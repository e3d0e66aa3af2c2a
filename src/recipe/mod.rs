// src/recipe/mod.rs
//! Recipe and category entities
//!
//! Recipes are built only by [`transform`] from a raw meal record and are
//! never patched afterwards; a refresh replaces the whole collection.

mod mapping;

pub use mapping::{
    DEFAULT_CATEGORY, DEFAULT_COOK_TIME, DEFAULT_SERVINGS, DESCRIPTION_FALLBACK,
    DESCRIPTION_PREVIEW_CHARS, transform, transform_all,
};

use crate::mealdb::{RawCategory, RawMeal};
use serde::Serialize;

/// A recipe in the shape the screens render
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub cook_time: String,
    pub servings: u32,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// The record this recipe was built from
    pub original_data: RawMeal,
}

impl Recipe {
    /// Video link carried by the source record, if any
    pub fn video_url(&self) -> Option<&str> {
        self.original_data
            .youtube
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Thumbnail for the recipe's video, if it links to YouTube
    pub fn video_thumbnail(&self) -> Option<String> {
        self.video_url().and_then(youtube_thumbnail)
    }
}

/// Thumbnail URL for a `...watch?v=<id>` YouTube link
pub fn youtube_thumbnail(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("v=")?;
    let video_id = rest.split('&').next().unwrap_or(rest);
    if video_id.is_empty() {
        return None;
    }
    Some(format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg"))
}

/// A meal category
///
/// `id` is the 1-based position in the fetched list, not an upstream
/// identifier, and may change between fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    /// Number categories in response order
    pub fn enumerate(raw: Vec<RawCategory>) -> Vec<Category> {
        raw.into_iter()
            .zip(1..)
            .map(|(category, id)| Category {
                id,
                name: category.name.unwrap_or_default(),
                image: category.thumbnail.unwrap_or_default(),
                description: category.description,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_numbered_from_one() {
        let raw = vec![
            RawCategory {
                id: Some("11".to_string()),
                name: Some("Beef".to_string()),
                thumbnail: Some("https://example.com/beef.png".to_string()),
                description: None,
            },
            RawCategory {
                id: Some("3".to_string()),
                name: Some("Dessert".to_string()),
                ..Default::default()
            },
        ];

        let categories = Category::enumerate(raw);
        assert_eq!(categories[0].id, 1);
        assert_eq!(categories[0].name, "Beef");
        assert_eq!(categories[1].id, 2);
        assert_eq!(categories[1].image, "");
    }

    #[test]
    fn test_youtube_thumbnail() {
        assert_eq!(
            youtube_thumbnail("https://www.youtube.com/watch?v=4aZr5hZXP_s").as_deref(),
            Some("https://img.youtube.com/vi/4aZr5hZXP_s/hqdefault.jpg")
        );
        assert_eq!(
            youtube_thumbnail("https://www.youtube.com/watch?v=abc&t=10").as_deref(),
            Some("https://img.youtube.com/vi/abc/hqdefault.jpg")
        );
        assert!(youtube_thumbnail("https://vimeo.com/123").is_none());
    }
}
