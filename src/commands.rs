// src/commands.rs
//! Command handlers for the recipe-finder CLI

use anyhow::{Context, Result};
use recipe_finder::{
    AppConfig, AuthGate, Category, FavoritesBackend, FavoritesController, FeedController,
    HttpFavoritesBackend, HttpMealSource, LocalSession, LogSurface, MealApi, Recipe,
    RecipeDetail, SearchController, transform,
};
use std::sync::Arc;
use tracing::info;

/// Clients wired from the configuration
pub struct Services {
    pub api: MealApi,
    pub backend: Arc<dyn FavoritesBackend>,
    pub gate: AuthGate,
    pub config: AppConfig,
}

impl Services {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let source = HttpMealSource::with_timeout(&config.mealdb.base_url, config.mealdb_timeout()?)
            .context("Failed to create meal API client")?;
        let backend =
            HttpFavoritesBackend::with_timeout(&config.favorites.base_url, config.favorites_timeout()?)
                .context("Failed to create favorites client")?;
        let session = LocalSession::new(config.session.user_id.clone());

        Ok(Self {
            api: MealApi::new(Arc::new(source)),
            backend: Arc::new(backend),
            gate: AuthGate::new(Arc::new(session), Arc::new(LogSurface)),
            config,
        })
    }

    fn detail(&self) -> RecipeDetail {
        RecipeDetail::new(self.api.clone(), self.backend.clone(), self.gate.clone())
    }
}

fn print_summary(recipe: &Recipe) {
    println!("{:>8}  {} [{}]", recipe.id, recipe.title, recipe.category);
}

fn print_recipe(recipe: &Recipe, saved: bool) {
    println!("{} ({})", recipe.title, recipe.id);
    println!("  Category: {}", recipe.category);
    if let Some(area) = &recipe.area {
        println!("  Cuisine: {}", area);
    }
    println!("  Cook time: {}", recipe.cook_time);
    println!("  Servings: {}", recipe.servings);
    if saved {
        println!("  Saved to favorites");
    }
    if let Some(video) = recipe.video_url() {
        println!("  Video: {}", video);
    }

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }

    println!("\nInstructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

pub async fn cmd_search(services: &Services, query: &str) -> Result<()> {
    let search = SearchController::new(services.api.clone());
    let results = search.search(query).await;

    if results.is_empty() {
        println!("No recipes found for '{}'", query.trim());
        return Ok(());
    }
    for recipe in &results {
        print_summary(recipe);
    }
    Ok(())
}

pub async fn cmd_show(services: &Services, id: &str) -> Result<()> {
    let detail = services.detail();
    let recipe = detail.load(id).await?;
    print_recipe(&recipe, detail.state().is_saved);
    Ok(())
}

pub async fn cmd_random(services: &Services, count: usize) -> Result<()> {
    if count == 1 {
        let meal = services.api.get_random().await.into_value();
        let recipe = transform(meal.as_ref()).context("The meal API returned no recipe")?;
        print_recipe(&recipe, false);
        return Ok(());
    }

    let meals = services.api.get_random_batch(count).await;
    for meal in &meals {
        if let Some(recipe) = transform(Some(meal)) {
            print_summary(&recipe);
        }
    }
    Ok(())
}

pub async fn cmd_categories(services: &Services) -> Result<()> {
    let categories = Category::enumerate(services.api.list_categories().await.into_value());
    for category in &categories {
        println!("{:>3}  {}", category.id, category.name);
    }
    Ok(())
}

pub async fn cmd_feed(services: &Services, category: Option<&str>, pages: usize) -> Result<()> {
    let feed = FeedController::new(services.api.clone(), services.config.feed_config());
    feed.load_initial().await;

    if let Some(category) = category {
        feed.select_category(category).await;
    }
    for _ in 1..pages {
        if !feed.load_more().await {
            break;
        }
    }

    let state = feed.state();
    if category.is_none() && !state.featured.is_empty() {
        println!("Featured:");
        for recipe in &state.featured {
            print_summary(recipe);
        }
        println!();
    }

    match &state.selected_category {
        Some(name) => println!(
            "{} ({} of {} recipes)",
            name,
            state.recipes.len(),
            state.category_meal_ids.len()
        ),
        None => println!("Recipes:"),
    }
    for recipe in &state.recipes {
        print_summary(recipe);
    }
    if state.has_more {
        println!("\nMore available: use --pages {}", pages + 1);
    }
    Ok(())
}

pub async fn cmd_favorites_list(services: &Services) -> Result<()> {
    let favorites = FavoritesController::new(services.backend.clone(), services.gate.clone());
    favorites.load_favorites().await?;

    let list = favorites.favorites();
    if list.is_empty() {
        println!("No saved recipes");
        return Ok(());
    }
    for favorite in &list {
        println!(
            "{:>8}  {} ({}, serves {})",
            favorite.recipe_id, favorite.title, favorite.cook_time, favorite.servings
        );
    }
    Ok(())
}

/// Bring the saved state of `id` to `save`
pub async fn cmd_favorites_set(services: &Services, id: &str, save: bool) -> Result<()> {
    let detail = services.detail();
    let recipe = detail.load(id).await?;

    if detail.state().is_saved == save {
        println!(
            "{} is {}",
            recipe.title,
            if save { "already saved" } else { "not saved" }
        );
        return Ok(());
    }

    if !detail.toggle_save().await? {
        anyhow::bail!("Sign in required: set [session] user_id in the config file");
    }
    info!("Updated favorite {}", id);
    println!(
        "{} {}",
        if save { "Saved" } else { "Removed" },
        recipe.title
    );
    Ok(())
}
