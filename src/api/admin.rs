//! Recipe administration: an HTML dashboard plus a JSON API over the
//! recipe, ingredient and user tables.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;
use tracing::info;

use super::validation::{
    validate_email, validate_id, validate_name, validate_recipe,
};
use super::{
    ApiError, ApiResponse, AppState, CreateUserRequest, IngredientDto, IngredientRequest,
    RecipeDto, RecipeRequest, UserDto,
};
use crate::db::RecipeDraft;
use crate::web::views::{DashboardCounts, render_dashboard};

const DASHBOARD_TITLE: &str = "Recipe book";

/// `GET /admin`
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let store = state.store();
    let counts = DashboardCounts {
        recipes: store.count_recipes().await?,
        ingredients: store.count_ingredients().await?,
        favorites: store.count_favorite_recipes().await?,
    };

    Ok(Html(render_dashboard(DASHBOARD_TITLE, counts)))
}

// ============================================================================
// Ingredients
// ============================================================================

pub async fn list_ingredients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<IngredientDto>>>, ApiError> {
    let ingredients = state.store().list_ingredients().await?;
    Ok(Json(ApiResponse::success(
        ingredients.into_iter().map(IngredientDto::from).collect(),
    )))
}

pub async fn get_ingredient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<IngredientDto>>, ApiError> {
    let id = validate_id("ingredient", id)?;
    let ingredient = state
        .store()
        .get_ingredient(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Ingredient", id))?;

    Ok(Json(ApiResponse::success(ingredient.into())))
}

pub async fn create_ingredient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngredientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<IngredientDto>>), ApiError> {
    let name = validate_name("Ingredient name", &request.name)?;

    if state.store().find_ingredient_by_name(name).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "Ingredient '{}' already exists",
            name
        )));
    }

    let ingredient = state.store().create_ingredient(name).await?;
    info!(id = ingredient.id, name = %ingredient.name, "Created ingredient");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ingredient.into())),
    ))
}

pub async fn rename_ingredient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<IngredientRequest>,
) -> Result<Json<ApiResponse<IngredientDto>>, ApiError> {
    let id = validate_id("ingredient", id)?;
    let name = validate_name("Ingredient name", &request.name)?;

    if let Some(existing) = state.store().find_ingredient_by_name(name).await?
        && existing.id != id
    {
        return Err(ApiError::conflict(format!(
            "Ingredient '{}' already exists",
            name
        )));
    }

    let ingredient = state
        .store()
        .rename_ingredient(id, name)
        .await?
        .ok_or_else(|| ApiError::not_found("Ingredient", id))?;

    Ok(Json(ApiResponse::success(ingredient.into())))
}

pub async fn delete_ingredient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id("ingredient", id)?;
    if !state.store().delete_ingredient(id).await? {
        return Err(ApiError::not_found("Ingredient", id));
    }

    info!(id, "Deleted ingredient");
    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Recipes
// ============================================================================

/// Rejects references to ingredients or users that do not exist.
async fn check_references(state: &AppState, request: &RecipeRequest) -> Result<(), ApiError> {
    let missing = state
        .store()
        .missing_ingredient_ids(&request.ingredient_ids)
        .await?;
    if !missing.is_empty() {
        let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
        return Err(ApiError::validation(format!(
            "Unknown ingredient IDs: {}",
            ids.join(", ")
        )));
    }

    if let Some(creator_id) = request.creator_id
        && state.store().get_user(creator_id).await?.is_none()
    {
        return Err(ApiError::validation(format!(
            "Unknown creator ID: {}",
            creator_id
        )));
    }

    Ok(())
}

fn into_draft(request: RecipeRequest) -> RecipeDraft {
    RecipeDraft {
        name: request.name.trim().to_string(),
        description: request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        duration_minutes: request.duration_minutes,
        servings: request.servings,
        difficulty: request.difficulty,
        price: request.price,
        is_favorite: request.is_favorite,
        creator_id: request.creator_id,
        ingredient_ids: request.ingredient_ids,
    }
}

async fn load_recipe(state: &AppState, id: i32) -> Result<RecipeDto, ApiError> {
    state
        .store()
        .get_recipe(id)
        .await?
        .map(RecipeDto::from)
        .ok_or_else(|| ApiError::not_found("Recipe", id))
}

pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<RecipeDto>>>, ApiError> {
    let recipes = state.store().list_recipes().await?;
    Ok(Json(ApiResponse::success(
        recipes.into_iter().map(RecipeDto::from).collect(),
    )))
}

pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RecipeDto>>, ApiError> {
    let id = validate_id("recipe", id)?;
    Ok(Json(ApiResponse::success(load_recipe(&state, id).await?)))
}

pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RecipeDto>>), ApiError> {
    validate_recipe(&request)?;
    check_references(&state, &request).await?;

    let recipe = state.store().create_recipe(into_draft(request)).await?;
    info!(id = recipe.id, name = %recipe.name, "Created recipe");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(load_recipe(&state, recipe.id).await?)),
    ))
}

pub async fn replace_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<RecipeRequest>,
) -> Result<Json<ApiResponse<RecipeDto>>, ApiError> {
    let id = validate_id("recipe", id)?;
    validate_recipe(&request)?;
    check_references(&state, &request).await?;

    state
        .store()
        .replace_recipe(id, into_draft(request))
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe", id))?;

    Ok(Json(ApiResponse::success(load_recipe(&state, id).await?)))
}

pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id("recipe", id)?;
    if !state.store().delete_recipe(id).await? {
        return Err(ApiError::not_found("Recipe", id));
    }

    info!(id, "Deleted recipe");
    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Users
// ============================================================================

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.store().list_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let email = validate_email(&request.email)?;
    let display_name = validate_name("Display name", &request.display_name)?;

    if state.store().find_user_by_email(email).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "A user with email '{}' already exists",
            email
        )));
    }

    let user = state.store().create_user(email, display_name).await?;
    info!(id = user.id, "Created user");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}
