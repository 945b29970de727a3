use serde::{Deserialize, Serialize};

use crate::db::RecipeWithIngredients;
use crate::entities::{ingredients, users};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: u64,
    pub database_ok: bool,
    pub cached_keys: usize,
}

#[derive(Debug, Serialize, Clone)]
pub struct IngredientDto {
    pub id: i32,
    pub name: String,
    pub created_at: String,
}

impl From<ingredients::Model> for IngredientDto {
    fn from(model: ingredients::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<i32>,
    pub price: Option<f64>,
    pub is_favorite: bool,
    pub creator_id: Option<i32>,
    pub ingredients: Vec<IngredientDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RecipeWithIngredients> for RecipeDto {
    fn from((recipe, ingredients): RecipeWithIngredients) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            description: recipe.description,
            duration_minutes: recipe.duration_minutes,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            price: recipe.price,
            is_favorite: recipe.is_favorite,
            creator_id: recipe.creator_id,
            ingredients: ingredients.into_iter().map(IngredientDto::from).collect(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub created_at: String,
}

impl From<users::Model> for UserDto {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IngredientRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub creator_id: Option<i32>,
    #[serde(default)]
    pub ingredient_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
}
