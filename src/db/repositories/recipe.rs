use crate::entities::{ingredients, prelude::*, recipe_ingredients, recipes};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// Field values for creating or fully replacing a recipe.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<i32>,
    pub price: Option<f64>,
    pub is_favorite: bool,
    pub creator_id: Option<i32>,
    pub ingredient_ids: Vec<i32>,
}

pub type RecipeWithIngredients = (recipes::Model, Vec<ingredients::Model>);

pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<RecipeWithIngredients>> {
        let recipes = Recipes::find()
            .order_by_asc(recipes::Column::Name)
            .all(&self.conn)
            .await?;
        let ingredients = recipes
            .load_many_to_many(Ingredients, RecipeIngredients, &self.conn)
            .await?;

        Ok(recipes.into_iter().zip(ingredients).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<RecipeWithIngredients>> {
        let Some(recipe) = Recipes::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let ingredients = recipe
            .find_related(Ingredients)
            .order_by_asc(ingredients::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(Some((recipe, ingredients)))
    }

    pub async fn create(&self, draft: RecipeDraft) -> Result<recipes::Model> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();

        let recipe = recipes::ActiveModel {
            name: Set(draft.name),
            description: Set(draft.description),
            duration_minutes: Set(draft.duration_minutes),
            servings: Set(draft.servings),
            difficulty: Set(draft.difficulty),
            price: Set(draft.price),
            is_favorite: Set(draft.is_favorite),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            creator_id: Set(draft.creator_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        link_ingredients(&txn, recipe.id, &draft.ingredient_ids).await?;

        txn.commit().await?;
        Ok(recipe)
    }

    pub async fn replace(&self, id: i32, draft: RecipeDraft) -> Result<Option<recipes::Model>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Recipes::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: recipes::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.description = Set(draft.description);
        active.duration_minutes = Set(draft.duration_minutes);
        active.servings = Set(draft.servings);
        active.difficulty = Set(draft.difficulty);
        active.price = Set(draft.price);
        active.is_favorite = Set(draft.is_favorite);
        active.creator_id = Set(draft.creator_id);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let recipe = active.update(&txn).await?;

        RecipeIngredients::delete_many()
            .filter(recipe_ingredients::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?;
        link_ingredients(&txn, id, &draft.ingredient_ids).await?;

        txn.commit().await?;
        Ok(Some(recipe))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Recipes::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Recipes::find().count(&self.conn).await?)
    }

    pub async fn count_favorites(&self) -> Result<u64> {
        Ok(Recipes::find()
            .filter(recipes::Column::IsFavorite.eq(true))
            .count(&self.conn)
            .await?)
    }
}

async fn link_ingredients<C>(conn: &C, recipe_id: i32, ingredient_ids: &[i32]) -> Result<()>
where
    C: sea_orm::ConnectionTrait,
{
    let mut ids = ingredient_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(());
    }

    let links: Vec<recipe_ingredients::ActiveModel> = ids
        .into_iter()
        .map(|ingredient_id| recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(ingredient_id),
        })
        .collect();

    RecipeIngredients::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
