use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{ingredients, recipes, users};

pub mod migrator;
pub mod repositories;

pub use repositories::recipe::{RecipeDraft, RecipeWithIngredients};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if in_memory {
            // Every pooled connection would otherwise get its own empty database.
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn recipe_repo(&self) -> repositories::recipe::RecipeRepository {
        repositories::recipe::RecipeRepository::new(self.conn.clone())
    }

    fn ingredient_repo(&self) -> repositories::ingredient::IngredientRepository {
        repositories::ingredient::IngredientRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    pub async fn list_recipes(&self) -> Result<Vec<RecipeWithIngredients>> {
        self.recipe_repo().list().await
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Option<RecipeWithIngredients>> {
        self.recipe_repo().get(id).await
    }

    pub async fn create_recipe(&self, draft: RecipeDraft) -> Result<recipes::Model> {
        self.recipe_repo().create(draft).await
    }

    pub async fn replace_recipe(
        &self,
        id: i32,
        draft: RecipeDraft,
    ) -> Result<Option<recipes::Model>> {
        self.recipe_repo().replace(id, draft).await
    }

    pub async fn delete_recipe(&self, id: i32) -> Result<bool> {
        self.recipe_repo().delete(id).await
    }

    pub async fn count_recipes(&self) -> Result<u64> {
        self.recipe_repo().count().await
    }

    pub async fn count_favorite_recipes(&self) -> Result<u64> {
        self.recipe_repo().count_favorites().await
    }

    // ========================================================================
    // Ingredients
    // ========================================================================

    pub async fn list_ingredients(&self) -> Result<Vec<ingredients::Model>> {
        self.ingredient_repo().list().await
    }

    pub async fn get_ingredient(&self, id: i32) -> Result<Option<ingredients::Model>> {
        self.ingredient_repo().get(id).await
    }

    pub async fn find_ingredient_by_name(&self, name: &str) -> Result<Option<ingredients::Model>> {
        self.ingredient_repo().find_by_name(name).await
    }

    pub async fn missing_ingredient_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        self.ingredient_repo().missing_ids(ids).await
    }

    pub async fn create_ingredient(&self, name: &str) -> Result<ingredients::Model> {
        self.ingredient_repo().create(name).await
    }

    pub async fn rename_ingredient(
        &self,
        id: i32,
        name: &str,
    ) -> Result<Option<ingredients::Model>> {
        self.ingredient_repo().rename(id, name).await
    }

    pub async fn delete_ingredient(&self, id: i32) -> Result<bool> {
        self.ingredient_repo().delete(id).await
    }

    pub async fn count_ingredients(&self) -> Result<u64> {
        self.ingredient_repo().count().await
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get(id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().find_by_email(email).await
    }

    pub async fn create_user(&self, email: &str, display_name: &str) -> Result<users::Model> {
        self.user_repo().create(email, display_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_recipe_round_trip_with_ingredients() {
        let store = store().await;
        let flour = store.create_ingredient("Flour").await.unwrap();
        let eggs = store.create_ingredient("Eggs").await.unwrap();
        let chef = store.create_user("chef@example.com", "Chef").await.unwrap();

        let recipe = store
            .create_recipe(RecipeDraft {
                name: "Crêpes".to_string(),
                difficulty: Some(2),
                servings: Some(4),
                is_favorite: true,
                creator_id: Some(chef.id),
                ingredient_ids: vec![flour.id, eggs.id, flour.id],
                ..Default::default()
            })
            .await
            .unwrap();

        let (loaded, ingredients) = store.get_recipe(recipe.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Crêpes");
        assert_eq!(loaded.creator_id, Some(chef.id));
        let names: Vec<_> = ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Eggs", "Flour"]);

        assert_eq!(store.count_recipes().await.unwrap(), 1);
        assert_eq!(store.count_favorite_recipes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_swaps_ingredient_links() {
        let store = store().await;
        let salt = store.create_ingredient("Salt").await.unwrap();
        let pepper = store.create_ingredient("Pepper").await.unwrap();

        let recipe = store
            .create_recipe(RecipeDraft {
                name: "Steak".to_string(),
                ingredient_ids: vec![salt.id],
                ..Default::default()
            })
            .await
            .unwrap();

        let replaced = store
            .replace_recipe(
                recipe.id,
                RecipeDraft {
                    name: "Steak au poivre".to_string(),
                    ingredient_ids: vec![pepper.id],
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.name, "Steak au poivre");

        let (_, ingredients) = store.get_recipe(recipe.id).await.unwrap().unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].id, pepper.id);

        assert!(store.replace_recipe(999, RecipeDraft::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_ingredient_unlinks_it() {
        let store = store().await;
        let basil = store.create_ingredient("Basil").await.unwrap();
        let recipe = store
            .create_recipe(RecipeDraft {
                name: "Pesto".to_string(),
                ingredient_ids: vec![basil.id],
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(store.delete_ingredient(basil.id).await.unwrap());
        let (_, ingredients) = store.get_recipe(recipe.id).await.unwrap().unwrap();
        assert!(ingredients.is_empty());
        assert!(!store.delete_ingredient(basil.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_ingredient_ids() {
        let store = store().await;
        let rice = store.create_ingredient("Rice").await.unwrap();
        let missing = store
            .missing_ingredient_ids(&[rice.id, 404])
            .await
            .unwrap();
        assert_eq!(missing, vec![404]);
    }

    #[tokio::test]
    async fn test_creator_migration_rolls_back_and_reapplies() {
        use sea_orm_migration::{MigratorTrait, SchemaManager};

        let store = store().await;
        let thyme = store.create_ingredient("Thyme").await.unwrap();
        let chef = store.create_user("chef@example.com", "Chef").await.unwrap();
        let recipe = store
            .create_recipe(RecipeDraft {
                name: "Roast".to_string(),
                creator_id: Some(chef.id),
                ingredient_ids: vec![thyme.id],
                ..Default::default()
            })
            .await
            .unwrap();

        migrator::Migrator::down(&store.conn, Some(1)).await.unwrap();
        let manager = SchemaManager::new(&store.conn);
        assert!(!manager.has_column("recipes", "creator_id").await.unwrap());
        assert!(!manager.has_index("recipes", "idx_recipes_creator_id").await.unwrap());

        migrator::Migrator::up(&store.conn, None).await.unwrap();
        assert!(manager.has_column("recipes", "creator_id").await.unwrap());

        let (loaded, ingredients) = store.get_recipe(recipe.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Roast");
        assert_eq!(loaded.creator_id, None);
        assert_eq!(ingredients.len(), 1);
    }
}
