use crate::entities::{ingredients, prelude::*};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

pub struct IngredientRepository {
    conn: DatabaseConnection,
}

impl IngredientRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<ingredients::Model>> {
        Ok(Ingredients::find()
            .order_by_asc(ingredients::Column::Name)
            .all(&self.conn)
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<ingredients::Model>> {
        Ok(Ingredients::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<ingredients::Model>> {
        Ok(Ingredients::find()
            .filter(ingredients::Column::Name.eq(name))
            .one(&self.conn)
            .await?)
    }

    /// Ids from `ids` that do not match any ingredient.
    pub async fn missing_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let found: Vec<i32> = Ingredients::find()
            .filter(ingredients::Column::Id.is_in(ids.to_vec()))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    pub async fn create(&self, name: &str) -> Result<ingredients::Model> {
        let model = ingredients::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn rename(&self, id: i32, name: &str) -> Result<Option<ingredients::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: ingredients::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        Ok(Some(active.update(&self.conn).await?))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Ingredients::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Ingredients::find().count(&self.conn).await?)
    }
}
