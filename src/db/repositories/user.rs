use crate::entities::{prelude::*, users};
use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<users::Model>> {
        Ok(Users::find().all(&self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<users::Model>> {
        Ok(Users::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        Ok(Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?)
    }

    pub async fn create(&self, email: &str, display_name: &str) -> Result<users::Model> {
        let model = users::ActiveModel {
            email: Set(email.to_string()),
            display_name: Set(display_name.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }
}
