use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CREATOR_INDEX: &str = "idx_recipes_creator_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite cannot add a foreign key through ALTER TABLE ... ADD CONSTRAINT,
        // so the reference is declared inline with the column.
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE recipes ADD COLUMN creator_id INTEGER NULL \
                 REFERENCES users (id) ON DELETE SET NULL ON UPDATE NO ACTION",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(CREATOR_INDEX)
                    .table(Recipes::Table)
                    .col(Recipes::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(CREATOR_INDEX)
                    .table(Recipes::Table)
                    .to_owned(),
            )
            .await?;

        let conn = manager.get_connection();

        // Keep recipe_ingredients pointing at "recipes" while the table is rebuilt.
        conn.execute_unprepared("PRAGMA legacy_alter_table = ON")
            .await?;
        conn.execute_unprepared("ALTER TABLE recipes RENAME TO recipes_old")
            .await?;

        conn.execute_unprepared(
            r"
            CREATE TABLE recipes (
                id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                name VARCHAR NOT NULL,
                description TEXT NULL,
                duration_minutes INTEGER NULL,
                servings INTEGER NULL,
                difficulty INTEGER NULL,
                price DOUBLE NULL,
                is_favorite BOOLEAN NOT NULL DEFAULT FALSE,
                created_at VARCHAR NOT NULL,
                updated_at VARCHAR NOT NULL
            )
        ",
        )
        .await?;

        conn.execute_unprepared(
            r"
            INSERT INTO recipes (
                id, name, description, duration_minutes, servings, difficulty, price,
                is_favorite, created_at, updated_at
            )
            SELECT
                id, name, description, duration_minutes, servings, difficulty, price,
                is_favorite, created_at, updated_at
            FROM recipes_old
        ",
        )
        .await?;

        conn.execute_unprepared("DROP TABLE recipes_old").await?;
        conn.execute_unprepared("PRAGMA legacy_alter_table = OFF")
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    CreatorId,
}
