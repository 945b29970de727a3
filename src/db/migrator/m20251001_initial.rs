use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Ingredients)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // The creator column arrives in a later migration.
        manager
            .create_table(
                Table::create()
                    .table(RecipesTable::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipesTable::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipesTable::Name).string().not_null())
                    .col(ColumnDef::new(RecipesTable::Description).text().null())
                    .col(ColumnDef::new(RecipesTable::DurationMinutes).integer().null())
                    .col(ColumnDef::new(RecipesTable::Servings).integer().null())
                    .col(ColumnDef::new(RecipesTable::Difficulty).integer().null())
                    .col(ColumnDef::new(RecipesTable::Price).double().null())
                    .col(
                        ColumnDef::new(RecipesTable::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(RecipesTable::CreatedAt).string().not_null())
                    .col(ColumnDef::new(RecipesTable::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(RecipeIngredients)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeIngredients).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipesTable::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum RecipesTable {
    #[sea_orm(iden = "recipes")]
    Table,
    Id,
    Name,
    Description,
    DurationMinutes,
    Servings,
    Difficulty,
    Price,
    IsFavorite,
    CreatedAt,
    UpdatedAt,
}
