use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Agents::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(Agents::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Agents::Kind).string().not_null()) // "sentiment", "technical", ...
                    .col(ColumnDef::new(Agents::Prompt).text().not_null())
                    .col(ColumnDef::new(Agents::CreatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Agents::UpdatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Agents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Agents {
    Table,
    Id,
    Name,
    Kind,
    Prompt,
    CreatedAt,
    UpdatedAt,
}
