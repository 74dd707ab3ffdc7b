use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::UniqueWalletId).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::WalletAddress).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Signature).text().null())
                    .col(ColumnDef::new(Users::IsAutonomousActive).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::TotalPnl).decimal_len(20, 8).not_null().default(0.0))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Users::LastLoginAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_users_wallet_address")
                            .table(Users::Table)
                            .col(Users::WalletAddress)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    UniqueWalletId,
    WalletAddress,
    Signature,
    IsAutonomousActive,
    TotalPnl,
    CreatedAt,
    LastLoginAt,
}
