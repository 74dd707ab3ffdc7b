use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAgentConfigs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserAgentConfigs::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(UserAgentConfigs::UserId).big_unsigned().not_null())
                    .col(ColumnDef::new(UserAgentConfigs::StrategyId).big_unsigned().not_null())
                    // no foreign key on agent_id; existence is checked at write time
                    .col(ColumnDef::new(UserAgentConfigs::AgentId).big_unsigned().not_null())
                    .col(ColumnDef::new(UserAgentConfigs::VotingPower).double().not_null()) // [0, 1]
                    .col(ColumnDef::new(UserAgentConfigs::CustomPrompt).text().null())
                    .col(ColumnDef::new(UserAgentConfigs::Code).text().null())
                    .col(ColumnDef::new(UserAgentConfigs::Position).integer().not_null().default(0))
                    .col(ColumnDef::new(UserAgentConfigs::CreatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(UserAgentConfigs::UpdatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_configs_strategy")
                            .table(UserAgentConfigs::Table)
                            .col(UserAgentConfigs::StrategyId)
                    )
                    .index(
                        Index::create()
                            .name("idx_configs_agent")
                            .table(UserAgentConfigs::Table)
                            .col(UserAgentConfigs::AgentId)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_configs_user")
                            .from(UserAgentConfigs::Table, UserAgentConfigs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_configs_strategy")
                            .from(UserAgentConfigs::Table, UserAgentConfigs::StrategyId)
                            .to(Strategies::Table, Strategies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserAgentConfigs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserAgentConfigs {
    Table,
    Id,
    UserId,
    StrategyId,
    AgentId,
    VotingPower,
    CustomPrompt,
    Code,
    Position,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Strategies {
    Table,
    Id,
}
