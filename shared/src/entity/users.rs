//! `SeaORM` Entity, @generated manually

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    #[sea_orm(unique)]
    pub unique_wallet_id: String,
    #[sea_orm(unique)]
    pub wallet_address: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub signature: Option<String>,
    pub is_autonomous_active: bool,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub total_pnl: Decimal,
    pub created_at: DateTimeUtc,
    pub last_login_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::strategies::Entity")]
    Strategies,
    #[sea_orm(has_many = "super::user_agent_configs::Entity")]
    UserAgentConfigs,
}

impl Related<super::strategies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Strategies.def()
    }
}

impl Related<super::user_agent_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAgentConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
