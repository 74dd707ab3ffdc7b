//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "agents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    #[sea_orm(unique)]
    pub name: String,
    pub kind: String, // "sentiment", "technical", "fundamental", "supervisor", "executor", "websearch"
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_agent_configs::Entity")]
    UserAgentConfigs,
}

impl Related<super::user_agent_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAgentConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
