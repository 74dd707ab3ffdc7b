pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_agents;
mod m20250602_000001_create_strategies;
mod m20250602_000002_create_user_agent_configs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_agents::Migration),
            Box::new(m20250602_000001_create_strategies::Migration),
            Box::new(m20250602_000002_create_user_agent_configs::Migration),
        ]
    }
}
