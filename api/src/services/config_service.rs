//! Fine-grained overrides on individual agent configurations, distinct from
//! the strategy's bulk replace-on-update path.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait,
};
use shared::entity::{agents, strategies, user_agent_configs};
use shared::models::{voting_power_in_bounds, AgentView, ConfigDetailView, UpdateConfigRequest};

use crate::error::{ApiError, ApiResult};

pub struct ConfigService {
    db: Arc<DatabaseConnection>,
}

impl ConfigService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn load(
        &self,
        config_id: u64,
    ) -> ApiResult<(user_agent_configs::Model, strategies::Model)> {
        let config = user_agent_configs::Entity::find_by_id(config_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Agent configuration not found".to_string()))?;

        let strategy = strategies::Entity::find_by_id(config.strategy_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ApiError::Internal("Configuration references a missing strategy".to_string())
            })?;

        Ok((config, strategy))
    }

    async fn load_agent(&self, agent_id: u64) -> ApiResult<agents::Model> {
        agents::Entity::find_by_id(agent_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ApiError::Internal("Configuration references a missing agent".to_string())
            })
    }

    fn ensure_owner(strategy: &strategies::Model, acting_user_id: u64) -> ApiResult<()> {
        if strategy.user_id == acting_user_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Configuration belongs to a different user".to_string(),
            ))
        }
    }

    pub async fn get(&self, config_id: u64, acting_user_id: u64) -> ApiResult<ConfigDetailView> {
        let (config, strategy) = self.load(config_id).await?;
        Self::ensure_owner(&strategy, acting_user_id)?;

        let agent = self.load_agent(config.agent_id).await?;
        Ok(ConfigDetailView::new(
            config,
            strategy.name,
            AgentView::from(agent),
        ))
    }

    pub async fn update(
        &self,
        config_id: u64,
        acting_user_id: u64,
        request: UpdateConfigRequest,
    ) -> ApiResult<ConfigDetailView> {
        if let Some(voting_power) = request.voting_power {
            if !voting_power_in_bounds(voting_power) {
                return Err(ApiError::Validation(format!(
                    "votingPower must be between 0 and 1, got {voting_power}"
                )));
            }
        }

        let (config, strategy) = self.load(config_id).await?;
        Self::ensure_owner(&strategy, acting_user_id)?;

        let mut active: user_agent_configs::ActiveModel = config.into();
        if let Some(voting_power) = request.voting_power {
            active.voting_power = Set(voting_power);
        }
        if let Some(custom_prompt) = request.custom_prompt {
            active.custom_prompt = Set(Some(custom_prompt));
        }
        if let Some(code) = request.code {
            active.code = Set(Some(code));
        }
        active.updated_at = Set(Utc::now());
        let config = active.update(self.db.as_ref()).await?;

        let agent = self.load_agent(config.agent_id).await?;
        Ok(ConfigDetailView::new(
            config,
            strategy.name,
            AgentView::from(agent),
        ))
    }

    pub async fn delete(&self, config_id: u64, acting_user_id: u64) -> ApiResult<()> {
        let (config, strategy) = self.load(config_id).await?;
        Self::ensure_owner(&strategy, acting_user_id)?;

        user_agent_configs::Entity::delete_by_id(config.id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn strategy_row(id: u64, user_id: u64) -> strategies::Model {
        let now = Utc::now();
        strategies::Model {
            id,
            user_id,
            name: "BTC EMA".to_string(),
            description: None,
            risk: "Medium".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn config_row(id: u64, strategy_id: u64) -> user_agent_configs::Model {
        let now = Utc::now();
        user_agent_configs::Model {
            id,
            user_id: 1,
            strategy_id,
            agent_id: 3,
            voting_power: 0.5,
            custom_prompt: None,
            code: None,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn agent_row(id: u64) -> agents::Model {
        let now = Utc::now();
        agents::Model {
            id,
            name: "Sentiment Agent".to_string(),
            kind: "sentiment".to_string(),
            prompt: "p".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_update_rejects_out_of_bounds_voting_power() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = ConfigService::new(Arc::new(db));

        let request = UpdateConfigRequest {
            voting_power: Some(1.5),
            ..Default::default()
        };
        let result = service.update(9, 1, request).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_enforces_ownership() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![config_row(9, 4)]])
            .append_query_results([vec![strategy_row(4, 1)]])
            .into_connection();
        let service = ConfigService::new(Arc::new(db));

        let result = service.get(9, 2).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_returns_populated_detail() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![config_row(9, 4)]])
            .append_query_results([vec![strategy_row(4, 1)]])
            .append_query_results([vec![agent_row(3)]])
            .into_connection();
        let service = ConfigService::new(Arc::new(db));

        let detail = service.get(9, 1).await.unwrap();
        assert_eq!(detail.id, 9);
        assert_eq!(detail.strategy_name, "BTC EMA");
        assert_eq!(detail.agent.name, "Sentiment Agent");
    }

    #[tokio::test]
    async fn test_get_missing_config_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<user_agent_configs::Model>::new()])
            .into_connection();
        let service = ConfigService::new(Arc::new(db));

        let result = service.get(99, 1).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
