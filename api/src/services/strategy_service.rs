//! Strategy aggregate: owns the agent-configuration composition and enforces
//! creation-time invariants. Multi-row writes run in one transaction.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use shared::entity::{agents, strategies, user_agent_configs, users};
use shared::models::{
    voting_power_in_bounds, AgentEntry, AgentView, CreateStrategyRequest, PopulatedConfigView,
    PopulatedStrategyView, RiskLevel, StrategyView, UpdateStrategyRequest,
};

use crate::error::{ApiError, ApiResult};

pub struct StrategyService {
    db: Arc<DatabaseConnection>,
}

fn validate_entries(entries: &[AgentEntry]) -> ApiResult<()> {
    if entries.is_empty() {
        return Err(ApiError::Validation(
            "At least one agent configuration is required".to_string(),
        ));
    }
    for entry in entries {
        if !voting_power_in_bounds(entry.voting_power) {
            return Err(ApiError::Validation(format!(
                "votingPower must be between 0 and 1, got {}",
                entry.voting_power
            )));
        }
    }
    Ok(())
}

async fn insert_configs(
    txn: &DatabaseTransaction,
    strategy: &strategies::Model,
    entries: &[AgentEntry],
    now: DateTime<Utc>,
) -> ApiResult<Vec<u64>> {
    let mut config_ids = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let config = user_agent_configs::ActiveModel {
            user_id: Set(strategy.user_id),
            strategy_id: Set(strategy.id),
            agent_id: Set(entry.agent_id),
            voting_power: Set(entry.voting_power),
            custom_prompt: Set(entry.custom_prompt.clone()),
            code: Set(entry.code.clone()),
            position: Set(index as i32),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = user_agent_configs::Entity::insert(config)
            .exec_with_returning(txn)
            .await?;
        config_ids.push(created.id);
    }
    Ok(config_ids)
}

impl StrategyService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find(&self, strategy_id: u64) -> ApiResult<strategies::Model> {
        strategies::Entity::find_by_id(strategy_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Strategy not found".to_string()))
    }

    async fn ensure_agents_exist(&self, entries: &[AgentEntry]) -> ApiResult<()> {
        let ids: HashSet<u64> = entries.iter().map(|entry| entry.agent_id).collect();
        let found = agents::Entity::find()
            .filter(agents::Column::Id.is_in(ids.iter().copied().collect::<Vec<_>>()))
            .all(self.db.as_ref())
            .await?;
        if found.len() != ids.len() {
            return Err(ApiError::Validation(
                "One or more agents not found".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(&self, request: CreateStrategyRequest) -> ApiResult<StrategyView> {
        if request.name.trim().is_empty() {
            return Err(ApiError::Validation("Strategy name is required".to_string()));
        }
        let risk = RiskLevel::from_str(&request.risk).map_err(ApiError::Validation)?;
        validate_entries(&request.agents)?;

        users::Entity::find_by_id(request.user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        self.ensure_agents_exist(&request.agents).await?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let strategy = strategies::Entity::insert(strategies::ActiveModel {
            user_id: Set(request.user_id),
            name: Set(request.name),
            description: Set(request.description),
            risk: Set(risk.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec_with_returning(&txn)
        .await?;

        let config_ids = insert_configs(&txn, &strategy, &request.agents, now).await?;

        txn.commit().await?;
        Ok(StrategyView::new(strategy, config_ids))
    }

    pub async fn get_populated(&self, strategy_id: u64) -> ApiResult<PopulatedStrategyView> {
        let strategy = self.find(strategy_id).await?;
        self.populate(strategy).await
    }

    pub async fn get_for_user(
        &self,
        user_id: u64,
        strategy_id: u64,
    ) -> ApiResult<PopulatedStrategyView> {
        let strategy = self.find(strategy_id).await?;
        if strategy.user_id != user_id {
            return Err(ApiError::Forbidden(
                "Strategy belongs to a different user".to_string(),
            ));
        }
        self.populate(strategy).await
    }

    pub async fn list_by_user(&self, user_id: u64) -> ApiResult<Vec<PopulatedStrategyView>> {
        let rows = strategies::Entity::find()
            .filter(strategies::Column::UserId.eq(user_id))
            .order_by_desc(strategies::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let mut views = Vec::with_capacity(rows.len());
        for strategy in rows {
            views.push(self.populate(strategy).await?);
        }
        Ok(views)
    }

    /// Partial field update. A supplied `agents` list replaces the entire
    /// existing config set, it is never merged.
    pub async fn update(
        &self,
        strategy_id: u64,
        acting_user_id: u64,
        request: UpdateStrategyRequest,
    ) -> ApiResult<PopulatedStrategyView> {
        let strategy = self.find(strategy_id).await?;
        if strategy.user_id != acting_user_id {
            return Err(ApiError::Forbidden(
                "Only the strategy owner can modify it".to_string(),
            ));
        }

        if let Some(name) = &request.name {
            if name.trim().is_empty() {
                return Err(ApiError::Validation("Strategy name is required".to_string()));
            }
        }
        let risk = request
            .risk
            .as_deref()
            .map(RiskLevel::from_str)
            .transpose()
            .map_err(ApiError::Validation)?;
        if let Some(entries) = &request.agents {
            validate_entries(entries)?;
            self.ensure_agents_exist(entries).await?;
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let mut active: strategies::ActiveModel = strategy.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(risk) = risk {
            active.risk = Set(risk.as_str().to_string());
        }
        active.updated_at = Set(now);
        let strategy = active.update(&txn).await?;

        if let Some(entries) = request.agents {
            user_agent_configs::Entity::delete_many()
                .filter(user_agent_configs::Column::StrategyId.eq(strategy.id))
                .exec(&txn)
                .await?;
            insert_configs(&txn, &strategy, &entries, now).await?;
        }

        txn.commit().await?;
        self.populate(strategy).await
    }

    pub async fn delete(&self, strategy_id: u64) -> ApiResult<()> {
        let strategy = self.find(strategy_id).await?;

        let txn = self.db.begin().await?;
        user_agent_configs::Entity::delete_many()
            .filter(user_agent_configs::Column::StrategyId.eq(strategy.id))
            .exec(&txn)
            .await?;
        strategies::Entity::delete_by_id(strategy.id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn populate(&self, strategy: strategies::Model) -> ApiResult<PopulatedStrategyView> {
        let configs = user_agent_configs::Entity::find()
            .filter(user_agent_configs::Column::StrategyId.eq(strategy.id))
            .order_by_asc(user_agent_configs::Column::Position)
            .all(self.db.as_ref())
            .await?;

        let agent_ids: Vec<u64> = configs.iter().map(|config| config.agent_id).collect();
        let agents_by_id: HashMap<u64, agents::Model> = agents::Entity::find()
            .filter(agents::Column::Id.is_in(agent_ids))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|agent| (agent.id, agent))
            .collect();

        let mut views = Vec::with_capacity(configs.len());
        for config in configs {
            // agent deletion conflicts while referenced, so this lookup holds
            let agent = agents_by_id
                .get(&config.agent_id)
                .cloned()
                .ok_or_else(|| {
                    ApiError::Internal("Configuration references a missing agent".to_string())
                })?;
            views.push(PopulatedConfigView::new(config, AgentView::from(agent)));
        }

        Ok(PopulatedStrategyView::new(strategy, views))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn user_row(id: u64) -> users::Model {
        let now = Utc::now();
        users::Model {
            id,
            unique_wallet_id: format!("wallet-{id}"),
            wallet_address: format!("0xaddr{id}"),
            signature: None,
            is_autonomous_active: false,
            total_pnl: Decimal::ZERO,
            created_at: now,
            last_login_at: now,
        }
    }

    fn agent_row(id: u64) -> agents::Model {
        let now = Utc::now();
        agents::Model {
            id,
            name: format!("Agent {id}"),
            kind: "sentiment".to_string(),
            prompt: "p".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

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

    fn config_row(id: u64, strategy_id: u64, agent_id: u64, voting_power: f64) -> user_agent_configs::Model {
        let now = Utc::now();
        user_agent_configs::Model {
            id,
            user_id: 1,
            strategy_id,
            agent_id,
            voting_power,
            custom_prompt: None,
            code: None,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(agent_id: u64, voting_power: f64) -> AgentEntry {
        AgentEntry {
            agent_id,
            voting_power,
            custom_prompt: None,
            code: None,
        }
    }

    fn create_request(agents: Vec<AgentEntry>) -> CreateStrategyRequest {
        CreateStrategyRequest {
            user_id: 1,
            name: "BTC EMA".to_string(),
            description: None,
            risk: "Medium".to_string(),
            agents,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_bounds_voting_power() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = StrategyService::new(Arc::new(db));

        let result = service.create(create_request(vec![entry(3, 1.1)])).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = StrategyService::new(Arc::new(db));
        let result = service.create(create_request(vec![entry(3, -0.01)])).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_agent_list() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = StrategyService::new(Arc::new(db));

        let result = service.create(create_request(vec![])).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_risk() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = StrategyService::new(Arc::new(db));

        let mut request = create_request(vec![entry(3, 0.5)]);
        request.risk = "Extreme".to_string();
        let result = service.create(request).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_requires_existing_user() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let service = StrategyService::new(Arc::new(db));

        let result = service.create(create_request(vec![entry(3, 0.5)])).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_requires_existing_agents() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![user_row(1)]])
            .append_query_results([vec![agent_row(3)]])
            .into_connection();
        let service = StrategyService::new(Arc::new(db));

        // one of the two referenced agents resolves
        let result = service
            .create(create_request(vec![entry(3, 0.5), entry(99, 0.5)]))
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_inserts_strategy_and_configs() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![user_row(1)]])
            .append_query_results([vec![agent_row(3)]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 4,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 9,
                    rows_affected: 1,
                },
            ])
            .append_query_results([vec![strategy_row(4, 1)]])
            .append_query_results([vec![config_row(9, 4, 3, 0.5)]])
            .into_connection();
        let service = StrategyService::new(Arc::new(db));

        let view = service
            .create(create_request(vec![entry(3, 0.5)]))
            .await
            .unwrap();
        assert_eq!(view.id, 4);
        assert_eq!(view.agent_configs, vec![9]);
        assert_eq!(view.risk, "Medium");
    }

    #[tokio::test]
    async fn test_get_for_user_enforces_ownership() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![strategy_row(4, 1)]])
            .into_connection();
        let service = StrategyService::new(Arc::new(db));

        let result = service.get_for_user(2, 4).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_enforces_ownership() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![strategy_row(4, 1)]])
            .into_connection();
        let service = StrategyService::new(Arc::new(db));

        let result = service
            .update(4, 2, UpdateStrategyRequest::default())
            .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_out_of_bounds_replacement() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![strategy_row(4, 1)]])
            .into_connection();
        let service = StrategyService::new(Arc::new(db));

        let request = UpdateStrategyRequest {
            agents: Some(vec![entry(3, 1.1)]),
            ..Default::default()
        };
        let result = service.update(4, 1, request).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_populated_missing_strategy_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<strategies::Model>::new()])
            .into_connection();
        let service = StrategyService::new(Arc::new(db));

        let result = service.get_populated(99).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_populated_read_expands_agents_in_position_order() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![strategy_row(4, 1)]])
            .append_query_results([vec![
                config_row(9, 4, 3, 0.5),
                user_agent_configs::Model {
                    position: 1,
                    ..config_row(10, 4, 5, 0.25)
                },
            ]])
            .append_query_results([vec![agent_row(3), agent_row(5)]])
            .into_connection();
        let service = StrategyService::new(Arc::new(db));

        let view = service.get_populated(4).await.unwrap();
        assert_eq!(view.agent_configs.len(), 2);
        assert_eq!(view.agent_configs[0].agent.id, 3);
        assert_eq!(view.agent_configs[1].agent.id, 5);
        assert_eq!(view.agent_configs[1].voting_power, 0.25);
    }
}
