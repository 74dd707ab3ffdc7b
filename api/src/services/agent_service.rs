//! Agent registry: named prompt templates managed by administrators.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use shared::entity::{agents, user_agent_configs};
use shared::models::{AgentKind, CreateAgentRequest, UpdateAgentRequest};

use crate::error::{ApiError, ApiResult};

pub struct AgentService {
    db: Arc<DatabaseConnection>,
}

impl AgentService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: CreateAgentRequest) -> ApiResult<agents::Model> {
        if request.name.trim().is_empty() {
            return Err(ApiError::Validation("Agent name is required".to_string()));
        }
        let kind = AgentKind::from_str(&request.kind).map_err(ApiError::Validation)?;

        let existing = agents::Entity::find()
            .filter(agents::Column::Name.eq(request.name.clone()))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(format!(
                "Agent with name '{}' already exists",
                request.name
            )));
        }

        let now = Utc::now();
        let agent = agents::ActiveModel {
            name: Set(request.name),
            kind: Set(kind.as_str().to_string()),
            prompt: Set(request.prompt),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = agents::Entity::insert(agent)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(created)
    }

    pub async fn list(&self) -> ApiResult<Vec<agents::Model>> {
        let agents = agents::Entity::find()
            .order_by_desc(agents::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(agents)
    }

    pub async fn get(&self, agent_id: u64) -> ApiResult<agents::Model> {
        agents::Entity::find_by_id(agent_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Agent not found".to_string()))
    }

    pub async fn update(
        &self,
        agent_id: u64,
        request: UpdateAgentRequest,
    ) -> ApiResult<agents::Model> {
        let agent = self.get(agent_id).await?;

        if let Some(name) = &request.name {
            if name.trim().is_empty() {
                return Err(ApiError::Validation("Agent name is required".to_string()));
            }
            // name collision checked against other rows only
            let collision = agents::Entity::find()
                .filter(agents::Column::Name.eq(name.clone()))
                .filter(agents::Column::Id.ne(agent_id))
                .one(self.db.as_ref())
                .await?;
            if collision.is_some() {
                return Err(ApiError::Conflict(format!(
                    "Agent with name '{name}' already exists"
                )));
            }
        }

        let mut active: agents::ActiveModel = agent.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(kind) = request.kind {
            let kind = AgentKind::from_str(&kind).map_err(ApiError::Validation)?;
            active.kind = Set(kind.as_str().to_string());
        }
        if let Some(prompt) = request.prompt {
            active.prompt = Set(prompt);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated)
    }

    /// Deleting an agent that strategy configurations still reference is
    /// refused, so populated reads can always expand the agent.
    pub async fn delete(&self, agent_id: u64) -> ApiResult<()> {
        let agent = self.get(agent_id).await?;

        let in_use = user_agent_configs::Entity::find()
            .filter(user_agent_configs::Column::AgentId.eq(agent_id))
            .one(self.db.as_ref())
            .await?;
        if in_use.is_some() {
            return Err(ApiError::Conflict(
                "Agent is still referenced by strategy configurations".to_string(),
            ));
        }

        agents::Entity::delete_by_id(agent.id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
