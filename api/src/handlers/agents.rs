use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use shared::models::{AgentView, CreateAgentRequest, UpdateAgentRequest};

use crate::auth::AuthedUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Json(request): Json<CreateAgentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AgentView>>)> {
    state.admin.require_admin(&user)?;
    let agent = state.agent_service.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AgentView::from(agent))),
    ))
}

pub async fn list_agents(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<AgentView>>>> {
    let agents = state.agent_service.list().await?;
    Ok(Json(ApiResponse::success(
        agents.into_iter().map(AgentView::from).collect(),
    )))
}

pub async fn get_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<u64>,
) -> ApiResult<Json<ApiResponse<AgentView>>> {
    let agent = state.agent_service.get(agent_id).await?;
    Ok(Json(ApiResponse::success(AgentView::from(agent))))
}

pub async fn update_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(agent_id): Path<u64>,
    Json(request): Json<UpdateAgentRequest>,
) -> ApiResult<Json<ApiResponse<AgentView>>> {
    state.admin.require_admin(&user)?;
    let agent = state.agent_service.update(agent_id, request).await?;
    Ok(Json(ApiResponse::success(AgentView::from(agent))))
}

pub async fn delete_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(agent_id): Path<u64>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    state.admin.require_admin(&user)?;
    state.agent_service.delete(agent_id).await?;
    Ok(Json(ApiResponse::success(
        json!({ "message": "Agent deleted" }),
    )))
}
