use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use shared::models::{
    CreateStrategyRequest, PopulatedStrategyView, StrategyView, UpdateStrategyRequest,
};

use crate::auth::AuthedUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create_strategy(
    State(state): State<AppState>,
    Json(request): Json<CreateStrategyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StrategyView>>)> {
    let strategy = state.strategy_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(strategy))))
}

pub async fn list_user_strategies(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> ApiResult<Json<ApiResponse<Vec<PopulatedStrategyView>>>> {
    let strategies = state.strategy_service.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::success(strategies)))
}

pub async fn get_strategy(
    State(state): State<AppState>,
    Path(strategy_id): Path<u64>,
) -> ApiResult<Json<ApiResponse<PopulatedStrategyView>>> {
    let strategy = state.strategy_service.get_populated(strategy_id).await?;
    Ok(Json(ApiResponse::success(strategy)))
}

pub async fn get_user_strategy(
    State(state): State<AppState>,
    Path((user_id, strategy_id)): Path<(u64, u64)>,
) -> ApiResult<Json<ApiResponse<PopulatedStrategyView>>> {
    let strategy = state
        .strategy_service
        .get_for_user(user_id, strategy_id)
        .await?;
    Ok(Json(ApiResponse::success(strategy)))
}

pub async fn update_strategy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(strategy_id): Path<u64>,
    Json(request): Json<UpdateStrategyRequest>,
) -> ApiResult<Json<ApiResponse<PopulatedStrategyView>>> {
    let acting_user_id = super::acting_user_id(&state, &user).await?;
    let strategy = state
        .strategy_service
        .update(strategy_id, acting_user_id, request)
        .await?;
    Ok(Json(ApiResponse::success(strategy)))
}

pub async fn delete_strategy(
    State(state): State<AppState>,
    Path(strategy_id): Path<u64>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    state.strategy_service.delete(strategy_id).await?;
    Ok(Json(ApiResponse::success(
        json!({ "message": "Strategy deleted" }),
    )))
}
